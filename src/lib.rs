//! Tabular control barrier functions: a safety certificate stored as values
//! sampled on a grid, queried at continuous states (and times) by multilinear
//! interpolation, with spatial gradients tabulated alongside the values.
//!
//! # Components
//!
//! | Type                          | Table                               | Time dependence               |
//! |-------------------------------|-------------------------------------|-------------------------------|
//! | [`TabularCbf`]                | one value table + gradient table    | none                          |
//! | [`TabularControlAffineCbf`]   | same, control-affine dynamics only  | none                          |
//! | [`TimeVaryingTabularCbf`]     | value + gradient tables per time    | piecewise-linear in time      |
//!
//! All of them implement [`GridField`] (clip, evaluate, gradient, and batched
//! forms) and [`Certificate`], so a populated table can itself be resampled
//! onto another grid with `tabularize`.
//!
//! Query states are first clipped into `[lo + margin, hi - margin]` on every
//! axis, so out-of-domain queries return the value near the boundary rather
//! than an error. Queries on a table that has never been populated fail with
//! [`CbfError::Unpopulated`].
//!
//! # Performance Scalings
//! Each point query visits the 2^ndims vertices of the containing cell, once
//! per stored time sample that contributes (at most two). Gradient tables are
//! computed once per assignment, in O(ndims) per grid point per time sample.
//!
//! # Example: Static Table
//! ```rust
//! use tabular_cbf::{Dynamics, Grid, GridField, RegularGrid, TabularCbf};
//!
//! /// x' = u with |u_i| <= 1
//! #[derive(PartialEq)]
//! struct Integrator;
//!
//! impl Dynamics<f64> for Integrator {
//!     fn state_dim(&self) -> usize {
//!         2
//!     }
//!
//!     fn hamiltonian(&self, _x: &[f64], _r: f64, _v: f64, dv: &[f64]) -> f64 {
//!         dv.iter().map(|g| g.abs()).sum()
//!     }
//! }
//!
//! // 21 x 21 grid over [-1, 1]^2
//! let grid = RegularGrid::new(&[-1.0, -1.0], &[1.0, 1.0], &[21, 21]).unwrap();
//!
//! // V = x + y at every grid point
//! let values: Vec<f64> = (0..grid.size())
//!     .map(|k| grid.states()[0][k] + grid.states()[1][k])
//!     .collect();
//!
//! let mut cbf = TabularCbf::new(Integrator, grid).unwrap();
//! cbf.set_value_table(values).unwrap();
//!
//! let v = cbf.evaluate(&[0.0, 0.0], 0.0).unwrap();
//! assert!(v.abs() < 1e-10);
//!
//! let g = cbf.gradient(&[0.5, -0.5], 0.0).unwrap();
//! assert!((g[0] - 1.0).abs() < 1e-10 && (g[1] - 1.0).abs() < 1e-10);
//!
//! // Outside the domain: clipped to x = -0.99
//! let v = cbf.evaluate(&[-1.5, 0.0], 0.0).unwrap();
//! assert!((v + 0.99).abs() < 1e-10);
//! ```
//!
//! # Example: Time-Varying Table
//! ```rust
//! use tabular_cbf::{
//!     Dynamics, Grid, GridField, RegularGrid, TimeTableSource, TimeVaryingTabularCbf,
//! };
//!
//! #[derive(PartialEq)]
//! struct Integrator;
//!
//! impl Dynamics<f64> for Integrator {
//!     fn state_dim(&self) -> usize {
//!         1
//!     }
//!
//!     fn hamiltonian(&self, _x: &[f64], _r: f64, _v: f64, dv: &[f64]) -> f64 {
//!         dv[0].abs()
//!     }
//! }
//!
//! let grid = RegularGrid::new(&[0.0], &[1.0], &[11]).unwrap();
//! let early: Vec<f64> = grid.states()[0].iter().map(|x| x - 0.5).collect();
//! let late: Vec<f64> = grid.states()[0].iter().map(|x| x - 0.25).collect();
//!
//! let mut cbf = TimeVaryingTabularCbf::new(Integrator, grid).unwrap();
//! cbf.set_time_indexed_table(&[0.0, 2.0], TimeTableSource::Samples(vec![early, late]))
//!     .unwrap();
//!
//! // Halfway in time, halfway between the two tables
//! let v = cbf.evaluate(&[0.5], 1.0).unwrap();
//! assert!((v - 0.125).abs() < 1e-10);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod certificate;
pub mod condition;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod grid;
pub mod tabular;
pub mod time;
pub mod time_varying;
pub mod utils;

pub use certificate::{Certificate, GridField, TimeInput};
pub use config::TabularConfig;
pub use dynamics::{ControlAffineDynamics, Dynamics};
pub use error::CbfError;
pub use grid::{Domain, Grid, RegularGrid};
pub use tabular::{TabularCbf, TabularControlAffineCbf, ValueTable};
pub use time::{Extrapolation, TimeInterpolant};
pub use time_varying::{TimeTableSource, TimeVaryingTables, TimeVaryingTabularCbf};

#[cfg(test)]
pub(crate) mod testing;
