//! Time-varying tabular certificates.
//!
//! Both the value table and the gradient table are functions of continuous
//! time, interpolated linearly between stored time samples. Queries blend
//! the two bracketing spatial lookups instead of materializing the blended
//! table, which gives the same result by linearity.
use log::{debug, trace, warn};
use num_traits::Float;

use crate::certificate::{Certificate, GridField, TimeInput};
use crate::condition;
use crate::config::TabularConfig;
use crate::dynamics::{self, ControlAffineDynamics, Dynamics};
use crate::error::CbfError;
use crate::grid::Grid;
use crate::time::interpolant::blend;
use crate::time::{Bracket, TimeInterpolant};
use crate::utils::linspace;

/// The two accepted forms of a time-indexed value table.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeTableSource<T> {
    /// One value table per time sample, in time order
    Samples(Vec<Vec<T>>),
    /// A value table that is already a function of continuous time
    Interpolant(TimeInterpolant<T>),
}

/// Value and gradient tables as functions of time.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeVaryingTables<T> {
    values: TimeInterpolant<T>,
    gradients: TimeInterpolant<T>,
}

impl<T: Float> TimeVaryingTables<T> {
    pub fn values(&self) -> &TimeInterpolant<T> {
        &self.values
    }

    pub fn gradients(&self) -> &TimeInterpolant<T> {
        &self.gradients
    }
}

/// A certificate represented by a sequence of value tables on a grid,
/// indexed by time.
///
/// Starts unpopulated; every query fails with [`CbfError::Unpopulated`]
/// until [`set_time_indexed_table`](Self::set_time_indexed_table) or
/// [`tabularize`](Self::tabularize) succeeds.
#[derive(Clone, Debug)]
pub struct TimeVaryingTabularCbf<T, G, D> {
    grid: G,
    dynamics: D,
    config: TabularConfig<T>,
    tables: Option<TimeVaryingTables<T>>,
}

impl<T, G, D> TimeVaryingTabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: Dynamics<T>,
{
    pub fn new(dynamics: D, grid: G) -> Result<Self, CbfError> {
        Self::with_config(dynamics, grid, TabularConfig::default())
    }

    /// # Errors
    /// * If the dynamics' state dimension differs from the grid's
    /// * If the configuration is invalid for the grid domain
    pub fn with_config(dynamics: D, grid: G, config: TabularConfig<T>) -> Result<Self, CbfError> {
        if dynamics.state_dim() != grid.ndims() {
            return Err(CbfError::DimensionMismatch(
                "dynamics state dimension does not match grid dimension",
            ));
        }
        config.validate(grid.domain())?;

        Ok(Self {
            grid,
            dynamics,
            config,
            tables: None,
        })
    }

    pub fn dynamics(&self) -> &D {
        &self.dynamics
    }

    pub fn tables(&self) -> Option<&TimeVaryingTables<T>> {
        self.tables.as_ref()
    }

    /// The value table as a function of time, exactly as last assigned
    pub fn value_table(&self) -> Option<&TimeInterpolant<T>> {
        self.tables.as_ref().map(TimeVaryingTables::values)
    }

    pub fn gradient_table(&self) -> Option<&TimeInterpolant<T>> {
        self.tables.as_ref().map(TimeVaryingTables::gradients)
    }

    pub fn is_populated(&self) -> bool {
        self.tables.is_some()
    }

    /// Replace the time-indexed value table and rebuild the gradient sequence.
    ///
    /// * [`TimeTableSource::Samples`]: one table per entry of `times`. The values
    ///   are interpolated over `times` as given, and one gradient table is
    ///   computed per sample over the same times.
    /// * [`TimeTableSource::Interpolant`]: the interpolant is stored as the value
    ///   table. Gradients are tabulated at `max(times.len(), min_resample_steps)`
    ///   evenly spaced times spanning the first and last entries of `times`, and
    ///   follow the interpolant's own extrapolation policy so that both tables
    ///   agree outside the sampled range.
    ///
    /// On error the previous tables (if any) are left in place.
    pub fn set_time_indexed_table(
        &mut self,
        times: &[T],
        source: TimeTableSource<T>,
    ) -> Result<(), CbfError> {
        let npoints = self.grid.size();
        let extrapolation = self.config.time_extrapolation;

        let tables = match source {
            TimeTableSource::Samples(values) => {
                if values.iter().any(|v| v.len() != npoints) {
                    return Err(CbfError::DimensionMismatch(
                        "value table does not match grid shape",
                    ));
                }
                let gradients = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        trace!("gradient table {}/{}", i + 1, values.len());
                        self.grid.grad_values(v).map_err(CbfError::Grid)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let values = TimeInterpolant::new(times.to_vec(), values, extrapolation)
                    .map_err(CbfError::Time)?;
                let gradients = TimeInterpolant::new(times.to_vec(), gradients, extrapolation)
                    .map_err(CbfError::Time)?;
                debug!(
                    "time-indexed table set from {} samples on {:?} grid",
                    times.len(),
                    self.grid.shape()
                );

                TimeVaryingTables { values, gradients }
            }
            TimeTableSource::Interpolant(values) => {
                if values.table_len() != npoints {
                    return Err(CbfError::DimensionMismatch(
                        "value table does not match grid shape",
                    ));
                }
                let (t0, t1) = match (times.first(), times.last()) {
                    (Some(&t0), Some(&t1)) => (t0, t1),
                    _ => return Err(CbfError::Time("At least two time samples are required")),
                };

                let nsteps = times.len().max(self.config.min_resample_steps);
                if times.len() < self.config.min_resample_steps {
                    warn!(
                        "{} times requested; tabulating gradients at {} instead",
                        times.len(),
                        nsteps
                    );
                }
                let resampled = linspace(t0, t1, nsteps).map_err(CbfError::Time)?;

                let gradients = resampled
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| {
                        trace!("gradient table {}/{}", i + 1, nsteps);
                        let v = values.at(t).map_err(CbfError::Time)?;
                        self.grid.grad_values(&v).map_err(CbfError::Grid)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let gradients = TimeInterpolant::new(resampled, gradients, values.extrapolation())
                    .map_err(CbfError::Time)?;
                debug!(
                    "time-indexed table set from interpolant, gradients at {} times on {:?} grid",
                    nsteps,
                    self.grid.shape()
                );

                TimeVaryingTables { values, gradients }
            }
        };

        self.tables = Some(tables);
        Ok(())
    }

    /// Sample an exact certificate at every grid point at each of `times`
    /// and store the result as a time-indexed table.
    ///
    /// # Errors
    /// * [`CbfError::DynamicsMismatch`] if the certificate's dynamics differ from ours
    /// * Any error the certificate reports while evaluating
    /// * If `times` is not a valid strictly increasing sequence of at least two times
    pub fn tabularize<C>(&mut self, certificate: &C, times: &[T]) -> Result<(), CbfError>
    where
        C: Certificate<T, Dynamics = D> + ?Sized,
        D: PartialEq,
    {
        if certificate.dynamics() != &self.dynamics {
            return Err(CbfError::DynamicsMismatch);
        }
        let states = self.grid.state_slices();
        let values = times
            .iter()
            .map(|&t| {
                let mut v = vec![T::zero(); self.grid.size()];
                certificate.values(&states, t, &mut v)?;
                Ok(v)
            })
            .collect::<Result<Vec<_>, CbfError>>()?;

        self.set_time_indexed_table(times, TimeTableSource::Samples(values))
    }

    /// Certificate-condition residual `H(x, 0, V, ∇V) + γ V` at every grid point,
    /// for the tables interpolated at `time`.
    pub fn certificate_condition(&self, discount_rate: T, time: T) -> Result<Vec<T>, CbfError> {
        let tables = self.populated()?;
        let values = tables.values.at(time).map_err(CbfError::Time)?;
        let gradients = tables.gradients.at(time).map_err(CbfError::Time)?;
        condition::certificate_condition(
            &self.grid,
            &self.dynamics,
            &values,
            &gradients,
            discount_rate,
        )
    }

    fn populated(&self) -> Result<&TimeVaryingTables<T>, CbfError> {
        self.tables.as_ref().ok_or(CbfError::Unpopulated)
    }
}

impl<T, G, D> TimeVaryingTabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: ControlAffineDynamics<T>,
{
    /// `(∇h · f, ∇h · g)` at `state` and `time`, with `∇h` interpolated from the
    /// gradient tables.
    pub fn lie_derivatives(&self, state: &[T], time: T) -> Result<(T, Vec<T>), CbfError> {
        let gradient = self.gradient(state, time)?;
        dynamics::lie_derivatives(&self.dynamics, state, time, &gradient)
            .map_err(CbfError::DimensionMismatch)
    }
}

/// Evaluate `lookup` on the stored tables bracketing `time` and blend the
/// results linearly into `out`.
fn blend_in_time<T, F>(
    interp: &TimeInterpolant<T>,
    time: T,
    out: &mut [T],
    mut lookup: F,
) -> Result<(), CbfError>
where
    T: Float,
    F: FnMut(&[T], &mut [T]) -> Result<(), CbfError>,
{
    let Bracket { lo, hi, w_lo, w_hi } = interp.bracket(time).map_err(CbfError::Time)?;

    if w_hi == T::zero() {
        return lookup(interp.table(lo), out);
    }
    if w_lo == T::zero() {
        return lookup(interp.table(hi), out);
    }

    let mut upper = vec![T::zero(); out.len()];
    lookup(interp.table(lo), out)?;
    lookup(interp.table(hi), &mut upper)?;
    out.iter_mut()
        .zip(&upper)
        .for_each(|(o, &u)| *o = blend(*o, w_lo, u, w_hi));
    Ok(())
}

impl<T, G, D> GridField<T> for TimeVaryingTabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: Dynamics<T>,
{
    type Grid = G;

    fn grid(&self) -> &G {
        &self.grid
    }

    fn config(&self) -> &TabularConfig<T> {
        &self.config
    }

    fn evaluate(&self, state: &[T], time: T) -> Result<T, CbfError> {
        let tables = self.populated()?;
        let clipped = self.clip_state(state)?;

        let mut out = [T::zero()];
        blend_in_time(&tables.values, time, &mut out, |table, o| {
            self.grid
                .interpolate(table, 1, &clipped, o)
                .map_err(CbfError::Grid)
        })?;
        Ok(out[0])
    }

    fn gradient_into(&self, state: &[T], time: T, out: &mut [T]) -> Result<(), CbfError> {
        let tables = self.populated()?;
        let clipped = self.clip_state(state)?;
        let ndims = self.grid.ndims();
        if out.len() != ndims {
            return Err(CbfError::DimensionMismatch(
                "gradient output does not match grid dimension",
            ));
        }

        blend_in_time(&tables.gradients, time, out, |table, o| {
            self.grid
                .interpolate(table, ndims, &clipped, o)
                .map_err(CbfError::Grid)
        })
    }
}

impl<T, G, D> Certificate<T> for TimeVaryingTabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: Dynamics<T>,
{
    type Dynamics = D;

    fn dynamics(&self) -> &D {
        &self.dynamics
    }

    fn values(&self, states: &[&[T]], time: T, out: &mut [T]) -> Result<(), CbfError> {
        self.evaluate_batch(states, TimeInput::Scalar(time), out)
    }
}
