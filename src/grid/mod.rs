//! The grid collaborator: an N-dimensional lattice over a bounded domain,
//! with interpolation and differentiation of tables sampled on it.
//!
//! The certificate types only depend on the [`Grid`] trait. [`RegularGrid`]
//! is the provided implementation, backed by [`multilinear`] interpolation
//! and [`gradient`] finite differences.

pub mod gradient;
pub mod multilinear;
pub mod regular;

pub use regular::RegularGrid;

use num_traits::Float;

/// Axis-aligned bounds of a grid's domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain<T> {
    /// Lower bound of each axis
    pub lo: Vec<T>,
    /// Upper bound of each axis
    pub hi: Vec<T>,
}

impl<T: Float> Domain<T> {
    /// Number of axes
    pub fn ndims(&self) -> usize {
        self.lo.len()
    }

    /// Whether a point lies inside the closed domain
    pub fn contains(&self, x: &[T]) -> bool {
        x.len() == self.ndims()
            && x.iter()
                .zip(self.lo.iter().zip(&self.hi))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }
}

/// A lattice of sample points over a bounded domain.
///
/// Tables on the grid are flattened in C order, with an optional trailing
/// channel axis (`nchan` values per grid point).
pub trait Grid<T: Float> {
    /// Number of points along each axis
    fn shape(&self) -> &[usize];

    /// Domain bounds
    fn domain(&self) -> &Domain<T>;

    /// Coordinates of every grid point, as one column per axis in C order
    fn states(&self) -> &[Vec<T>];

    /// Interpolate an `nchan`-channel table at a point, writing `nchan` values.
    fn interpolate(
        &self,
        vals: &[T],
        nchan: usize,
        point: &[T],
        out: &mut [T],
    ) -> Result<(), &'static str>;

    /// Gradient of a scalar table, one vector of length `ndims` per grid point.
    fn grad_values(&self, vals: &[T]) -> Result<Vec<T>, &'static str>;

    /// Number of axes
    fn ndims(&self) -> usize {
        self.shape().len()
    }

    /// Total number of grid points
    fn size(&self) -> usize {
        self.shape().iter().product()
    }

    /// Coordinate columns as borrowed slices, the layout batched queries take
    fn state_slices(&self) -> Vec<&[T]> {
        self.states().iter().map(|x| &x[..]).collect()
    }

    /// Interpolate a scalar table at a point
    fn interpolate_scalar(&self, vals: &[T], point: &[T]) -> Result<T, &'static str> {
        let mut out = [T::zero()];
        self.interpolate(vals, 1, point, &mut out)?;
        Ok(out[0])
    }
}
