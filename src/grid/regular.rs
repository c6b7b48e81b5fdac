//! A regular grid with evenly spaced points on each axis, endpoints included.
use num_traits::{Float, NumCast};

use super::{gradient, multilinear, Domain, Grid};
use crate::utils::{linspace, meshgrid};

/// Regular lattice over an axis-aligned box.
///
/// Axis `j` has `shape[j]` points from `lo[j]` to `hi[j]` inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct RegularGrid<T> {
    shape: Vec<usize>,
    starts: Vec<T>,
    steps: Vec<T>,
    domain: Domain<T>,
    coordinate_vectors: Vec<Vec<T>>,
    states: Vec<Vec<T>>,
}

impl<T: Float> RegularGrid<T> {
    /// Build a grid from per-axis bounds and point counts.
    ///
    /// # Errors
    /// * If `lo`, `hi` and `shape` lengths differ, or are empty
    /// * If the number of dimensions exceeds the interpolator's maximum
    /// * If any axis has fewer than two points
    /// * If any axis has `hi <= lo`
    pub fn new(lo: &[T], hi: &[T], shape: &[usize]) -> Result<Self, &'static str> {
        let ndims = shape.len();
        if lo.len() != ndims || hi.len() != ndims || ndims == 0 {
            return Err("Dimension mismatch");
        }
        if ndims > multilinear::DEFAULT_MAXDIMS {
            return Err("Dimension exceeds maximum");
        }
        if shape.iter().any(|&n| n < 2) {
            return Err("All grids must have at least two entries");
        }
        if !lo.iter().zip(hi).all(|(&l, &h)| h > l) {
            return Err("All grids must be monotonically increasing");
        }

        let steps = (0..ndims)
            .map(|j| {
                <T as NumCast>::from(shape[j] - 1)
                    .map(|span| (hi[j] - lo[j]) / span)
                    .ok_or("Unrepresentable number")
            })
            .collect::<Result<Vec<T>, _>>()?;
        let coordinate_vectors = (0..ndims)
            .map(|j| linspace(lo[j], hi[j], shape[j]))
            .collect::<Result<Vec<Vec<T>>, _>>()?;
        let axes: Vec<&[T]> = coordinate_vectors.iter().map(|x| &x[..]).collect();
        let states = meshgrid(&axes);

        Ok(Self {
            shape: shape.to_vec(),
            starts: lo.to_vec(),
            steps,
            domain: Domain {
                lo: lo.to_vec(),
                hi: hi.to_vec(),
            },
            coordinate_vectors,
            states,
        })
    }

    /// Sample coordinates along each axis
    pub fn coordinate_vectors(&self) -> &[Vec<T>] {
        &self.coordinate_vectors
    }

    /// Spacing along each axis
    pub fn spacings(&self) -> &[T] {
        &self.steps
    }
}

impl<T: Float> Grid<T> for RegularGrid<T> {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn domain(&self) -> &Domain<T> {
        &self.domain
    }

    fn states(&self) -> &[Vec<T>] {
        &self.states
    }

    #[inline]
    fn interpolate(
        &self,
        vals: &[T],
        nchan: usize,
        point: &[T],
        out: &mut [T],
    ) -> Result<(), &'static str> {
        multilinear::interpn(&self.shape, &self.starts, &self.steps, nchan, vals, point, out)
    }

    fn grad_values(&self, vals: &[T]) -> Result<Vec<T>, &'static str> {
        gradient::grad_values(&self.shape, &self.steps, vals)
    }
}
