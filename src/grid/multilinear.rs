//! Multilinear interpolation on a regular grid, for scalar or vector-valued tables.
//!
//! Tables are stored in C order with an optional trailing channel axis, so a
//! table of scalars has one channel and a table of gradient vectors on an
//! N-dimensional grid has N channels:
//! (z(x0, y0)[0..nchan], z(x0, y1)[0..nchan], ..., z(x1, y0)[0..nchan], ...).
//!
//! Observation points outside the grid are saturated to the nearest face
//! rather than extrapolated; every value produced is a convex combination
//! of the 2^ndims vertices of the containing cell.
//!
//! Operation Complexity
//! * O(2^ndims * nchan) per observation point.
//!
//! Memory Complexity
//! * Peak stack usage is O(MAXDIMS), which is minimally O(ndims).
//!
//! ```rust
//! use tabular_cbf::grid::multilinear;
//!
//! // Two axes with two points each
//! let dims = [2, 2];
//! let starts = [0.0_f64, 0.0];
//! let steps = [1.0_f64, 1.0];
//!
//! // z = x + y, one channel
//! let z = [0.0, 1.0, 1.0, 2.0];
//!
//! let mut out = [0.0; 1];
//! multilinear::interpn(&dims, &starts, &steps, 1, &z, &[0.5, 0.25], &mut out).unwrap();
//! assert!((out[0] - 0.75).abs() < 1e-12);
//! ```
//!
//! References
//! * https://en.wikipedia.org/wiki/Bilinear_interpolation#Weighted_mean
use num_traits::{Float, NumCast};

/// Maximum number of dimensions for the convenience method
pub const DEFAULT_MAXDIMS: usize = 8;

/// An arbitrary-dimensional multilinear interpolator on a regular grid,
/// saturating at the grid bounds.
pub struct MultilinearInterpolator<'a, T: Float, const MAXDIMS: usize> {
    /// Number of dimensions
    ndims: usize,

    /// Number of values stored per grid point
    nchan: usize,

    /// Size of each dimension
    dims: [usize; MAXDIMS],

    /// Starting point of each dimension, size dims.len()
    starts: [T; MAXDIMS],

    /// Step size for each dimension, size dims.len()
    steps: [T; MAXDIMS],

    /// Values at each point, size prod(dims) * nchan
    vals: &'a [T],
}

impl<'a, T: Float, const MAXDIMS: usize> MultilinearInterpolator<'a, T, MAXDIMS> {
    /// Build a new interpolator, using O(MAXDIMS) calculations and storage.
    ///
    /// # Errors
    /// * If any input dimensions do not match
    /// * If the number of dimensions exceeds MAXDIMS
    /// * If any dimensions have size < 2
    /// * If any step sizes have zero or negative magnitude
    #[inline(always)]
    pub fn new(
        dims: &[usize],
        starts: &[T],
        steps: &[T],
        nchan: usize,
        vals: &'a [T],
    ) -> Result<Self, &'static str> {
        let ndims = dims.len();
        if ndims > MAXDIMS {
            return Err("Dimension exceeds maximum");
        }
        let npoints: usize = dims.iter().product();
        if !(starts.len() == ndims
            && steps.len() == ndims
            && vals.len() == npoints * nchan
            && ndims > 0
            && nchan > 0)
        {
            return Err("Dimension mismatch");
        }

        if dims.iter().any(|&x| x < 2) {
            return Err("All grids must have at least two entries");
        }
        if !steps.iter().all(|&x| x > T::zero()) {
            return Err("All grids must be monotonically increasing");
        }

        // Keep grid info local to the struct; indirection through references
        // to caller-owned grid data costs more than the interpolation itself.
        let mut steps_local = [T::zero(); MAXDIMS];
        let mut starts_local = [T::zero(); MAXDIMS];
        let mut dims_local = [0_usize; MAXDIMS];
        steps_local[..ndims].copy_from_slice(steps);
        starts_local[..ndims].copy_from_slice(starts);
        dims_local[..ndims].copy_from_slice(dims);

        Ok(Self {
            ndims,
            nchan,
            dims: dims_local,
            starts: starts_local,
            steps: steps_local,
            vals,
        })
    }

    /// Interpolate on a contiguous list of observation points,
    /// given as one coordinate slice per dimension.
    ///
    /// `out` holds `nchan` entries per observation point.
    ///
    /// # Errors
    ///   * If the dimensionality of the points does not match the grid
    ///   * If the output size does not match the number of points and channels
    #[inline(always)]
    pub fn interp(&self, x: &[&[T]], out: &mut [T]) -> Result<(), &'static str> {
        let ndims = self.ndims;
        if x.len() != ndims {
            return Err("Dimension mismatch");
        }
        let n = x[0].len();
        if !(x.iter().all(|xx| xx.len() == n) && out.len() == n * self.nchan) {
            return Err("Dimension mismatch");
        }

        let tmp = &mut [T::zero(); MAXDIMS][..ndims];
        for (i, outi) in out.chunks_exact_mut(self.nchan).enumerate() {
            (0..ndims).for_each(|j| tmp[j] = x[j][i]);
            self.interp_one(tmp, outi)?;
        }

        Ok(())
    }

    /// Interpolate all channels at a point,
    /// using fixed-size intermediate storage of O(ndims) and no allocation.
    ///
    /// # Errors
    ///   * If the dimensionality of the point does not match the grid
    ///   * If `out` does not have exactly `nchan` entries
    ///   * If a coordinate is not representable as a grid index (NaN, infinite)
    #[inline(always)]
    pub fn interp_one(&self, x: &[T], out: &mut [T]) -> Result<(), &'static str> {
        let ndims = self.ndims;
        let nchan = self.nchan;
        if x.len() != ndims || out.len() != nchan {
            return Err("Dimension mismatch");
        }

        let origin = &mut [0_usize; MAXDIMS][..ndims]; // Indices of lower corner of hypercube
        let fracs = &mut [T::zero(); MAXDIMS][..ndims]; // Normalized position inside the cell
        let ioffs = &mut [false; MAXDIMS][..ndims]; // Offset index for selected vertex
        let dimprod = &mut [1_usize; MAXDIMS][..ndims];

        // Each entry is the cumulative product of the size of dimensions
        // higher than this one, which is the stride between blocks
        // relating to a given index along each dimension.
        let mut acc = 1;
        for i in 0..ndims {
            dimprod[ndims - i - 1] = acc;
            acc *= self.dims[ndims - i - 1];
        }

        for i in 0..ndims {
            (origin[i], fracs[i]) = self.get_loc(x[i], i)?;
        }

        out.iter_mut().for_each(|o| *o = T::zero());

        // Traverse the 2^ndims vertices of the cell without actualizing them
        // in storage. Every 2^jth vertex flips which side of the cell we are
        // on in dimension j, which visits each vertex exactly once.
        let nverts = 2_usize.pow(ndims as u32);
        for i in 0..nverts {
            let mut k: usize = 0; // index of this vertex in the flattened grid
            let mut weight = T::one();

            for j in 0..ndims {
                let flip = i % 2_usize.pow(j as u32) == 0;
                if flip {
                    ioffs[j] = !ioffs[j];
                }

                k += dimprod[j] * (origin[j] + ioffs[j] as usize);
                weight = weight
                    * match ioffs[j] {
                        true => fracs[j],
                        false => T::one() - fracs[j],
                    };
            }

            if weight == T::zero() {
                continue;
            }

            let vk = &self.vals[k * nchan..(k + 1) * nchan];
            out.iter_mut()
                .zip(vk)
                .for_each(|(o, &v)| *o = *o + v * weight);
        }

        Ok(())
    }

    /// Get the lower-corner index of the cell containing `v` along this dimension,
    /// and the normalized position of `v` inside that cell, saturating to
    /// the boundary cell (and to the boundary face) for points outside the grid.
    ///
    /// Returned value like (lower_corner_index, fraction in [0, 1]).
    #[inline(always)]
    fn get_loc(&self, v: T, dim: usize) -> Result<(usize, T), &'static str> {
        let floc = (v - self.starts[dim]) / self.steps[dim]; // float loc in units of steps
        let iloc =
            <isize as NumCast>::from(floc.floor()).ok_or("Unrepresentable coordinate value")?;

        let dimmax = self.dims[dim] - 2; // maximum index for lower corner
        let loc: usize = (iloc.max(0) as usize).min(dimmax);

        let floor = <T as NumCast>::from(loc).ok_or("Unrepresentable coordinate value")?;
        let frac = (floc - floor).max(T::zero()).min(T::one());

        Ok((loc, frac))
    }
}

/// Evaluate multilinear interpolation of an `nchan`-channel table at one point
/// on a regular grid in up to `DEFAULT_MAXDIMS` dimensions.
///
/// While this method initializes the interpolator struct on every call, the overhead of doing this
/// is minimal even when using it to evaluate one observation point at a time.
#[inline(always)]
pub fn interpn<T: Float>(
    dims: &[usize],
    starts: &[T],
    steps: &[T],
    nchan: usize,
    vals: &[T],
    x: &[T],
    out: &mut [T],
) -> Result<(), &'static str> {
    MultilinearInterpolator::<'_, T, DEFAULT_MAXDIMS>::new(dims, starts, steps, nchan, vals)?
        .interp_one(x, out)
}
