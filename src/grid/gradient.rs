//! Spatial gradient of a table sampled on a regular grid.
//!
//! Central differences are used on the interior of each axis and first-order
//! one-sided differences on its two boundary faces, which is what a central
//! scheme gives after linear extrapolation of the table by one ghost point.
//! The result is exact for tables sampled from an affine function.
use num_traits::Float;

/// Compute one gradient vector per grid point of a C-ordered scalar table.
///
/// Output has the grid shape plus a trailing axis of size `ndims`,
/// flattened in C order like the input.
///
/// # Errors
/// * If the table size does not match the grid shape
/// * If any dimension has fewer than two points
/// * If the number of steps does not match the number of dimensions
pub fn grad_values<T: Float>(
    dims: &[usize],
    steps: &[T],
    vals: &[T],
) -> Result<Vec<T>, &'static str> {
    let ndims = dims.len();
    let npoints: usize = dims.iter().product();
    if steps.len() != ndims || vals.len() != npoints || ndims == 0 {
        return Err("Dimension mismatch");
    }
    if dims.iter().any(|&d| d < 2) {
        return Err("All grids must have at least two entries");
    }

    let mut strides = vec![1_usize; ndims];
    for j in (0..ndims.saturating_sub(1)).rev() {
        strides[j] = strides[j + 1] * dims[j + 1];
    }

    let two = T::one() + T::one();
    let mut grads = vec![T::zero(); npoints * ndims];
    for (k, gk) in grads.chunks_exact_mut(ndims).enumerate() {
        for j in 0..ndims {
            let s = strides[j];
            let idx = (k / s) % dims[j];
            gk[j] = if idx == 0 {
                (vals[k + s] - vals[k]) / steps[j]
            } else if idx == dims[j] - 1 {
                (vals[k] - vals[k - s]) / steps[j]
            } else {
                (vals[k + s] - vals[k - s]) / (two * steps[j])
            };
        }
    }

    Ok(grads)
}
