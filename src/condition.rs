//! Certificate-condition residual over every grid point.
//!
//! At each grid point the residual is `H(x, 0, V(x), ∇V(x)) + γ V(x)`, where
//! `H` is the Hamiltonian of the dynamics and `γ` the discount rate.
//! Nonnegative entries mark points where the certificate condition holds.
use num_traits::Float;

use crate::dynamics::Dynamics;
use crate::error::CbfError;
use crate::grid::Grid;

/// Evaluate the residual for a value table and its gradient table.
///
/// `gradients` holds `ndims` entries per grid point, as produced by
/// [`Grid::grad_values`].
pub fn certificate_condition<T, G, D>(
    grid: &G,
    dynamics: &D,
    values: &[T],
    gradients: &[T],
    discount_rate: T,
) -> Result<Vec<T>, CbfError>
where
    T: Float,
    G: Grid<T> + ?Sized,
    D: Dynamics<T> + ?Sized,
{
    let ndims = grid.ndims();
    let npoints = grid.size();
    if ndims == 0 || values.len() != npoints || gradients.len() != npoints * ndims {
        return Err(CbfError::DimensionMismatch("table does not match grid shape"));
    }

    let states = grid.states();
    let mut state = vec![T::zero(); ndims];
    let residual = values
        .iter()
        .zip(gradients.chunks_exact(ndims))
        .enumerate()
        .map(|(k, (&v, dv))| {
            state.iter_mut().zip(states).for_each(|(s, col)| *s = col[k]);
            dynamics.hamiltonian(&state, T::zero(), v, dv) + discount_rate * v
        })
        .collect();

    Ok(residual)
}
