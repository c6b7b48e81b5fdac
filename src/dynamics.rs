//! Capabilities required of the dynamics model.
//!
//! The certificates never integrate or simulate the dynamics; they only
//! compare them for equality, query the Hamiltonian at grid points, and,
//! for control-affine systems, read the drift and input matrix.
use num_traits::Float;

/// A dynamics model, as seen by a tabular certificate.
pub trait Dynamics<T: Float> {
    /// Dimension of the state vector
    fn state_dim(&self) -> usize;

    /// Hamiltonian at `state` for a certificate with local `value` and
    /// spatial `gradient`, given a scalar reference (the certificate
    /// condition always passes zero).
    fn hamiltonian(&self, state: &[T], reference: T, value: T, gradient: &[T]) -> T;
}

/// Dynamics of the form `x' = f(x, t) + g(x, t) u`.
pub trait ControlAffineDynamics<T: Float>: Dynamics<T> {
    /// Dimension of the control input
    fn control_dim(&self) -> usize;

    /// Drift `f(x, t)`, length `state_dim`
    fn drift(&self, state: &[T], time: T) -> Vec<T>;

    /// Input matrix `g(x, t)`, `state_dim x control_dim` in row-major order
    fn control_matrix(&self, state: &[T], time: T) -> Vec<T>;
}

/// Lie derivatives of a certificate along a control-affine system,
/// `(∇h · f, ∇h · g)`, from the certificate's gradient at `state`.
///
/// # Errors
/// * If the gradient, drift, or input matrix do not match the dimensions
///   the dynamics report
pub fn lie_derivatives<T, D>(
    dynamics: &D,
    state: &[T],
    time: T,
    gradient: &[T],
) -> Result<(T, Vec<T>), &'static str>
where
    T: Float,
    D: ControlAffineDynamics<T> + ?Sized,
{
    let n = dynamics.state_dim();
    let m = dynamics.control_dim();
    let f = dynamics.drift(state, time);
    let g = dynamics.control_matrix(state, time);
    if gradient.len() != n || f.len() != n || g.len() != n * m {
        return Err("Dimension mismatch");
    }

    let lf = gradient
        .iter()
        .zip(&f)
        .fold(T::zero(), |acc, (&dh, &fi)| acc + dh * fi);

    let mut lg = vec![T::zero(); m];
    for (&dh, row) in gradient.iter().zip(g.chunks_exact(m.max(1))) {
        lg.iter_mut().zip(row).for_each(|(l, &gij)| *l = *l + dh * gij);
    }

    Ok((lf, lg))
}

#[cfg(test)]
mod test {
    use super::lie_derivatives;
    use crate::testing::Unicycle;

    #[test]
    fn test_lie_derivatives() {
        let dynamics = Unicycle { speed: 2.0 };
        let state = [0.0, 0.0, 0.0];
        let gradient = [1.0, 3.0, -0.5];

        let (lf, lg) = lie_derivatives(&dynamics, &state, 0.0, &gradient).unwrap();
        // Heading 0: f = (speed, 0, 0), g = (0, 0, 1)
        assert!((lf - 2.0).abs() < 1e-12);
        assert_eq!(lg.len(), 1);
        assert!((lg[0] + 0.5).abs() < 1e-12);

        assert!(lie_derivatives(&dynamics, &state, 0.0, &gradient[..2]).is_err());
    }
}
