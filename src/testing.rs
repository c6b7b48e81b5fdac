use num_traits::Float;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::certificate::Certificate;
use crate::dynamics::{ControlAffineDynamics, Dynamics};
use crate::error::CbfError;
use crate::grid::Domain;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// `n` random states uniformly inside `[lo + margin, hi - margin]`,
/// as one coordinate column per dimension
pub fn random_states(
    rng: &mut StdRng,
    domain: &Domain<f64>,
    margin: f64,
    n: usize,
) -> Vec<Vec<f64>> {
    domain
        .lo
        .iter()
        .zip(&domain.hi)
        .map(|(&lo, &hi)| {
            randn::<f64>(rng, n)
                .into_iter()
                .map(|r| (lo + margin) + r * (hi - lo - 2.0 * margin))
                .collect()
        })
        .collect()
}

/// `x' = u` with each control component bounded by `max_speed`
#[derive(Clone, Debug, PartialEq)]
pub struct SingleIntegrator {
    pub dim: usize,
    pub max_speed: f64,
}

impl Dynamics<f64> for SingleIntegrator {
    fn state_dim(&self) -> usize {
        self.dim
    }

    fn hamiltonian(&self, _state: &[f64], _reference: f64, _value: f64, gradient: &[f64]) -> f64 {
        self.max_speed * gradient.iter().map(|g| g.abs()).sum::<f64>()
    }
}

impl ControlAffineDynamics<f64> for SingleIntegrator {
    fn control_dim(&self) -> usize {
        self.dim
    }

    fn drift(&self, _state: &[f64], _time: f64) -> Vec<f64> {
        vec![0.0; self.dim]
    }

    fn control_matrix(&self, _state: &[f64], _time: f64) -> Vec<f64> {
        let mut g = vec![0.0; self.dim * self.dim];
        (0..self.dim).for_each(|i| g[i * self.dim + i] = 1.0);
        g
    }
}

/// Constant-speed unicycle with state `(x, y, heading)` and unit-bounded turn rate
#[derive(Clone, Debug, PartialEq)]
pub struct Unicycle {
    pub speed: f64,
}

impl Dynamics<f64> for Unicycle {
    fn state_dim(&self) -> usize {
        3
    }

    fn hamiltonian(&self, state: &[f64], _reference: f64, _value: f64, gradient: &[f64]) -> f64 {
        let f = self.drift(state, 0.0);
        gradient[0] * f[0] + gradient[1] * f[1] + gradient[2].abs()
    }
}

impl ControlAffineDynamics<f64> for Unicycle {
    fn control_dim(&self) -> usize {
        1
    }

    fn drift(&self, state: &[f64], _time: f64) -> Vec<f64> {
        vec![self.speed * state[2].cos(), self.speed * state[2].sin(), 0.0]
    }

    fn control_matrix(&self, _state: &[f64], _time: f64) -> Vec<f64> {
        vec![0.0, 0.0, 1.0]
    }
}

/// Exact certificate `h(x, t) = a · x + b + rate * t`
#[derive(Clone, Debug)]
pub struct AffineCertificate<D> {
    pub dynamics: D,
    pub a: Vec<f64>,
    pub b: f64,
    pub rate: f64,
}

impl<D> AffineCertificate<D> {
    pub fn eval(&self, x: &[f64], t: f64) -> f64 {
        self.a.iter().zip(x).map(|(a, x)| a * x).sum::<f64>() + self.b + self.rate * t
    }
}

impl<D> Certificate<f64> for AffineCertificate<D> {
    type Dynamics = D;

    fn dynamics(&self) -> &D {
        &self.dynamics
    }

    fn values(&self, states: &[&[f64]], time: f64, out: &mut [f64]) -> Result<(), CbfError> {
        if states.len() != self.a.len() {
            return Err(CbfError::Certificate(format!(
                "expected {} dimensions, got {}",
                self.a.len(),
                states.len()
            )));
        }
        for (i, o) in out.iter_mut().enumerate() {
            let x: Vec<f64> = states.iter().map(|col| col[i]).collect();
            *o = self.eval(&x, time);
        }
        Ok(())
    }
}

/// Absolute-difference check over two slices
pub fn assert_close<T: Float + std::fmt::Debug>(a: &[T], b: &[T], atol: T) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert!((*x - *y).abs() <= atol, "{x:?} != {y:?}");
    }
}
