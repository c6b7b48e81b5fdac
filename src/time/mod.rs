//! Piecewise-linear interpolation along a time axis.
//!
//! This is the one-dimensional special case used to turn a sequence of
//! tables sampled at increasing times into a function of continuous time.
//! Lookup is a bisection over the sample times, and extrapolation outside
//! the sampled range follows an explicit [`Extrapolation`] policy.

pub mod interpolant;

pub use interpolant::TimeInterpolant;

use num_traits::Float;

/// Where an observation falls relative to the sampled range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extrap {
    Inside,
    OutsideLow,
    OutsideHigh,
}

/// Policy for times outside the sampled range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolation {
    /// Hold the first or last sample
    #[default]
    Hold,
    /// Extend the first or last segment linearly
    Linear,
    /// Reject the query
    Error,
}

/// The two samples contributing to a time query, and their weights.
///
/// `hi == lo + 1`, and `w_lo + w_hi == 1`. Under [`Extrapolation::Linear`]
/// one of the weights may be negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket<T> {
    pub lo: usize,
    pub hi: usize,
    pub w_lo: T,
    pub w_hi: T,
}

/// Sorted sample times.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid<T> {
    times: Vec<T>,
}

impl<T: Float> TimeGrid<T> {
    /// # Errors
    /// * If there are fewer than two times
    /// * If any time is not finite
    /// * If the times are not strictly increasing
    pub fn new(times: Vec<T>) -> Result<Self, &'static str> {
        if times.len() < 2 {
            return Err("At least two time samples are required");
        }
        if !times.iter().all(|t| t.is_finite()) {
            return Err("Unrepresentable time");
        }
        if !times.windows(2).all(|w| w[1] > w[0]) {
            return Err("Times must be strictly increasing");
        }

        Ok(Self { times })
    }

    pub fn times(&self) -> &[T] {
        &self.times
    }

    pub(crate) fn len(&self) -> usize {
        self.times.len()
    }

    /// Index of the lower sample of the segment used for `t`,
    /// clipped so that a full segment is always available.
    #[inline]
    pub fn index(&self, t: T) -> (usize, Extrap) {
        let n = self.times.len();
        let i = ((self.times.partition_point(|v| v < &t) as isize - 1).max(0) as usize).min(n - 2);

        let extrap = match t {
            x if x < self.times[0] => Extrap::OutsideLow,
            x if x > self.times[n - 1] => Extrap::OutsideHigh,
            _ => Extrap::Inside,
        };

        (i, extrap)
    }

    /// Find the contributing samples and weights for `t`.
    ///
    /// # Errors
    /// * If `t` is NaN
    /// * If `t` is outside the sampled range and the policy is [`Extrapolation::Error`]
    #[inline]
    pub fn bracket(&self, t: T, policy: Extrapolation) -> Result<Bracket<T>, &'static str> {
        if t.is_nan() {
            return Err("Unrepresentable time");
        }
        let (lo, extrap) = self.index(t);
        let (t0, t1) = (self.times[lo], self.times[lo + 1]);

        let frac = match (extrap, policy) {
            (Extrap::Inside, _) | (_, Extrapolation::Linear) => (t - t0) / (t1 - t0),
            (Extrap::OutsideLow, Extrapolation::Hold) => T::zero(),
            (Extrap::OutsideHigh, Extrapolation::Hold) => T::one(),
            (_, Extrapolation::Error) => return Err("Time outside sampled range"),
        };

        Ok(Bracket {
            lo,
            hi: lo + 1,
            w_lo: T::one() - frac,
            w_hi: frac,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Extrap, Extrapolation, TimeGrid};

    #[test]
    fn test_index_and_bracket() {
        let g = TimeGrid::new(vec![0.0_f64, 1.0, 3.0]).unwrap();

        assert_eq!(g.index(0.5), (0, Extrap::Inside));
        assert_eq!(g.index(2.0), (1, Extrap::Inside));
        assert_eq!(g.index(-1.0), (0, Extrap::OutsideLow));
        assert_eq!(g.index(4.0), (1, Extrap::OutsideHigh));

        let b = g.bracket(2.5, Extrapolation::Hold).unwrap();
        assert_eq!((b.lo, b.hi), (1, 2));
        assert!((b.w_hi - 0.75).abs() < 1e-12);
        assert!((b.w_lo - 0.25).abs() < 1e-12);

        // Exactly on a sample, all weight goes to that sample
        let b = g.bracket(1.0, Extrapolation::Hold).unwrap();
        assert_eq!(b.hi, 1);
        assert_eq!(b.w_hi, 1.0);
        assert_eq!(b.w_lo, 0.0);
    }

    #[test]
    fn test_extrapolation_policies() {
        let g = TimeGrid::new(vec![0.0_f64, 1.0]).unwrap();

        let b = g.bracket(2.0, Extrapolation::Hold).unwrap();
        assert_eq!((b.w_lo, b.w_hi), (0.0, 1.0));
        let b = g.bracket(-2.0, Extrapolation::Hold).unwrap();
        assert_eq!((b.w_lo, b.w_hi), (1.0, 0.0));

        let b = g.bracket(2.0, Extrapolation::Linear).unwrap();
        assert_eq!((b.w_lo, b.w_hi), (-1.0, 2.0));

        assert!(g.bracket(2.0, Extrapolation::Error).is_err());
        assert!(g.bracket(1.0, Extrapolation::Error).is_ok());
        assert!(g.bracket(f64::NAN, Extrapolation::Hold).is_err());
    }

    #[test]
    fn test_rejects_bad_times() {
        assert!(TimeGrid::new(vec![0.0_f64]).is_err());
        assert!(TimeGrid::new(vec![0.0_f64, 0.0]).is_err());
        assert!(TimeGrid::new(vec![1.0_f64, 0.0]).is_err());
        assert!(TimeGrid::new(vec![0.0_f64, f64::INFINITY]).is_err());
    }
}
