//! Tunables shared by the static and time-varying tables.
use num_traits::{Float, NumCast};

use crate::error::CbfError;
use crate::grid::Domain;
use crate::time::Extrapolation;

/// Distance kept between clipped query states and the domain boundary
pub const DEFAULT_CLIP_MARGIN: f64 = 0.01;

/// Fewest time samples used when tabulating gradients of a continuous-time table
pub const DEFAULT_MIN_RESAMPLE_STEPS: usize = 21;

/// Settings for a tabular certificate, fixed at construction.
///
/// Start from [`Default`] and adjust with the `with_*` builders; the result is
/// checked against the grid domain when the certificate is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TabularConfig<T> {
    /// Query states are clamped to `[lo + clip_margin, hi - clip_margin]` on every axis.
    pub clip_margin: T,
    /// Floor on the number of evenly spaced times at which gradients are
    /// tabulated when a time-indexed table arrives as a continuous-time function.
    pub min_resample_steps: usize,
    /// Out-of-range policy for time interpolators built from sampled tables.
    pub time_extrapolation: Extrapolation,
}

impl<T: Float> Default for TabularConfig<T> {
    fn default() -> Self {
        Self {
            clip_margin: <T as NumCast>::from(DEFAULT_CLIP_MARGIN).unwrap_or_else(T::epsilon),
            min_resample_steps: DEFAULT_MIN_RESAMPLE_STEPS,
            time_extrapolation: Extrapolation::default(),
        }
    }
}

impl<T: Float> TabularConfig<T> {
    /// Set the distance kept between clipped states and the domain boundary.
    pub fn with_clip_margin(mut self, clip_margin: T) -> Self {
        self.clip_margin = clip_margin;
        self
    }

    /// Set the fewest times at which gradients of a continuous-time table are tabulated.
    pub fn with_min_resample_steps(mut self, min_resample_steps: usize) -> Self {
        self.min_resample_steps = min_resample_steps;
        self
    }

    /// Set the out-of-range policy for time interpolators built from sampled tables.
    ///
    /// A table supplied as a [`TimeInterpolant`](crate::TimeInterpolant) keeps its own policy.
    pub fn with_time_extrapolation(mut self, time_extrapolation: Extrapolation) -> Self {
        self.time_extrapolation = time_extrapolation;
        self
    }

    /// Check that the configuration leaves a nonempty clipped region in `domain`.
    pub fn validate(&self, domain: &Domain<T>) -> Result<(), CbfError> {
        if !(self.clip_margin >= T::zero() && self.clip_margin.is_finite()) {
            return Err(CbfError::InvalidConfig("clip margin must be finite and non-negative"));
        }
        let fits = domain
            .lo
            .iter()
            .zip(&domain.hi)
            .all(|(&lo, &hi)| lo + self.clip_margin <= hi - self.clip_margin);
        if !fits {
            return Err(CbfError::InvalidConfig("clip margin exceeds half the domain width"));
        }
        if self.min_resample_steps < 2 {
            return Err(CbfError::InvalidConfig("at least two resampling steps are required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::TabularConfig;
    use crate::grid::Domain;
    use crate::time::Extrapolation;

    #[test]
    fn test_defaults() {
        let config = TabularConfig::<f64>::default();
        assert_eq!(config.clip_margin, 0.01);
        assert_eq!(config.min_resample_steps, 21);
        assert_eq!(config.time_extrapolation, Extrapolation::Hold);
    }

    #[test]
    fn test_validate() {
        let domain = Domain {
            lo: vec![-1.0_f64, 0.0],
            hi: vec![1.0, 0.1],
        };
        assert!(TabularConfig::default().validate(&domain).is_ok());
        assert!(TabularConfig::default()
            .with_clip_margin(0.06)
            .validate(&domain)
            .is_err());
        assert!(TabularConfig::default()
            .with_clip_margin(-0.1)
            .validate(&domain)
            .is_err());
        assert!(TabularConfig::default()
            .with_min_resample_steps(1)
            .validate(&domain)
            .is_err());
    }
}
