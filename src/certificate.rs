//! Contracts shared by every certificate representation.
//!
//! [`Certificate`] is what `tabularize` consumes: anything that can evaluate
//! a batch of states at a time and names the dynamics it was built for.
//! [`GridField`] is the query surface of a grid-backed certificate: clipping,
//! point evaluation and gradient, and their batched forms.
//!
//! Batched states use the same layout as grid coordinates: one slice per
//! state dimension, each holding that coordinate for every state in the batch.
use num_traits::Float;

use crate::config::TabularConfig;
use crate::error::CbfError;
use crate::grid::{Domain, Grid};

/// Time argument of a batched query: one time for the whole batch,
/// or one time per state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeInput<'a, T> {
    Scalar(T),
    PerState(&'a [T]),
}

impl<T: Float> TimeInput<'_, T> {
    /// Time for the `i`th state of the batch
    #[inline]
    pub fn at(&self, i: usize) -> Result<T, CbfError> {
        match self {
            Self::Scalar(t) => Ok(*t),
            Self::PerState(ts) => ts
                .get(i)
                .copied()
                .ok_or(CbfError::DimensionMismatch("one time per state is required")),
        }
    }

    fn check_len(&self, n: usize) -> Result<(), CbfError> {
        match self {
            Self::PerState(ts) if ts.len() != n => {
                Err(CbfError::DimensionMismatch("one time per state is required"))
            }
            _ => Ok(()),
        }
    }
}

impl<T: Float> From<T> for TimeInput<'_, T> {
    fn from(t: T) -> Self {
        Self::Scalar(t)
    }
}

impl<'a, T: Float> From<&'a [T]> for TimeInput<'a, T> {
    fn from(ts: &'a [T]) -> Self {
        Self::PerState(ts)
    }
}

/// A certificate function that can be sampled in bulk.
pub trait Certificate<T: Float> {
    type Dynamics;

    /// Dynamics the certificate was constructed for
    fn dynamics(&self) -> &Self::Dynamics;

    /// Evaluate at every state of a batch at a single time.
    ///
    /// `states` holds one slice per state dimension; `out` one value per state.
    fn values(&self, states: &[&[T]], time: T, out: &mut [T]) -> Result<(), CbfError>;
}

/// Clamp `state` into `[lo + margin, hi - margin]` on every axis.
///
/// NaN coordinates are rejected rather than clamped.
pub(crate) fn clip_into<T: Float>(
    domain: &Domain<T>,
    margin: T,
    state: &[T],
    out: &mut [T],
) -> Result<(), CbfError> {
    let n = domain.ndims();
    if state.len() != n || out.len() != n {
        return Err(CbfError::DimensionMismatch("state does not match grid dimension"));
    }
    if state.iter().any(|x| x.is_nan()) {
        return Err(CbfError::InvalidInput("state coordinate is NaN"));
    }
    for j in 0..n {
        out[j] = state[j]
            .max(domain.lo[j] + margin)
            .min(domain.hi[j] - margin);
    }
    Ok(())
}

/// Check the layout of a batch of states and return the batch size.
fn batch_len<T>(ndims: usize, states: &[&[T]]) -> Result<usize, CbfError> {
    if ndims == 0 || states.len() != ndims {
        return Err(CbfError::DimensionMismatch("one coordinate slice per dimension is required"));
    }
    let n = states.first().map_or(0, |x| x.len());
    if states.iter().any(|x| x.len() != n) {
        return Err(CbfError::DimensionMismatch("coordinate slices differ in length"));
    }
    Ok(n)
}

/// A scalar certificate backed by tables on a grid.
///
/// Implementors provide the point queries; clipping and the batched forms
/// follow from them. Every batched entry is evaluated independently and is
/// identical to the corresponding point query.
pub trait GridField<T: Float> {
    type Grid: Grid<T>;

    fn grid(&self) -> &Self::Grid;

    fn config(&self) -> &TabularConfig<T>;

    /// Value at `state` and `time`, after clipping `state` into the grid interior.
    ///
    /// # Errors
    /// * [`CbfError::Unpopulated`] if no table has been assigned
    fn evaluate(&self, state: &[T], time: T) -> Result<T, CbfError>;

    /// Spatial gradient at `state` and `time`, written into `out` (length `ndims`).
    ///
    /// # Errors
    /// * [`CbfError::Unpopulated`] if no table has been assigned
    fn gradient_into(&self, state: &[T], time: T, out: &mut [T]) -> Result<(), CbfError>;

    /// Spatial gradient at `state` and `time`, allocating for the output.
    fn gradient(&self, state: &[T], time: T) -> Result<Vec<T>, CbfError> {
        let mut out = vec![T::zero(); self.grid().ndims()];
        self.gradient_into(state, time, &mut out)?;
        Ok(out)
    }

    /// Project `state` into the strict interior of the grid domain.
    ///
    /// Out-of-domain coordinates are clamped, never rejected.
    ///
    /// # Errors
    /// * [`CbfError::InvalidInput`] if any coordinate is NaN
    fn clip_state_into(&self, state: &[T], out: &mut [T]) -> Result<(), CbfError> {
        clip_into(self.grid().domain(), self.config().clip_margin, state, out)
    }

    fn clip_state(&self, state: &[T]) -> Result<Vec<T>, CbfError> {
        let mut out = vec![T::zero(); state.len()];
        self.clip_state_into(state, &mut out)?;
        Ok(out)
    }

    /// Evaluate a batch of states, one output per state.
    fn evaluate_batch(
        &self,
        states: &[&[T]],
        time: TimeInput<'_, T>,
        out: &mut [T],
    ) -> Result<(), CbfError> {
        let ndims = self.grid().ndims();
        let n = batch_len(ndims, states)?;
        time.check_len(n)?;
        if out.len() != n {
            return Err(CbfError::DimensionMismatch("one output per state is required"));
        }

        let mut state = vec![T::zero(); ndims];
        for (i, o) in out.iter_mut().enumerate() {
            state.iter_mut().zip(states).for_each(|(s, col)| *s = col[i]);
            *o = self.evaluate(&state, time.at(i)?)?;
        }
        Ok(())
    }

    fn evaluate_batch_alloc(
        &self,
        states: &[&[T]],
        time: TimeInput<'_, T>,
    ) -> Result<Vec<T>, CbfError> {
        let n = states.first().map_or(0, |x| x.len());
        let mut out = vec![T::zero(); n];
        self.evaluate_batch(states, time, &mut out)?;
        Ok(out)
    }

    /// Gradient at each state of a batch, `ndims` outputs per state in state order.
    fn gradient_batch(
        &self,
        states: &[&[T]],
        time: TimeInput<'_, T>,
        out: &mut [T],
    ) -> Result<(), CbfError> {
        let ndims = self.grid().ndims();
        let n = batch_len(ndims, states)?;
        time.check_len(n)?;
        if out.len() != n * ndims {
            return Err(CbfError::DimensionMismatch("one gradient per state is required"));
        }

        let mut state = vec![T::zero(); ndims];
        for (i, o) in out.chunks_exact_mut(ndims).enumerate() {
            state.iter_mut().zip(states).for_each(|(s, col)| *s = col[i]);
            self.gradient_into(&state, time.at(i)?, o)?;
        }
        Ok(())
    }

    fn gradient_batch_alloc(
        &self,
        states: &[&[T]],
        time: TimeInput<'_, T>,
    ) -> Result<Vec<T>, CbfError> {
        let n = states.first().map_or(0, |x| x.len());
        let mut out = vec![T::zero(); n * self.grid().ndims()];
        self.gradient_batch(states, time, &mut out)?;
        Ok(out)
    }
}
