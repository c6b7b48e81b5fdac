//! A sequence of equally sized tables, linear in time along the leading axis.
use num_traits::Float;

use super::{Bracket, Extrapolation, TimeGrid};

/// Tables sampled at strictly increasing times, evaluated at any time by
/// linear interpolation between the two bracketing samples.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeInterpolant<T> {
    grid: TimeGrid<T>,
    tables: Vec<Vec<T>>,
    extrapolation: Extrapolation,
}

impl<T: Float> TimeInterpolant<T> {
    /// # Errors
    /// * If the times are invalid (see [`TimeGrid::new`])
    /// * If the number of tables does not match the number of times
    /// * If the tables are empty or differ in length
    pub fn new(
        times: Vec<T>,
        tables: Vec<Vec<T>>,
        extrapolation: Extrapolation,
    ) -> Result<Self, &'static str> {
        let grid = TimeGrid::new(times)?;
        if tables.len() != grid.len() {
            return Err("Dimension mismatch");
        }
        let len = tables[0].len();
        if len == 0 || tables.iter().any(|t| t.len() != len) {
            return Err("Dimension mismatch");
        }

        Ok(Self {
            grid,
            tables,
            extrapolation,
        })
    }

    /// Replace the out-of-range policy
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn times(&self) -> &[T] {
        self.grid.times()
    }

    pub fn tables(&self) -> &[Vec<T>] {
        &self.tables
    }

    /// Stored table at sample index `i`
    pub fn table(&self, i: usize) -> &[T] {
        &self.tables[i]
    }

    /// Number of entries in each table
    pub fn table_len(&self) -> usize {
        self.tables[0].len()
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Contributing samples and weights for time `t`
    #[inline]
    pub fn bracket(&self, t: T) -> Result<Bracket<T>, &'static str> {
        self.grid.bracket(t, self.extrapolation)
    }

    /// Write the table interpolated at time `t` into `out`.
    pub fn at_into(&self, t: T, out: &mut [T]) -> Result<(), &'static str> {
        if out.len() != self.table_len() {
            return Err("Dimension mismatch");
        }
        let Bracket { lo, hi, w_lo, w_hi } = self.bracket(t)?;

        out.iter_mut()
            .zip(self.tables[lo].iter().zip(&self.tables[hi]))
            .for_each(|(o, (&a, &b))| *o = blend(a, w_lo, b, w_hi));

        Ok(())
    }

    /// Table interpolated at time `t`, allocating for the output.
    pub fn at(&self, t: T) -> Result<Vec<T>, &'static str> {
        let mut out = vec![T::zero(); self.table_len()];
        self.at_into(t, &mut out)?;
        Ok(out)
    }
}

/// Weighted sum that returns a sample exactly when it carries all the weight,
/// so values stored at a sample time are reproduced bit for bit.
#[inline]
pub(crate) fn blend<T: Float>(a: T, w_a: T, b: T, w_b: T) -> T {
    if w_b == T::zero() {
        a
    } else if w_a == T::zero() {
        b
    } else {
        a * w_a + b * w_b
    }
}
