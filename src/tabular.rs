//! Static tabular certificates: one value table and its gradient table on a grid.
//!
//! The value table is only ever replaced together with its gradient table
//! (see [`ValueTable`]), so a query can never observe one without the other.
use log::debug;
use num_traits::Float;

use crate::certificate::{Certificate, GridField, TimeInput};
use crate::condition;
use crate::config::TabularConfig;
use crate::dynamics::{self, ControlAffineDynamics, Dynamics};
use crate::error::CbfError;
use crate::grid::Grid;

/// A value table together with the gradient table derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTable<T> {
    values: Vec<T>,
    gradients: Vec<T>,
}

impl<T: Float> ValueTable<T> {
    /// Take ownership of a C-ordered value table and derive its gradients.
    ///
    /// # Errors
    /// * If the table size does not match the grid
    /// * If the grid fails to differentiate the table
    pub fn new<G: Grid<T> + ?Sized>(grid: &G, values: Vec<T>) -> Result<Self, CbfError> {
        if values.len() != grid.size() {
            return Err(CbfError::DimensionMismatch("value table does not match grid shape"));
        }
        let gradients = grid.grad_values(&values).map_err(CbfError::Grid)?;
        Ok(Self { values, gradients })
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// One gradient vector per grid point, grid shape plus a trailing `ndims` axis
    pub fn gradients(&self) -> &[T] {
        &self.gradients
    }

    /// Interpolated value at a point already inside the domain
    #[inline]
    pub(crate) fn value_at<G: Grid<T> + ?Sized>(
        &self,
        grid: &G,
        point: &[T],
    ) -> Result<T, CbfError> {
        grid.interpolate_scalar(&self.values, point)
            .map_err(CbfError::Grid)
    }

    /// Interpolated gradient at a point already inside the domain
    #[inline]
    pub(crate) fn gradient_at<G: Grid<T> + ?Sized>(
        &self,
        grid: &G,
        point: &[T],
        out: &mut [T],
    ) -> Result<(), CbfError> {
        grid.interpolate(&self.gradients, grid.ndims(), point, out)
            .map_err(CbfError::Grid)
    }
}

/// A certificate represented by its values on a grid.
///
/// Starts unpopulated; every query fails with [`CbfError::Unpopulated`] until
/// a table is assigned by [`set_value_table`](Self::set_value_table) or
/// [`tabularize`](Self::tabularize).
#[derive(Clone, Debug)]
pub struct TabularCbf<T, G, D> {
    grid: G,
    dynamics: D,
    config: TabularConfig<T>,
    table: Option<ValueTable<T>>,
}

impl<T, G, D> TabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: Dynamics<T>,
{
    pub fn new(dynamics: D, grid: G) -> Result<Self, CbfError> {
        Self::with_config(dynamics, grid, TabularConfig::default())
    }

    /// # Errors
    /// * If the dynamics' state dimension differs from the grid's
    /// * If the configuration is invalid for the grid domain
    pub fn with_config(dynamics: D, grid: G, config: TabularConfig<T>) -> Result<Self, CbfError> {
        if dynamics.state_dim() != grid.ndims() {
            return Err(CbfError::DimensionMismatch(
                "dynamics state dimension does not match grid dimension",
            ));
        }
        config.validate(grid.domain())?;

        Ok(Self {
            grid,
            dynamics,
            config,
            table: None,
        })
    }

    pub fn dynamics(&self) -> &D {
        &self.dynamics
    }

    pub fn table(&self) -> Option<&ValueTable<T>> {
        self.table.as_ref()
    }

    /// The value table exactly as last assigned
    pub fn value_table(&self) -> Option<&[T]> {
        self.table.as_ref().map(ValueTable::values)
    }

    pub fn gradient_table(&self) -> Option<&[T]> {
        self.table.as_ref().map(ValueTable::gradients)
    }

    pub fn is_populated(&self) -> bool {
        self.table.is_some()
    }

    /// Replace the value table, recomputing the gradient table before the swap.
    ///
    /// On error the previous table (if any) is left in place.
    pub fn set_value_table(&mut self, values: Vec<T>) -> Result<(), CbfError> {
        let table = ValueTable::new(&self.grid, values)?;
        debug!(
            "value table set on {:?} grid ({} points)",
            self.grid.shape(),
            self.grid.size()
        );
        self.table = Some(table);
        Ok(())
    }

    /// Sample an exact certificate at every grid point at `time` and store the result.
    ///
    /// # Errors
    /// * [`CbfError::DynamicsMismatch`] if the certificate's dynamics differ from ours
    /// * Any error the certificate reports while evaluating
    pub fn tabularize<C>(&mut self, certificate: &C, time: T) -> Result<(), CbfError>
    where
        C: Certificate<T, Dynamics = D> + ?Sized,
        D: PartialEq,
    {
        if certificate.dynamics() != &self.dynamics {
            return Err(CbfError::DynamicsMismatch);
        }
        let mut values = vec![T::zero(); self.grid.size()];
        certificate.values(&self.grid.state_slices(), time, &mut values)?;
        self.set_value_table(values)
    }

    /// Certificate-condition residual `H(x, 0, V, ∇V) + γ V` at every grid point.
    pub fn certificate_condition(&self, discount_rate: T) -> Result<Vec<T>, CbfError> {
        let table = self.table.as_ref().ok_or(CbfError::Unpopulated)?;
        condition::certificate_condition(
            &self.grid,
            &self.dynamics,
            table.values(),
            table.gradients(),
            discount_rate,
        )
    }

    fn populated(&self) -> Result<&ValueTable<T>, CbfError> {
        self.table.as_ref().ok_or(CbfError::Unpopulated)
    }
}

impl<T, G, D> GridField<T> for TabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: Dynamics<T>,
{
    type Grid = G;

    fn grid(&self) -> &G {
        &self.grid
    }

    fn config(&self) -> &TabularConfig<T> {
        &self.config
    }

    /// The static table does not depend on `time`.
    fn evaluate(&self, state: &[T], _time: T) -> Result<T, CbfError> {
        let table = self.populated()?;
        let clipped = self.clip_state(state)?;
        table.value_at(&self.grid, &clipped)
    }

    fn gradient_into(&self, state: &[T], _time: T, out: &mut [T]) -> Result<(), CbfError> {
        let table = self.populated()?;
        let clipped = self.clip_state(state)?;
        if out.len() != self.grid.ndims() {
            return Err(CbfError::DimensionMismatch(
                "gradient output does not match grid dimension",
            ));
        }
        table.gradient_at(&self.grid, &clipped, out)
    }
}

impl<T, G, D> Certificate<T> for TabularCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: Dynamics<T>,
{
    type Dynamics = D;

    fn dynamics(&self) -> &D {
        &self.dynamics
    }

    fn values(&self, states: &[&[T]], time: T, out: &mut [T]) -> Result<(), CbfError> {
        self.evaluate_batch(states, TimeInput::Scalar(time), out)
    }
}

/// A tabular certificate restricted to control-affine dynamics,
/// which additionally exposes the Lie derivatives of the table.
#[derive(Clone, Debug)]
pub struct TabularControlAffineCbf<T, G, D> {
    inner: TabularCbf<T, G, D>,
}

impl<T, G, D> TabularControlAffineCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: ControlAffineDynamics<T>,
{
    pub fn new(dynamics: D, grid: G) -> Result<Self, CbfError> {
        Ok(Self {
            inner: TabularCbf::new(dynamics, grid)?,
        })
    }

    pub fn with_config(dynamics: D, grid: G, config: TabularConfig<T>) -> Result<Self, CbfError> {
        Ok(Self {
            inner: TabularCbf::with_config(dynamics, grid, config)?,
        })
    }

    pub fn inner(&self) -> &TabularCbf<T, G, D> {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut TabularCbf<T, G, D> {
        &mut self.inner
    }

    pub fn into_inner(self) -> TabularCbf<T, G, D> {
        self.inner
    }

    pub fn dynamics(&self) -> &D {
        self.inner.dynamics()
    }

    pub fn value_table(&self) -> Option<&[T]> {
        self.inner.value_table()
    }

    pub fn gradient_table(&self) -> Option<&[T]> {
        self.inner.gradient_table()
    }

    pub fn set_value_table(&mut self, values: Vec<T>) -> Result<(), CbfError> {
        self.inner.set_value_table(values)
    }

    pub fn tabularize<C>(&mut self, certificate: &C, time: T) -> Result<(), CbfError>
    where
        C: Certificate<T, Dynamics = D> + ?Sized,
        D: PartialEq,
    {
        self.inner.tabularize(certificate, time)
    }

    pub fn certificate_condition(&self, discount_rate: T) -> Result<Vec<T>, CbfError> {
        self.inner.certificate_condition(discount_rate)
    }

    /// `(∇h · f, ∇h · g)` at `state`, with `∇h` interpolated from the gradient table.
    pub fn lie_derivatives(&self, state: &[T], time: T) -> Result<(T, Vec<T>), CbfError> {
        let gradient = self.inner.gradient(state, time)?;
        dynamics::lie_derivatives(self.inner.dynamics(), state, time, &gradient)
            .map_err(CbfError::DimensionMismatch)
    }
}

impl<T, G, D> GridField<T> for TabularControlAffineCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: ControlAffineDynamics<T>,
{
    type Grid = G;

    fn grid(&self) -> &G {
        self.inner.grid()
    }

    fn config(&self) -> &TabularConfig<T> {
        self.inner.config()
    }

    fn evaluate(&self, state: &[T], time: T) -> Result<T, CbfError> {
        self.inner.evaluate(state, time)
    }

    fn gradient_into(&self, state: &[T], time: T, out: &mut [T]) -> Result<(), CbfError> {
        self.inner.gradient_into(state, time, out)
    }
}

impl<T, G, D> Certificate<T> for TabularControlAffineCbf<T, G, D>
where
    T: Float,
    G: Grid<T>,
    D: ControlAffineDynamics<T>,
{
    type Dynamics = D;

    fn dynamics(&self) -> &D {
        self.inner.dynamics()
    }

    fn values(&self, states: &[&[T]], time: T, out: &mut [T]) -> Result<(), CbfError> {
        self.inner.values(states, time, out)
    }
}
