//! Convenience methods for constructing grids in a way that echoes,
//! but does not exactly match, methods common in scripting languages.
use itertools::Itertools;
use num_traits::{Float, NumCast};

/// Generates `n` evenly spaced values from start to stop,
/// including the endpoint.
///
/// # Errors
/// * If `n` is not representable in the value type `T`
pub fn linspace<T>(start: T, stop: T, n: usize) -> Result<Vec<T>, &'static str>
where
    T: Float,
{
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![start]),
        _ => {
            let span = <T as NumCast>::from(n - 1).ok_or("Unrepresentable number")?;
            let dx = (stop - start) / span;
            (0..n)
                .map(|i| {
                    <T as NumCast>::from(i)
                        .map(|fi| start + fi * dx)
                        .ok_or("Unrepresentable number")
                })
                .collect()
        }
    }
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn),
/// returned as one coordinate column per axis rather than one row per point,
/// which is the layout the batched query methods take.
pub fn meshgrid<T>(x: &[&[T]]) -> Vec<Vec<T>>
where
    T: Float,
{
    let npoints: usize = x.iter().map(|xx| xx.len()).product();
    let mut columns = vec![Vec::with_capacity(npoints); x.len()];
    if x.is_empty() {
        return columns;
    }

    for point in x.iter().map(|xx| xx.iter()).multi_cartesian_product() {
        columns
            .iter_mut()
            .zip(point)
            .for_each(|(col, v)| col.push(*v));
    }

    columns
}
