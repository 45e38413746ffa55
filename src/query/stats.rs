//! Statistics Engine
//!
//! Reductions over reading values. All functions sort a private copy, so the
//! caller's order never matters, and all reject empty input.
//!
//! Quantiles use linear interpolation between order statistics: for sorted
//! values `v` and fraction `q`, the position is `h = q * (n - 1)` and the
//! result is `v[floor(h)] + frac(h) * (v[floor(h) + 1] - v[floor(h)])`.

use crate::query::error::StatsError;
use serde::Serialize;

/// First and third quartile of a value set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub quartile_1: f64,
    pub quartile_3: f64,
}

fn sorted(values: &[i64]) -> Result<Vec<i64>, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Ok(sorted)
}

/// Middle order statistic, or the mean of the two middle ones
pub fn median(values: &[i64]) -> Result<f64, StatsError> {
    let v = sorted(values)?;
    let n = v.len();

    Ok(if n % 2 == 0 {
        (v[n / 2 - 1] as f64 + v[n / 2] as f64) / 2.0
    } else {
        v[n / 2] as f64
    })
}

/// Arithmetic mean, computed in floating point
pub fn mean(values: &[i64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sum: i64 = values.iter().sum();
    Ok(sum as f64 / values.len() as f64)
}

/// Linear-interpolation quantile for `q` in `[0, 1]`
pub fn quantile(values: &[i64], q: f64) -> Result<f64, StatsError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(StatsError::InvalidQuantile(q));
    }
    let v = sorted(values)?;
    Ok(interpolate(&v, q))
}

/// Both quartiles from a single sort
pub fn quartiles(values: &[i64]) -> Result<Quartiles, StatsError> {
    let v = sorted(values)?;
    Ok(Quartiles {
        quartile_1: interpolate(&v, 0.25),
        quartile_3: interpolate(&v, 0.75),
    })
}

// `sorted` must be non-empty and ascending.
fn interpolate(sorted: &[i64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lo = position.floor() as usize;
    let fraction = position - lo as f64;

    let lower = sorted[lo] as f64;
    match sorted.get(lo + 1) {
        Some(&upper) => lower + fraction * (upper as f64 - lower),
        None => lower,
    }
}
