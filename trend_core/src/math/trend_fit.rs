use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{
    time::day_offset,
    trend_error::{ErrCode, TrendError, TrendResult},
};
use crate::series::TimeSeries;

pub const DEFAULT_FIT_WINDOW: usize = 9;

/// Exponential trend `value(x) = exp(intercept) * exp(slope * x)` fitted over
/// one centered window, `x` being days since the first date of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    /// Center date of the window
    pub date: NaiveDate,
    /// Day offset of `date` from the series origin
    pub offset: i64,
}

impl TrendFit {
    /// Model value at day offset `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        fit_exp(self.slope, self.intercept, x)
    }

    /// Log of the model value at the window center. Far from the origin the
    /// intercept alone can be outside the range `exp` can represent.
    pub fn center_log_value(&self) -> f64 {
        self.intercept + self.slope * self.offset as f64
    }

    /// Model value at the window center.
    pub fn center_value(&self) -> f64 {
        self.center_log_value().exp()
    }

    /// Extrapolate the fitted curve to an arbitrary calendar date.
    pub fn project(&self, date: NaiveDate) -> f64 {
        let days = day_offset(self.date, date) as f64;
        fit_exp(self.slope, self.center_log_value(), days)
    }
}

/// Evaluate the exponential model at `x`.
pub fn fit_exp(slope: f64, intercept: f64, x: f64) -> f64 {
    (intercept + slope * x).exp()
}

/// Least-squares fit of `ln(value) = slope * x + intercept`.
///
/// Returns `None` when fewer than two points are given, when any value is not
/// strictly positive, or when all `x` coincide. Identical values give a slope
/// of exactly zero.
pub fn fit_window(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 || points.iter().any(|&(_, v)| !(v > 0.0 && v.is_finite())) {
        return None;
    }

    let first = points[0].1;
    if points.iter().all(|&(_, v)| v == first) {
        return Some((0.0, first.ln()));
    }

    let n = points.len() as f64;
    let logs: Vec<f64> = points.iter().map(|&(_, v)| v.ln()).collect();
    let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / n;
    let mean_y = logs.iter().sum::<f64>() / n;

    let (sxx, sxy) = points
        .iter()
        .zip(&logs)
        .fold((0.0, 0.0), |(sxx, sxy), (&(x, _), &y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Fit every centered window of width `w` along the series.
///
/// The result has one entry per observation. Entries are `None` near the
/// edges and wherever the window holds a missing or non-positive value.
pub fn fit_windows(series: &TimeSeries, w: usize) -> TrendResult<Vec<Option<TrendFit>>> {
    if w < 3 || w % 2 == 0 {
        return Err(TrendError::new(
            format!("fit window must be odd and at least 3, got {}", w),
            ErrCode::ParaError,
        ));
    }
    if series.len() < w {
        return Err(TrendError::insufficient_data(w, series.len()));
    }

    let offsets = series.offsets();
    let half = w / 2;

    let fits = (0..series.len())
        .map(|i| {
            let window = series.centered_window(i, w)?;
            if window.iter().any(|obs| !obs.is_loggable()) {
                debug!(date = %series[i].date, "skipping window with missing or non-positive value");
                return None;
            }
            let points: Vec<(f64, f64)> = window
                .iter()
                .zip(&offsets[i - half..=i + half])
                .filter_map(|(obs, &x)| obs.value.map(|v| (x as f64, v)))
                .collect();
            let (slope, intercept) = fit_window(&points)?;
            Some(TrendFit {
                slope,
                intercept,
                date: series[i].date,
                offset: offsets[i],
            })
        })
        .collect();

    Ok(fits)
}
