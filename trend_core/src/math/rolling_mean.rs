use crate::common::trend_error::{ErrCode, TrendError, TrendResult};
use crate::series::TimeSeries;

pub const DEFAULT_SMOOTH_WINDOW: usize = 7;

/// Centered rolling mean over `n` consecutive observations.
///
/// For odd `n` position `i` averages `[i - (n-1)/2, i + (n-1)/2]`. For even `n`
/// the window is `[i - n/2, i + n/2 - 1]`, so the mean is labelled at the later
/// of the two middle observations. Positions without a full window, or whose
/// window holds a missing value, come out missing.
pub fn smooth(series: &TimeSeries, n: usize) -> TrendResult<TimeSeries> {
    if n == 0 {
        return Err(TrendError::new(
            "smoothing window must be positive",
            ErrCode::ParaError,
        ));
    }

    let values = (0..series.len())
        .map(|i| {
            let window = series.centered_window(i, n)?;
            let sum = window
                .iter()
                .map(|obs| obs.value)
                .sum::<Option<f64>>()?;
            Some(sum / n as f64)
        })
        .collect();

    Ok(series.with_values(values))
}
