use serde::{Deserialize, Serialize};

use super::trend_fit::{fit_exp, TrendFit};
use crate::common::enums::Direction;

/// Human-facing reading of a [`TrendFit`].
///
/// Percentages are fractions: `0.05` means 5 % per period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeMetrics {
    pub daily_change_pct: f64,
    pub weekly_change_pct: f64,
    /// `+inf` when the slope is zero
    pub doubling_or_halving_days: f64,
    pub direction: Direction,
}

impl ChangeMetrics {
    /// A zero slope has no doubling or halving time.
    pub fn is_stable(&self) -> bool {
        self.doubling_or_halving_days.is_infinite()
    }
}

fn relative_change(slope: f64, intercept: f64, from: f64, to: f64) -> f64 {
    let start = fit_exp(slope, intercept, from);
    (fit_exp(slope, intercept, to) - start) / start
}

/// Evaluated around the window center, where the model value is the
/// smoothed value itself and stays finite.
pub fn derive_change_metrics(fit: &TrendFit) -> ChangeMetrics {
    let center = fit.offset as f64;
    let daily_change_pct = relative_change(fit.slope, fit.intercept, center, center + 1.0);
    let weekly_change_pct = relative_change(fit.slope, fit.intercept, center, center + 7.0);
    let doubling_or_halving_days = if fit.slope == 0.0 {
        f64::INFINITY
    } else {
        (std::f64::consts::LN_2 / fit.slope).abs()
    };

    ChangeMetrics {
        daily_change_pct,
        weekly_change_pct,
        doubling_or_halving_days,
        direction: Direction::from_slope(fit.slope),
    }
}

/// Metrics for every fit, keeping the positions of missing fits.
pub fn derive_all(fits: &[Option<TrendFit>]) -> Vec<Option<ChangeMetrics>> {
    fits.iter().map(|fit| fit.as_ref().map(derive_change_metrics)).collect()
}
