use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::common::{enums::NegativePolicy, trend_error::TrendResult};
use crate::config::trend_config::TrendConfig;
use crate::math::{
    change_metrics::{derive_all, ChangeMetrics},
    rolling_mean::smooth,
    trend_fit::{fit_windows, TrendFit},
};
use crate::series::TimeSeries;

/// Everything the estimator knows about one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    pub raw: Option<f64>,
    pub smoothed: Option<f64>,
    pub fit: Option<TrendFit>,
    pub metrics: Option<ChangeMetrics>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendReport {
    pub rows: Vec<TrendRow>,
}

impl TrendReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fits(&self) -> Vec<Option<TrendFit>> {
        self.rows.iter().map(|r| r.fit).collect()
    }

    pub fn metrics(&self) -> Vec<Option<ChangeMetrics>> {
        self.rows.iter().map(|r| r.metrics).collect()
    }

    /// Most recent row that carries a fit.
    pub fn latest(&self) -> Option<&TrendRow> {
        self.rows.iter().rev().find(|r| r.fit.is_some())
    }

    /// Whether the latest fit sits on the last date of the series. Reports
    /// should flag or omit the trend figure when it does not.
    pub fn latest_is_current(&self) -> bool {
        match (self.latest(), self.rows.last()) {
            (Some(latest), Some(last)) => latest.date == last.date,
            _ => false,
        }
    }

    /// Extrapolate the latest fit to `days` after the last date of the series.
    /// `None` without a fit or when the target date is out of calendar range.
    pub fn project(&self, days: i64) -> Option<(NaiveDate, f64)> {
        let fit = self.latest()?.fit?;
        let date = self
            .rows
            .last()?
            .date
            .checked_add_signed(Duration::try_days(days)?)?;
        Some((date, fit.project(date)))
    }
}

/// Runs the smoothing, fitting and metric steps over one series.
#[derive(Debug, Clone, Default)]
pub struct TrendEstimator {
    config: TrendConfig,
}

impl TrendEstimator {
    pub fn new(config: TrendConfig) -> TrendResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Observations between the newest possible fit and the end of the series:
    /// the trailing half of the smoothing window plus half the fit window.
    pub fn window_lag(&self) -> usize {
        let smooth_lag = if self.config.smooth_before_fit {
            let n = self.config.smooth_window;
            n - n / 2 - 1
        } else {
            0
        };
        smooth_lag + self.config.fit_window / 2
    }

    /// Prepare the series as configured: fill gaps, then apply the negative
    /// value policy.
    pub fn prepare(&self, series: &TimeSeries) -> TimeSeries {
        let filled = series.fill_gaps(self.config.gap_fill);
        if filled.len() != series.len() {
            debug!(
                inserted = filled.len() - series.len(),
                policy = %self.config.gap_fill,
                "filled calendar gaps"
            );
        }
        match self.config.negative_policy {
            NegativePolicy::Keep => filled,
            NegativePolicy::Clip => {
                let (clipped, count) = filled.clip_negative();
                if count > 0 {
                    warn!(count, "clipped negative values to zero");
                }
                clipped
            }
        }
    }

    pub fn estimate(&self, series: &TimeSeries) -> TrendResult<TrendReport> {
        let prepared = self.prepare(series);
        let smoothed = if self.config.smooth_before_fit {
            smooth(&prepared, self.config.smooth_window)?
        } else {
            prepared.clone()
        };

        let fits = fit_windows(&smoothed, self.config.fit_window)?;
        let metrics = derive_all(&fits);

        let rows: Vec<TrendRow> = prepared
            .iter()
            .zip(smoothed.iter())
            .zip(fits.into_iter().zip(metrics))
            .map(|((raw, smoothed), (fit, metrics))| TrendRow {
                date: raw.date,
                raw: raw.value,
                smoothed: smoothed.value,
                fit,
                metrics,
            })
            .collect();

        let report = TrendReport { rows };
        let behind = report
            .rows
            .iter()
            .rev()
            .position(|r| r.fit.is_some());
        if behind.map_or(true, |behind| behind > self.window_lag()) {
            warn!(
                latest = ?report.latest().map(|r| r.date),
                last = ?report.rows.last().map(|r| r.date),
                "latest fit is further behind the last date than the windows require"
            );
        }
        info!(
            points = report.len(),
            fits = report.rows.iter().filter(|r| r.fit.is_some()).count(),
            latest = ?report.latest().map(|r| r.date),
            "trend estimate completed"
        );
        Ok(report)
    }
}
