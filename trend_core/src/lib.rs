pub mod common;
pub mod config;
pub mod estimator;
pub mod math;
pub mod series;

pub use common::enums::{Direction, GapFill, NegativePolicy};
pub use common::trend_error::{ErrCode, TrendError, TrendResult};
pub use config::trend_config::TrendConfig;
pub use estimator::trend_estimator::{TrendEstimator, TrendReport, TrendRow};
pub use math::change_metrics::{derive_all, derive_change_metrics, ChangeMetrics};
pub use math::rolling_mean::smooth;
pub use math::trend_fit::{fit_exp, fit_window, fit_windows, TrendFit};
pub use series::{Observation, TimeSeries};
