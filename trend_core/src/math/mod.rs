pub mod change_metrics;
pub mod rolling_mean;
pub mod trend_fit;
