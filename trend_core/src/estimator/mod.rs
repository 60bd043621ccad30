pub mod trend_estimator;
