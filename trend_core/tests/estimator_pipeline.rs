use std::f64::consts::LN_2;

use chrono::NaiveDate;
use proptest::prelude::*;
use trend_core::{
    derive_change_metrics, fit_exp, fit_windows, smooth, Direction, ErrCode, TimeSeries,
    TrendConfig, TrendEstimator, TrendFit,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
}

fn rel_err(actual: f64, expected: f64) -> f64 {
    ((actual - expected) / expected).abs()
}

#[test]
fn constant_series_smooths_to_itself() {
    let ts = TimeSeries::from_values(start(), &[12.0; 21]);
    let smoothed = smooth(&ts, 7).unwrap();
    let full: Vec<f64> = smoothed.iter().filter_map(|o| o.value).collect();
    assert_eq!(full.len(), 15);
    assert!(full.iter().all(|v| (v - 12.0).abs() < 1e-12));
}

#[test]
fn exponential_series_is_recovered() {
    let c = 250.0;
    let k = -0.035;
    let values: Vec<f64> = (0..25).map(|i| c * (k * i as f64).exp()).collect();
    let fits = fit_windows(&TimeSeries::from_values(start(), &values), 9).unwrap();
    let fitted: Vec<TrendFit> = fits.into_iter().flatten().collect();
    assert_eq!(fitted.len(), 17);
    for fit in fitted {
        assert!(rel_err(fit.slope, k) < 1e-9);
        assert!(rel_err(fit.intercept, c.ln()) < 1e-9);
    }
}

#[test]
fn zero_inside_only_window_is_skipped() {
    let ts = TimeSeries::from_values(start(), &[5.0, 0.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]);
    let fits = fit_windows(&ts, 9).unwrap();
    assert_eq!(fits.len(), 9);
    assert!(fits.iter().all(Option::is_none));

    let mut longer = vec![5.0; 15];
    longer[1] = 0.0;
    let fits = fit_windows(&TimeSeries::from_values(start(), &longer), 9).unwrap();
    assert!(fits[4].is_none() && fits[5].is_none());
    assert!(fits[6..11].iter().all(Option::is_some));
}

#[test]
fn short_series_is_insufficient() {
    for n in 0..9 {
        let ts = TimeSeries::from_values(start(), &vec![1.0; n]);
        let err = fit_windows(&ts, 9).unwrap_err();
        assert_eq!(err.errcode, ErrCode::InsufficientData);
    }
}

#[test]
fn weekly_doubling_scenario() {
    let values: Vec<f64> = (0..20).map(|i| 100.0 * 2f64.powf(i as f64 / 7.0)).collect();
    let fits = fit_windows(&TimeSeries::from_values(start(), &values), 9).unwrap();
    for fit in fits[4..16].iter() {
        let m = derive_change_metrics(fit.as_ref().unwrap());
        assert!((m.doubling_or_halving_days - 7.0).abs() < 1e-9);
        assert_eq!(m.direction, Direction::Rising);
        assert!((m.weekly_change_pct - 1.0).abs() < 1e-9);
    }
}

#[test]
fn estimator_flags_stale_latest_fit() {
    let values: Vec<f64> = (0..40).map(|i| 1000.0 * 0.5f64.powf(i as f64 / 10.0)).collect();
    let report = TrendEstimator::new(TrendConfig::default())
        .unwrap()
        .estimate(&TimeSeries::from_values(start(), &values))
        .unwrap();
    let latest = report.latest().unwrap();
    let m = latest.metrics.unwrap();
    assert!(!report.latest_is_current());
    assert_eq!(m.direction, Direction::Falling);
    assert!((m.doubling_or_halving_days - 10.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn metrics_match_closed_forms(a in -0.5f64..0.5, b in -5.0f64..10.0) {
        let fit = TrendFit { slope: a, intercept: b, date: start(), offset: 0 };
        let m = derive_change_metrics(&fit);
        prop_assert!((m.daily_change_pct - (a.exp() - 1.0)).abs() < 1e-9);
        prop_assert!((m.weekly_change_pct - ((7.0 * a).exp() - 1.0)).abs() < 1e-9);
        let ratio = fit_exp(a, b, 2.0) / fit_exp(a, b, 1.0);
        prop_assert!((ratio - a.exp()).abs() < 1e-9);
    }

    #[test]
    fn doubling_time_inverse_law(d in 0.5f64..365.0, rising in any::<bool>()) {
        let slope = if rising { LN_2 / d } else { -LN_2 / d };
        let fit = TrendFit { slope, intercept: 2.0, date: start(), offset: 0 };
        let m = derive_change_metrics(&fit);
        prop_assert!(rel_err(m.doubling_or_halving_days, d) < 1e-12);
        let expected = if rising { Direction::Rising } else { Direction::Falling };
        prop_assert_eq!(m.direction, expected);
    }

    #[test]
    fn window_fit_recovers_rate(c in 1.0f64..1e5, k in -0.3f64..0.3) {
        let values: Vec<f64> = (0..9).map(|i| c * (k * i as f64).exp()).collect();
        let fit = fit_windows(&TimeSeries::from_values(start(), &values), 9).unwrap()[4].unwrap();
        prop_assert!((fit.slope - k).abs() < 1e-9);
        prop_assert!(rel_err(fit.intercept.exp(), c) < 1e-9);
    }
}
