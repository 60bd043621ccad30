use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use trend_core::{Direction, TrendReport, TrendRow};

/// Flat CSV row; empty cells where nothing is available.
#[derive(Debug, Serialize)]
struct CsvRow {
    date: NaiveDate,
    raw: Option<f64>,
    smoothed: Option<f64>,
    slope: Option<f64>,
    intercept: Option<f64>,
    daily_change_pct: Option<f64>,
    weekly_change_pct: Option<f64>,
    doubling_or_halving_days: Option<f64>,
    direction: Option<Direction>,
}

impl From<&TrendRow> for CsvRow {
    fn from(row: &TrendRow) -> Self {
        Self {
            date: row.date,
            raw: row.raw,
            smoothed: row.smoothed,
            slope: row.fit.map(|f| f.slope),
            intercept: row.fit.map(|f| f.intercept),
            daily_change_pct: row.metrics.map(|m| m.daily_change_pct),
            weekly_change_pct: row.metrics.map(|m| m.weekly_change_pct),
            doubling_or_halving_days: row.metrics.map(|m| m.doubling_or_halving_days),
            direction: row.metrics.map(|m| m.direction),
        }
    }
}

pub fn write_csv(path: &Path, report: &TrendReport) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {:?}", path))?;
    for row in &report.rows {
        wtr.serialize(CsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// JSON summary of the latest trend for one area
#[derive(Debug, Serialize)]
pub struct AreaSummary<'a> {
    pub area: &'a str,
    pub last_date: Option<NaiveDate>,
    pub latest: Option<&'a TrendRow>,
    pub latest_is_current: bool,
    pub projection: Option<(NaiveDate, f64)>,
}

impl<'a> AreaSummary<'a> {
    pub fn new(area: &'a str, report: &'a TrendReport, project_days: i64) -> Self {
        Self {
            area,
            last_date: report.rows.last().map(|r| r.date),
            latest: report.latest(),
            latest_is_current: report.latest_is_current(),
            projection: report.project(project_days),
        }
    }
}

fn signed_pct(fraction: f64) -> String {
    format!("{:+.1}%", fraction * 100.0)
}

/// One line of text, e.g.
/// `north: 2021-01-10 rising, +5.2% daily, +42.6% weekly, doubling every 13.6 days`.
pub fn summary_line(area: &str, report: &TrendReport) -> String {
    let Some(row) = report.latest() else {
        return format!("{}: no trend available", area);
    };
    let Some(m) = row.metrics else {
        return format!("{}: no trend available", area);
    };

    let period = if m.is_stable() {
        "stable".to_string()
    } else {
        let verb = match m.direction {
            Direction::Rising => "doubling",
            Direction::Falling => "halving",
        };
        format!("{} every {:.1} days", verb, m.doubling_or_halving_days)
    };

    let mut line = format!(
        "{}: {} {}, {} daily, {} weekly, {}",
        area,
        row.date,
        m.direction,
        signed_pct(m.daily_change_pct),
        signed_pct(m.weekly_change_pct),
        period
    );
    if let Some(last) = report.rows.last() {
        if last.date != row.date {
            let behind = last.date.signed_duration_since(row.date).num_days();
            line.push_str(&format!(" (latest fit {} days behind {})", behind, last.date));
        }
    }
    line
}
