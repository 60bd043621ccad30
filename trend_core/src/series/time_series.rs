use std::ops::Index;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::common::{
    enums::GapFill,
    time::day_offset,
    trend_error::{ErrCode, TrendError, TrendResult},
};

/// One dated observation. `None` marks an explicitly missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value: Some(value),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, value: None }
    }

    /// Present and strictly positive, i.e. usable under a logarithm.
    pub fn is_loggable(&self) -> bool {
        matches!(self.value, Some(v) if v > 0.0 && v.is_finite())
    }
}

/// Date-ordered series with at most one observation per date.
///
/// Serialized as a plain list of observations; deserializing goes through
/// [`TimeSeries::new`] so the ordering checks still apply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct TimeSeries {
    points: Vec<Observation>,
}

impl TryFrom<Vec<Observation>> for TimeSeries {
    type Error = TrendError;

    fn try_from(points: Vec<Observation>) -> TrendResult<Self> {
        Self::new(points)
    }
}

impl From<TimeSeries> for Vec<Observation> {
    fn from(series: TimeSeries) -> Self {
        series.points
    }
}

impl TimeSeries {
    /// Build a series from observations already in strictly increasing date order.
    pub fn new(points: Vec<Observation>) -> TrendResult<Self> {
        for pair in points.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(TrendError::new(
                    format!("duplicate date {}", pair[1].date),
                    ErrCode::DuplicateDate,
                ));
            }
            if pair[1].date < pair[0].date {
                return Err(TrendError::new(
                    format!("{} follows {}", pair[1].date, pair[0].date),
                    ErrCode::SeriesNotOrdered,
                ));
            }
        }
        Ok(Self { points })
    }

    /// Sort observations by date first. Duplicate dates are still rejected.
    pub fn from_unsorted(mut points: Vec<Observation>) -> TrendResult<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    /// Consecutive daily values starting at `start`.
    pub fn from_values(start: NaiveDate, values: &[f64]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(start + Duration::days(i as i64), v))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.points.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Day offset of every observation from the first date.
    pub fn offsets(&self) -> Vec<i64> {
        match self.min_date() {
            Some(origin) => self.points.iter().map(|p| day_offset(origin, p.date)).collect(),
            None => Vec::new(),
        }
    }

    /// True when some calendar date between the first and last one is absent.
    pub fn has_gaps(&self) -> bool {
        self.points
            .windows(2)
            .any(|pair| day_offset(pair[0].date, pair[1].date) > 1)
    }

    /// Centered slice of `width` observations around `center`, or `None`
    /// when it would run past either end of the series.
    pub fn centered_window(&self, center: usize, width: usize) -> Option<&[Observation]> {
        let before = width / 2;
        let after = width - before - 1;
        if center < before || center + after >= self.points.len() {
            return None;
        }
        Some(&self.points[center - before..=center + after])
    }

    /// Same dates, replaced values. Lengths must match.
    pub(crate) fn with_values(&self, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.points.len());
        let points = self
            .points
            .iter()
            .zip(values)
            .map(|(p, value)| Observation {
                date: p.date,
                value,
            })
            .collect();
        Self { points }
    }

    /// Insert every absent calendar date between the first and last one.
    ///
    /// Existing observations, including explicit missing markers, are kept
    /// as they are; only inserted dates take their value from `policy`.
    pub fn fill_gaps(&self, policy: GapFill) -> Self {
        if policy == GapFill::None || !self.has_gaps() {
            return self.clone();
        }

        let mut points = Vec::with_capacity(self.points.len());
        for (i, obs) in self.points.iter().enumerate() {
            if let Some(prev) = i.checked_sub(1).map(|j| &self.points[j]) {
                let mut date = prev.date + Duration::days(1);
                while date < obs.date {
                    let value = match policy {
                        GapFill::None => unreachable!(),
                        GapFill::Zero => Some(0.0),
                        GapFill::Missing => None,
                        GapFill::ForwardFill => prev.value,
                        GapFill::BackFill => obs.value,
                    };
                    points.push(Observation { date, value });
                    date += Duration::days(1);
                }
            }
            points.push(*obs);
        }
        Self { points }
    }

    /// Turn a cumulative running total into per-observation increments.
    ///
    /// The first observation has no predecessor and becomes missing, as does
    /// any observation next to a missing value. Fill gaps first if the
    /// increments should be per calendar day.
    pub fn daily_increments(&self) -> Self {
        let mut values = Vec::with_capacity(self.points.len());
        values.push(None);
        for pair in self.points.windows(2) {
            values.push(match (pair[0].value, pair[1].value) {
                (Some(prev), Some(cur)) => Some(cur - prev),
                _ => None,
            });
        }
        values.truncate(self.points.len());
        self.with_values(values)
    }

    /// Replace negative values by zero. Returns the clipped series and the
    /// number of values that changed.
    pub fn clip_negative(&self) -> (Self, usize) {
        let mut clipped = 0;
        let values = self
            .points
            .iter()
            .map(|p| match p.value {
                Some(v) if v < 0.0 => {
                    clipped += 1;
                    Some(0.0)
                }
                other => other,
            })
            .collect();
        (self.with_values(values), clipped)
    }
}

impl Index<usize> for TimeSeries {
    type Output = Observation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}
