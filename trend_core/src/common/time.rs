use chrono::{NaiveDate, NaiveDateTime};

use super::trend_error::{ErrCode, TrendError, TrendResult};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date.
///
/// Tries `fmt` first, then falls back to "YYYY-MM-DD", "YYYYMMDD", "DD/MM/YYYY"
/// and a full "YYYY-MM-DD HH:MM:SS" timestamp (time part dropped).
pub fn parse_date(s: &str, fmt: Option<&str>) -> TrendResult<NaiveDate> {
    let s = s.trim();
    if let Some(fmt) = fmt {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }
    for fmt in [DEFAULT_DATE_FORMAT, "%Y%m%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| {
            TrendError::new(
                format!("unparseable date: {:?}", s),
                ErrCode::SrcDataFormatError,
            )
        })
}

/// Whole days from `origin` to `date` (negative when `date` precedes it).
pub fn day_offset(origin: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(origin).num_days()
}

pub fn to_date_str(date: NaiveDate) -> String {
    date.format(DEFAULT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
        assert_eq!(parse_date("2021-03-04", None).unwrap(), expected);
        assert_eq!(parse_date("20210304", None).unwrap(), expected);
        assert_eq!(parse_date("04/03/2021", None).unwrap(), expected);
        assert_eq!(parse_date(" 2021-03-04 12:30:00 ", None).unwrap(), expected);
        assert_eq!(parse_date("03.04.2021", Some("%m.%d.%Y")).unwrap(), expected);
    }

    #[test]
    fn test_parse_date_error() {
        let err = parse_date("yesterday", None).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SrcDataFormatError);
    }

    #[test]
    fn test_day_offset() {
        let a = NaiveDate::from_ymd_opt(2020, 12, 30).unwrap();
        let b = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        assert_eq!(day_offset(a, b), 3);
        assert_eq!(day_offset(b, a), -3);
        assert_eq!(to_date_str(b), "2021-01-02");
    }
}
