use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use csv::{Reader, StringRecord};
use trend_core::common::time::parse_date;
use trend_core::{Observation, TimeSeries};

/// Which CSV columns hold the date and the value
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub date_column: String,
    pub value_column: String,
    pub date_format: String,
}

/// Every `*.csv` directly under `path`, or `path` itself when it is a file.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).with_context(|| format!("reading {:?}", path))? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn load_csv_file(path: &Path, columns: &ColumnSpec) -> Result<TimeSeries> {
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    load_csv(file, columns).with_context(|| format!("loading {:?}", path))
}

pub fn load_csv<R: Read>(input: R, columns: &ColumnSpec) -> Result<TimeSeries> {
    let mut rdr = Reader::from_reader(input);
    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, &columns.date_column)?;
    let value_idx = column_index(&headers, &columns.value_column)?;

    let mut points = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        points.push(
            parse_csv_record(&record, date_idx, value_idx, &columns.date_format)
                .with_context(|| format!("record {}", line + 1))?,
        );
    }

    Ok(TimeSeries::from_unsorted(points)?)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow!("column {:?} not found in header {:?}", name, headers))
}

fn parse_csv_record(
    record: &StringRecord,
    date_idx: usize,
    value_idx: usize,
    date_format: &str,
) -> Result<Observation> {
    let (Some(date), Some(value)) = (record.get(date_idx), record.get(value_idx)) else {
        bail!("short record {:?}", record);
    };
    let date = parse_date(date, Some(date_format))?;

    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("nan") {
        return Ok(Observation::missing(date));
    }
    let value: f64 = value
        .replace(',', "")
        .parse()
        .with_context(|| format!("bad value {:?}", value))?;
    Ok(Observation::new(date, value))
}
