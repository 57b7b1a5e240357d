//! Header-driven decoding of the per-patient CSV tables.
//!
//! Column order does not matter and extra columns (such as an unnamed index
//! column) are ignored. Every row is validated here so that downstream
//! components only see typed records.

use crate::domain::error::DashboardError;
use crate::domain::patient::{OverviewTable, PatientId};
use crate::domain::series::{BoxPlotRow, BoxPlotTable, ChannelSample, DatasetKind, RawSeries};
use chrono::{DateTime, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

struct Table<'a> {
    header: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
    patient: &'a PatientId,
    kind: DatasetKind,
}

impl<'a> Table<'a> {
    fn parse(
        content: &str,
        patient: &'a PatientId,
        kind: DatasetKind,
    ) -> Result<Self, DashboardError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Err(malformed(patient, kind, 1, "missing header row"));
        };
        let header: Vec<String> = split_line(header_line)
            .into_iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            let fields = split_line(line);
            if fields.len() != header.len() {
                return Err(malformed(
                    patient,
                    kind,
                    line_no,
                    format!("expected {} fields, found {}", header.len(), fields.len()),
                ));
            }
            rows.push((line_no, fields));
        }

        Ok(Self {
            header,
            rows,
            patient,
            kind,
        })
    }

    fn column(&self, name: &str) -> Result<usize, DashboardError> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                malformed(
                    self.patient,
                    self.kind,
                    1,
                    format!("missing column '{}'", name),
                )
            })
    }

    fn value(&self, line: usize, raw: &str) -> Result<f64, DashboardError> {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(malformed(
                self.patient,
                self.kind,
                line,
                format!("value '{}' is not a finite number", trimmed),
            )),
        }
    }

    fn timestamp(&self, line: usize, raw: &str) -> Result<i64, DashboardError> {
        parse_timestamp_ms(raw).ok_or_else(|| {
            malformed(
                self.patient,
                self.kind,
                line,
                format!("time '{}' is not a timestamp", raw.trim()),
            )
        })
    }
}

/// `time, filter, value` rows in file order.
pub fn parse_series(patient: &PatientId, content: &str) -> Result<RawSeries, DashboardError> {
    let table = Table::parse(content, patient, DatasetKind::Series)?;
    let time = table.column("time")?;
    let filter = table.column("filter")?;
    let value = table.column("value")?;

    let mut samples = Vec::with_capacity(table.rows.len());
    for (line, fields) in &table.rows {
        let channel = fields[filter].trim();
        if channel.is_empty() {
            return Err(malformed(patient, table.kind, *line, "empty filter tag"));
        }
        samples.push(ChannelSample::new(
            table.timestamp(*line, &fields[time])?,
            channel,
            table.value(*line, &fields[value])?,
        ));
    }
    Ok(RawSeries::new(patient.clone(), samples))
}

/// `time, value` rows; the time column is an opaque bucket key.
pub fn parse_box_plot(patient: &PatientId, content: &str) -> Result<BoxPlotTable, DashboardError> {
    let table = Table::parse(content, patient, DatasetKind::BoxPlot)?;
    let time = table.column("time")?;
    let value = table.column("value")?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (line, fields) in &table.rows {
        let bucket = fields[time].trim();
        if bucket.is_empty() {
            return Err(malformed(patient, table.kind, *line, "empty time bucket"));
        }
        rows.push(BoxPlotRow::new(bucket, table.value(*line, &fields[value])?));
    }
    Ok(BoxPlotTable::new(patient.clone(), rows))
}

pub fn parse_overview(patient: &PatientId, content: &str) -> Result<OverviewTable, DashboardError> {
    let table = Table::parse(content, patient, DatasetKind::Overview)?;
    Ok(OverviewTable {
        columns: table.header,
        rows: table
            .rows
            .into_iter()
            .map(|(_, fields)| fields.into_iter().map(|f| f.trim().to_string()).collect())
            .collect(),
    })
}

pub fn parse(
    patient: &PatientId,
    kind: DatasetKind,
    content: &str,
) -> Result<ParsedDataset, DashboardError> {
    Ok(match kind {
        DatasetKind::Series => ParsedDataset::Series(parse_series(patient, content)?),
        DatasetKind::BoxPlot => ParsedDataset::BoxPlot(parse_box_plot(patient, content)?),
        DatasetKind::Overview => ParsedDataset::Overview(parse_overview(patient, content)?),
    })
}

#[derive(Debug, Clone)]
pub enum ParsedDataset {
    Series(RawSeries),
    BoxPlot(BoxPlotTable),
    Overview(OverviewTable),
}

/// RFC 3339, naive date-time (taken as UTC), or integer epoch milliseconds.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Split one CSV record, honoring double-quoted fields with `""` escapes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn malformed(
    patient: &PatientId,
    table: DatasetKind,
    line: usize,
    reason: impl Into<String>,
) -> DashboardError {
    DashboardError::MalformedDataset {
        patient: patient.clone(),
        table,
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p7() -> PatientId {
        PatientId::from(7)
    }

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(split_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
        assert_eq!(split_line("\"say \"\"hi\"\"\",2"), vec!["say \"hi\"", "2"]);
        assert_eq!(split_line(",x,"), vec!["", "x", ""]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp_ms("1500"), Some(1500));
        assert_eq!(parse_timestamp_ms("1970-01-01 00:00:01"), Some(1_000));
        assert_eq!(parse_timestamp_ms("1970-01-01T00:00:01.250"), Some(1_250));
        assert_eq!(parse_timestamp_ms("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(parse_timestamp_ms("yesterday"), None);
    }

    #[test]
    fn test_parse_series_with_index_column() {
        let csv = ",time,filter,value\n0,1970-01-01 00:00:00,A,1.5\n1,1970-01-01 00:00:01,B,-2\n";
        let series = parse_series(&p7(), csv).unwrap();
        assert_eq!(
            series.samples,
            vec![
                ChannelSample::new(0, "A", 1.5),
                ChannelSample::new(1_000, "B", -2.0),
            ]
        );
    }

    #[test]
    fn test_parse_series_reordered_columns() {
        let csv = "value,filter,time\r\n3.0,C,10\r\n\r\n";
        let series = parse_series(&p7(), csv).unwrap();
        assert_eq!(series.samples, vec![ChannelSample::new(10, "C", 3.0)]);
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let err = parse_series(&p7(), "time,value\n1,2\n").unwrap_err();
        match err {
            DashboardError::MalformedDataset { reason, line, .. } => {
                assert_eq!(line, 1);
                assert!(reason.contains("filter"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_value_is_malformed() {
        let err = parse_series(&p7(), "time,filter,value\n1,A,1\n2,A,abc\n").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedDataset { line: 3, .. }));

        let err = parse_box_plot(&p7(), "time,value\nt0,NaN\n").unwrap_err();
        assert!(matches!(
            err,
            DashboardError::MalformedDataset {
                table: DatasetKind::BoxPlot,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_time_and_ragged_rows_are_malformed() {
        assert!(parse_series(&p7(), "time,filter,value\nnever,A,1\n").is_err());
        assert!(parse_series(&p7(), "time,filter,value\n1,A\n").is_err());
        assert!(parse_series(&p7(), "").is_err());
    }

    #[test]
    fn test_parse_box_plot_keeps_raw_bucket_keys() {
        let table = parse_box_plot(&p7(), "time,value\n00:30, 1\n00:00,2\n").unwrap();
        assert_eq!(
            table.rows,
            vec![BoxPlotRow::new("00:30", 1.0), BoxPlotRow::new("00:00", 2.0)]
        );
    }

    #[test]
    fn test_blank_bucket_is_malformed() {
        let err = parse_box_plot(&p7(), "time,value\n00:00,1\n  ,2\n").unwrap_err();
        match err {
            DashboardError::MalformedDataset { reason, line, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("time bucket"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_overview_passthrough() {
        let table = parse_overview(&p7(), "age,sex,note\n54,M,\"snores, loudly\"\n").unwrap();
        assert_eq!(table.columns, vec!["age", "sex", "note"]);
        assert_eq!(table.rows, vec![vec!["54", "M", "snores, loudly"]]);
    }

    #[test]
    fn test_header_only_is_empty_not_error() {
        let series = parse_series(&p7(), "time,filter,value\n").unwrap();
        assert!(series.samples.is_empty());
    }
}
