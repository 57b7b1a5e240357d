// Channel series domain models and the series grouper
use super::patient::PatientId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The per-patient tables a store can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Series,
    BoxPlot,
    Overview,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Series => "time-series",
            DatasetKind::BoxPlot => "box-plot",
            DatasetKind::Overview => "overview",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// One row of the time-series table: `(time, filter, value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSample {
    pub time_ms: i64,
    pub channel: String,
    pub value: f64,
}

impl ChannelSample {
    pub fn new(time_ms: i64, channel: impl Into<String>, value: f64) -> Self {
        Self {
            time_ms,
            channel: channel.into(),
            value,
        }
    }
}

/// A patient's samples in storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub patient: PatientId,
    pub samples: Vec<ChannelSample>,
}

impl RawSeries {
    pub fn new(patient: PatientId, samples: Vec<ChannelSample>) -> Self {
        Self { patient, samples }
    }

    /// Partition the samples on their channel tag.
    ///
    /// Every sample lands in exactly one group and keeps its relative order.
    /// Channels are ordered by tag, so output is stable across calls.
    pub fn group(&self) -> GroupedSeries {
        let mut groups: BTreeMap<String, Vec<TimeSeriesPoint>> = BTreeMap::new();
        for sample in &self.samples {
            groups
                .entry(sample.channel.clone())
                .or_default()
                .push(TimeSeriesPoint::new(sample.time_ms, sample.value));
        }
        GroupedSeries { groups }
    }
}

/// Channel tag -> ordered points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSeries {
    groups: BTreeMap<String, Vec<TimeSeriesPoint>>,
}

impl GroupedSeries {
    pub fn into_groups(self) -> impl Iterator<Item = (String, Vec<TimeSeriesPoint>)> {
        self.groups.into_iter()
    }
}

/// One row of the pre-bucketed statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotRow {
    pub bucket: String,
    pub value: f64,
}

impl BoxPlotRow {
    pub fn new(bucket: impl Into<String>, value: f64) -> Self {
        Self {
            bucket: bucket.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotTable {
    pub patient: PatientId,
    pub rows: Vec<BoxPlotRow>,
}

impl BoxPlotTable {
    pub fn new(patient: PatientId, rows: Vec<BoxPlotRow>) -> Self {
        Self { patient, rows }
    }

    /// Values per bucket key, buckets in first-seen order.
    pub fn buckets(&self) -> Vec<(&str, Vec<f64>)> {
        let mut order: HashMap<&str, usize> = HashMap::new();
        let mut buckets: Vec<(&str, Vec<f64>)> = Vec::new();
        for row in &self.rows {
            let key = row.bucket.as_str();
            match order.get(key) {
                Some(&idx) => buckets[idx].1.push(row.value),
                None => {
                    order.insert(key, buckets.len());
                    buckets.push((key, vec![row.value]));
                }
            }
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl GroupedSeries {
        fn get(&self, channel: &str) -> Option<&[TimeSeriesPoint]> {
            self.groups.get(channel).map(Vec::as_slice)
        }

        fn channels(&self) -> Vec<&str> {
            self.groups.keys().map(String::as_str).collect()
        }
    }

    fn raw(samples: &[(i64, &str, f64)]) -> RawSeries {
        RawSeries::new(
            PatientId::from(7),
            samples
                .iter()
                .map(|&(t, c, v)| ChannelSample::new(t, c, v))
                .collect(),
        )
    }

    #[test]
    fn test_group_empty() {
        let grouped = raw(&[]).group();
        assert!(grouped.groups.is_empty());
    }

    #[test]
    fn test_group_partitions_exactly() {
        let series = raw(&[
            (3, "B", 0.3),
            (1, "A", 1.0),
            (2, "B", 0.2),
            (2, "A", 2.0),
            (5, "C", 9.0),
            (1, "A", 1.5),
        ]);
        let grouped = series.group();

        assert_eq!(grouped.channels(), vec!["A", "B", "C"]);
        let total: usize = grouped.groups.values().map(Vec::len).sum();
        assert_eq!(total, series.samples.len());

        // Per-channel order follows storage order, duplicates included.
        assert_eq!(
            grouped.get("A").unwrap(),
            &[
                TimeSeriesPoint::new(1, 1.0),
                TimeSeriesPoint::new(2, 2.0),
                TimeSeriesPoint::new(1, 1.5),
            ]
        );
        assert_eq!(
            grouped.get("B").unwrap(),
            &[TimeSeriesPoint::new(3, 0.3), TimeSeriesPoint::new(2, 0.2)]
        );

        // Re-merging every group reproduces the input multiset.
        let mut merged: Vec<(i64, String, u64)> = grouped
            .groups
            .iter()
            .flat_map(|(channel, points)| {
                points
                    .iter()
                    .map(move |p| (p.time_ms, channel.clone(), p.value.to_bits()))
            })
            .collect();
        let mut original: Vec<(i64, String, u64)> = series
            .samples
            .iter()
            .map(|s| (s.time_ms, s.channel.clone(), s.value.to_bits()))
            .collect();
        merged.sort();
        original.sort();
        assert_eq!(merged, original);
    }

    #[test]
    fn test_group_is_idempotent() {
        let series = raw(&[(1, "A", 1.0), (2, "B", 2.0)]);
        assert_eq!(series.group(), series.group());
    }

    #[test]
    fn test_buckets_first_seen_order() {
        let table = BoxPlotTable::new(
            PatientId::from(7),
            vec![
                BoxPlotRow::new("10:00", 1.0),
                BoxPlotRow::new("09:00", 2.0),
                BoxPlotRow::new("10:00", 3.0),
            ],
        );
        assert_eq!(
            table.buckets(),
            vec![("10:00", vec![1.0, 3.0]), ("09:00", vec![2.0])]
        );
    }
}
