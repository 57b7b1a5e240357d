//! Declarative chart specifications and the builder that produces them.
//!
//! A [`PlotSpec`] describes what to draw, never how: any charting backend can
//! turn it into pixels. Every spec carries the same axis policy: a temporal
//! x-axis with range-selector presets and a slider, and a linear y-axis
//! anchored on the right.

use super::patient::PatientId;
use super::styling::{LineStyle, Origin, StyledSeries};
use super::summary::TimeBucketSummary;
use serde::{Deserialize, Serialize};

/// Display constants shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub background_color: String,
    pub y_axis_title: String,
    pub axis_line_color: String,
    pub selector_font: FontSpec,
    pub box_marker_color: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            background_color: "rgba(58,240,18,0.1)".to_string(),
            y_axis_title: "01-m2".to_string(),
            axis_line_color: "rgba(29,11,142,1)".to_string(),
            selector_font: FontSpec::default(),
            box_marker_color: "rgb(107,174,214)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub color: String,
    pub size: u32,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            color: "indigo".to_string(),
            size: 15,
            family: "Droid Serif".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    Linear,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStep {
    Minute,
    Hour,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangePreset {
    pub count: u32,
    pub step: RangeStep,
    pub label: String,
    pub backward: bool,
}

impl RangePreset {
    fn backward(count: u32, step: RangeStep, label: &str) -> Self {
        Self {
            count,
            step,
            label: label.to_string(),
            backward: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub axis_type: AxisType,
    pub range_presets: Vec<RangePreset>,
    pub selector_font: FontSpec,
    pub range_slider: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub axis_type: AxisType,
    pub side: AxisSide,
    pub anchor: String,
    pub title: String,
    pub line_color: String,
    pub autorange: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub background_color: String,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub patient: PatientId,
    pub origin: Origin,
    pub channel: String,
    pub x: Vec<i64>,
    pub y: Vec<f64>,
    pub line: LineStyle,
}

impl From<StyledSeries> for LineTrace {
    fn from(series: StyledSeries) -> Self {
        let (x, y) = series.points.iter().map(|p| (p.time_ms, p.value)).unzip();
        Self {
            name: series.name,
            patient: series.patient,
            origin: series.origin,
            channel: series.channel,
            x,
            y,
            line: series.style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStyle {
    pub marker_color: String,
    pub jitter: f64,
    pub whisker_width: f64,
    /// Draw individual points only for outliers
    pub outlier_points: bool,
    pub notched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxTrace {
    pub name: String,
    pub summary: TimeBucketSummary,
    pub style: BoxStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trace {
    Line(LineTrace),
    Box(BoxTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSpec {
    pub title: String,
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Default)]
pub struct PlotBuilder {
    settings: LayoutSettings,
}

impl PlotBuilder {
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    /// Overlay line chart with the legend shown.
    ///
    /// An empty series list yields a spec with no traces so the host can
    /// render its "no data" state.
    pub fn build_overlay(&self, series: Vec<StyledSeries>, title: &str) -> PlotSpec {
        self.build_overlay_with_legend(series, title, true)
    }

    pub fn build_overlay_with_legend(
        &self,
        series: Vec<StyledSeries>,
        title: &str,
        show_legend: bool,
    ) -> PlotSpec {
        let traces = series
            .into_iter()
            .map(|s| Trace::Line(LineTrace::from(s)))
            .collect();
        self.spec(title, traces, show_legend)
    }

    /// Box-summary chart with the legend hidden.
    pub fn build_summary(&self, summaries: Vec<TimeBucketSummary>, title: &str) -> PlotSpec {
        self.build_summary_with_legend(summaries, title, false)
    }

    pub fn build_summary_with_legend(
        &self,
        summaries: Vec<TimeBucketSummary>,
        title: &str,
        show_legend: bool,
    ) -> PlotSpec {
        let traces = summaries
            .into_iter()
            .map(|summary| {
                Trace::Box(BoxTrace {
                    name: summary.bucket.clone(),
                    summary,
                    style: self.box_style(),
                })
            })
            .collect();
        self.spec(title, traces, show_legend)
    }

    fn box_style(&self) -> BoxStyle {
        BoxStyle {
            marker_color: self.settings.box_marker_color.clone(),
            jitter: 0.5,
            whisker_width: 0.2,
            outlier_points: true,
            notched: true,
        }
    }

    fn spec(&self, title: &str, traces: Vec<Trace>, show_legend: bool) -> PlotSpec {
        PlotSpec {
            title: title.to_string(),
            traces,
            layout: self.layout(show_legend),
        }
    }

    fn layout(&self, show_legend: bool) -> Layout {
        Layout {
            background_color: self.settings.background_color.clone(),
            x_axis: XAxis {
                axis_type: AxisType::Date,
                range_presets: vec![
                    RangePreset::backward(30, RangeStep::Minute, "30 minutes"),
                    RangePreset::backward(1, RangeStep::Hour, "1 hour"),
                ],
                selector_font: self.settings.selector_font.clone(),
                range_slider: true,
            },
            y_axis: YAxis {
                axis_type: AxisType::Linear,
                side: AxisSide::Right,
                anchor: "x".to_string(),
                title: self.settings.y_axis_title.clone(),
                line_color: self.settings.axis_line_color.clone(),
                autorange: true,
            },
            show_legend,
        }
    }
}
