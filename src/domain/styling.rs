// Styled series and the palette used to color them
use super::patient::PatientId;
use super::series::{GroupedSeries, TimeSeriesPoint};
use serde::Serialize;

const DEFAULT_COLORS: [&str; 5] = [
    "rgba(29, 11, 142, 1)",
    "rgba(243, 156, 18, 1)",
    "rgba(142, 68, 173, 1)",
    "rgba(192, 57, 43, 1)",
    "rgba(186, 74, 0, 1)",
];

pub const PRIMARY_LINE_WIDTH: u32 = 3;
pub const COMPARISON_LINE_WIDTH: u32 = 1;

/// Ordered, never-empty color cycle indexed by channel position.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    /// An empty color list falls back to the default palette.
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Wraps around once channels outnumber colors.
    pub fn color_for(&self, channel_index: usize) -> &str {
        &self.colors[channel_index % self.colors.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Primary,
    Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashPattern {
    Solid,
    Dash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: u32,
    pub dash: DashPattern,
}

impl LineStyle {
    /// Hue follows the channel; width and dash follow provenance.
    pub fn for_series(origin: Origin, channel_index: usize, palette: &Palette) -> Self {
        let color = palette.color_for(channel_index).to_string();
        match origin {
            Origin::Primary => Self {
                color,
                width: PRIMARY_LINE_WIDTH,
                dash: DashPattern::Solid,
            },
            Origin::Comparison => Self {
                color,
                width: COMPARISON_LINE_WIDTH,
                dash: DashPattern::Dash,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledSeries {
    pub patient: PatientId,
    pub origin: Origin,
    pub channel: String,
    pub name: String,
    pub style: LineStyle,
    pub points: Vec<TimeSeriesPoint>,
}

impl StyledSeries {
    pub fn display_name(origin: Origin, patient: &PatientId, channel: &str) -> String {
        match origin {
            Origin::Primary => format!("{}_{}", patient, channel),
            Origin::Comparison => format!("similar_patient_{}_{}", patient, channel),
        }
    }
}

/// Annotate every group of one patient, in channel order.
pub fn style_grouped(
    patient: &PatientId,
    origin: Origin,
    grouped: GroupedSeries,
    palette: &Palette,
) -> Vec<StyledSeries> {
    grouped
        .into_groups()
        .enumerate()
        .map(|(idx, (channel, points))| StyledSeries {
            patient: patient.clone(),
            origin,
            name: StyledSeries::display_name(origin, patient, &channel),
            style: LineStyle::for_series(origin, idx, palette),
            channel,
            points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{ChannelSample, RawSeries};

    #[test]
    fn test_palette_wraps_around() {
        let palette = Palette::new(vec!["red".to_string(), "blue".to_string()]);
        assert_eq!(palette.color_for(0), "red");
        assert_eq!(palette.color_for(1), "blue");
        assert_eq!(palette.color_for(2), "red");
        assert_eq!(palette.color_for(7), "blue");
    }

    #[test]
    fn test_empty_palette_falls_back_to_default() {
        let palette = Palette::new(Vec::new());
        assert_eq!(palette, Palette::default());
        assert_eq!(palette.len(), 5);
    }

    #[test]
    fn test_style_grouped_primary_and_comparison() {
        let patient = PatientId::from(6);
        let raw = RawSeries::new(
            patient.clone(),
            vec![
                ChannelSample::new(1, "B", 1.0),
                ChannelSample::new(1, "A", 2.0),
            ],
        );
        let palette = Palette::default();

        let primary = style_grouped(&patient, Origin::Primary, raw.group(), &palette);
        assert_eq!(primary[0].name, "6_A");
        assert_eq!(primary[0].style.width, 3);
        assert_eq!(primary[0].style.dash, DashPattern::Solid);
        assert_eq!(primary[1].style.color, "rgba(243, 156, 18, 1)");

        let comparison = style_grouped(&patient, Origin::Comparison, raw.group(), &palette);
        assert_eq!(comparison[1].name, "similar_patient_6_B");
        assert_eq!(comparison[1].style.width, 1);
        assert_eq!(comparison[1].style.dash, DashPattern::Dash);
        assert_eq!(comparison[1].style.color, primary[1].style.color);
    }
}
