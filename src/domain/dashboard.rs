// Dashboard domain model - everything one patient tab shows
use super::patient::{OverviewTable, PatientId, PatientProfile};
use super::plot::PlotSpec;
use super::series::DatasetKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    DatasetNotFound { table: DatasetKind },
}

/// What happened to one requested comparison patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Included {
        patient: PatientId,
        annotation: String,
    },
    Skipped {
        patient: PatientId,
        #[serde(flatten)]
        reason: SkipReason,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientDashboard {
    pub patient: PatientId,
    pub header: String,
    pub profile: Option<PatientProfile>,
    pub status_lines: Vec<String>,
    pub overview: Option<OverviewTable>,
    pub similar_candidates: Vec<PatientId>,
    pub overlay: PlotSpec,
    pub summary: PlotSpec,
    /// Shown next to the overlay chart, one per included comparison
    pub annotations: Vec<String>,
    pub skipped: Vec<ComparisonOutcome>,
}
