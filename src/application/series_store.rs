// Store trait for per-patient channel datasets
use crate::domain::error::DashboardError;
use crate::domain::patient::{OverviewTable, PatientId};
use crate::domain::series::{BoxPlotTable, RawSeries};
use async_trait::async_trait;

/// Resolves a patient to its read-only tables.
///
/// Implementations validate rows once at this boundary; callers only ever
/// see typed records.
#[async_trait]
pub trait ChannelSeriesStore: Send + Sync {
    /// The `time, filter, value` table
    async fn load_series(&self, patient: &PatientId) -> Result<RawSeries, DashboardError>;

    /// The pre-bucketed `time, value` table
    async fn load_box_plot(&self, patient: &PatientId) -> Result<BoxPlotTable, DashboardError>;

    /// Free-form base data shown above the charts
    async fn load_overview(&self, patient: &PatientId) -> Result<OverviewTable, DashboardError>;
}
