// Statistical summary composer - Per-bucket box statistics for one patient
use crate::application::series_store::ChannelSeriesStore;
use crate::domain::error::DashboardError;
use crate::domain::patient::PatientId;
use crate::domain::summary::TimeBucketSummary;
use std::sync::Arc;

#[derive(Clone)]
pub struct SummaryComposer {
    store: Arc<dyn ChannelSeriesStore>,
}

impl SummaryComposer {
    pub fn new(store: Arc<dyn ChannelSeriesStore>) -> Self {
        Self { store }
    }

    /// One summary per bucket, in first-seen order.
    pub async fn summarize(
        &self,
        patient: &PatientId,
    ) -> Result<Vec<TimeBucketSummary>, DashboardError> {
        let table = self.store.load_box_plot(patient).await?;
        let summaries: Vec<TimeBucketSummary> = table
            .buckets()
            .into_iter()
            .filter_map(|(bucket, values)| TimeBucketSummary::from_values(bucket, &values))
            .collect();

        tracing::debug!(
            "Summarized {} rows into {} buckets for patient {}",
            table.rows.len(),
            summaries.len(),
            patient
        );
        Ok(summaries)
    }
}
