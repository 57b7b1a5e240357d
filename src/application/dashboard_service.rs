// Dashboard service - Use case for building one patient's tab
use crate::application::comparison_service::ComparisonComposer;
use crate::application::patient_service::PatientService;
use crate::application::series_store::ChannelSeriesStore;
use crate::application::similarity::SimilarityIndex;
use crate::application::summary_service::SummaryComposer;
use crate::domain::dashboard::PatientDashboard;
use crate::domain::error::DashboardError;
use crate::domain::patient::{OverviewTable, PatientId};
use crate::domain::plot::PlotBuilder;
use std::sync::Arc;

pub const OVERLAY_TITLE: &str = "EEG";
pub const SUMMARY_TITLE: &str = "EEG box plot";

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn ChannelSeriesStore>,
    patients: PatientService,
    similarity: SimilarityIndex,
    composer: ComparisonComposer,
    summarizer: SummaryComposer,
    plots: PlotBuilder,
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn ChannelSeriesStore>,
        patients: PatientService,
        similarity: SimilarityIndex,
        composer: ComparisonComposer,
        plots: PlotBuilder,
    ) -> Self {
        Self {
            summarizer: SummaryComposer::new(store.clone()),
            store,
            patients,
            similarity,
            composer,
            plots,
        }
    }

    /// Build both charts for `patient`, overlaying `selected` in the given order.
    pub async fn patient_dashboard(
        &self,
        patient: &PatientId,
        selected: &[PatientId],
    ) -> Result<PatientDashboard, DashboardError> {
        tracing::info!(
            "Building dashboard for patient {} with {} comparisons",
            patient,
            selected.len()
        );

        let comparison = self.composer.compose(patient, selected).await?;
        let summaries = self.summarizer.summarize(patient).await?;
        let overview = self.fetch_overview(patient).await?;

        let profile = self.patients.profile(patient).cloned();
        let header = profile
            .as_ref()
            .map(|p| p.header())
            .unwrap_or_else(|| format!("Patient identifier: {}", patient));
        let status_lines = profile
            .as_ref()
            .map(|p| p.status_lines())
            .unwrap_or_default();

        let annotations = comparison.annotations();
        let skipped = comparison.skipped().cloned().collect();

        Ok(PatientDashboard {
            patient: patient.clone(),
            header,
            profile,
            status_lines,
            overview,
            similar_candidates: self.similarity.similar_patients(patient),
            overlay: self.plots.build_overlay(comparison.series, OVERLAY_TITLE),
            summary: self.plots.build_summary(summaries, SUMMARY_TITLE),
            annotations,
            skipped,
        })
    }

    async fn fetch_overview(
        &self,
        patient: &PatientId,
    ) -> Result<Option<OverviewTable>, DashboardError> {
        match self.store.load_overview(patient).await {
            Ok(table) => Ok(Some(table)),
            Err(e) if e.is_not_found() => {
                // No base data, the tab just omits the table
                tracing::debug!("No overview table for patient {}", patient);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::ComparisonOutcome;
    use crate::domain::patient::PatientProfile;
    use crate::domain::plot::Trace;
    use crate::domain::series::{BoxPlotRow, BoxPlotTable, ChannelSample, DatasetKind, RawSeries};
    use crate::domain::styling::Palette;
    use crate::infrastructure::memory_store::InMemorySeriesStore;

    fn seeded_store() -> Arc<InMemorySeriesStore> {
        let store = InMemorySeriesStore::new();
        for id in [7u32, 6] {
            store.insert_series(RawSeries::new(
                PatientId::from(id),
                vec![
                    ChannelSample::new(0, "A", 1.0),
                    ChannelSample::new(0, "B", 2.0),
                ],
            ));
        }
        store.insert_box_plot(BoxPlotTable::new(
            PatientId::from(7),
            vec![BoxPlotRow::new("00:00", 1.0), BoxPlotRow::new("00:30", 2.0)],
        ));
        store.insert_overview(
            &PatientId::from(7),
            OverviewTable {
                columns: vec!["age".to_string()],
                rows: vec![vec!["54".to_string()]],
            },
        );
        Arc::new(store)
    }

    fn service(store: Arc<InMemorySeriesStore>) -> DashboardService {
        let patients = PatientService::new(vec![PatientProfile {
            id: PatientId::from(7),
            status: "healthy".to_string(),
            confidence_percent: Some(95),
            apnea_episodes: 0,
        }]);
        let similarity = SimilarityIndex::new(vec![(PatientId::from(7), vec![PatientId::from(6)])]);
        let composer = ComparisonComposer::new(store.clone(), Palette::default());
        DashboardService::new(store, patients, similarity, composer, PlotBuilder::default())
    }

    #[tokio::test]
    async fn test_full_dashboard() {
        let dashboard = service(seeded_store())
            .patient_dashboard(&PatientId::from(7), &[PatientId::from(6), PatientId::from(999)])
            .await
            .unwrap();

        assert_eq!(dashboard.header, "Patient identifier: 7");
        assert_eq!(dashboard.status_lines.len(), 3);
        assert_eq!(dashboard.similar_candidates, vec![PatientId::from(6)]);
        assert_eq!(dashboard.overview.as_ref().unwrap().rows, vec![vec!["54"]]);

        assert_eq!(dashboard.overlay.title, OVERLAY_TITLE);
        assert_eq!(dashboard.overlay.traces.len(), 4);
        assert!(dashboard.overlay.layout.show_legend);

        assert_eq!(dashboard.summary.title, SUMMARY_TITLE);
        assert_eq!(dashboard.summary.traces.len(), 2);
        assert!(matches!(dashboard.summary.traces[0], Trace::Box(_)));
        assert!(!dashboard.summary.layout.show_legend);

        assert_eq!(
            dashboard.annotations,
            vec!["supporting context for the stated diagnosis of patient 6"]
        );
        assert_eq!(dashboard.skipped.len(), 1);
        assert!(matches!(
            &dashboard.skipped[0],
            ComparisonOutcome::Skipped { patient, .. } if *patient == PatientId::from(999)
        ));
    }

    #[tokio::test]
    async fn test_missing_overview_and_profile_are_optional() {
        let store = InMemorySeriesStore::new();
        store.insert_series(RawSeries::new(PatientId::from(8), Vec::new()));
        store.insert_box_plot(BoxPlotTable::new(PatientId::from(8), Vec::new()));

        let dashboard = service(Arc::new(store))
            .patient_dashboard(&PatientId::from(8), &[])
            .await
            .unwrap();
        assert!(dashboard.overview.is_none());
        assert!(dashboard.profile.is_none());
        assert!(dashboard.status_lines.is_empty());
        assert!(dashboard.similar_candidates.is_empty());
        assert!(dashboard.overlay.traces.is_empty());
        assert!(dashboard.summary.traces.is_empty());
        assert!(dashboard.annotations.is_empty());
        assert!(dashboard.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_missing_primary_box_plot_is_fatal() {
        let store = InMemorySeriesStore::new();
        store.insert_series(RawSeries::new(PatientId::from(7), Vec::new()));
        let err = service(Arc::new(store))
            .patient_dashboard(&PatientId::from(7), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::DatasetNotFound {
                table: DatasetKind::BoxPlot,
                ..
            }
        ));
    }
}
