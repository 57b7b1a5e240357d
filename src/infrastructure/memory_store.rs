// In-memory and layered store implementations
use crate::application::series_store::ChannelSeriesStore;
use crate::domain::error::DashboardError;
use crate::domain::patient::{OverviewTable, PatientId};
use crate::domain::series::{BoxPlotTable, DatasetKind, RawSeries};
use crate::infrastructure::csv_table::{self, ParsedDataset};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Datasets registered at runtime, e.g. from uploaded files.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    series: RwLock<HashMap<PatientId, RawSeries>>,
    box_plots: RwLock<HashMap<PatientId, BoxPlotTable>>,
    overviews: RwLock<HashMap<PatientId, OverviewTable>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_series(&self, series: RawSeries) {
        self.series
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(series.patient.clone(), series);
    }

    pub fn insert_box_plot(&self, table: BoxPlotTable) {
        self.box_plots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.patient.clone(), table);
    }

    pub fn insert_overview(&self, patient: &PatientId, table: OverviewTable) {
        self.overviews
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(patient.clone(), table);
    }

    /// Validate CSV text against the table schema and register it.
    /// Nothing is stored when validation fails.
    pub fn insert_csv(
        &self,
        patient: &PatientId,
        kind: DatasetKind,
        content: &str,
    ) -> Result<(), DashboardError> {
        match csv_table::parse(patient, kind, content)? {
            ParsedDataset::Series(series) => self.insert_series(series),
            ParsedDataset::BoxPlot(table) => self.insert_box_plot(table),
            ParsedDataset::Overview(table) => self.insert_overview(patient, table),
        }
        tracing::info!("Registered uploaded {} dataset for patient {}", kind, patient);
        Ok(())
    }
}

fn lookup<T: Clone>(
    map: &RwLock<HashMap<PatientId, T>>,
    patient: &PatientId,
    kind: DatasetKind,
) -> Result<T, DashboardError> {
    map.read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(patient)
        .cloned()
        .ok_or_else(|| DashboardError::not_found(patient, kind))
}

#[async_trait]
impl ChannelSeriesStore for InMemorySeriesStore {
    async fn load_series(&self, patient: &PatientId) -> Result<RawSeries, DashboardError> {
        lookup(&self.series, patient, DatasetKind::Series)
    }

    async fn load_box_plot(&self, patient: &PatientId) -> Result<BoxPlotTable, DashboardError> {
        lookup(&self.box_plots, patient, DatasetKind::BoxPlot)
    }

    async fn load_overview(&self, patient: &PatientId) -> Result<OverviewTable, DashboardError> {
        lookup(&self.overviews, patient, DatasetKind::Overview)
    }
}

/// Uploaded datasets shadow the static directory; both obey one schema.
#[derive(Clone)]
pub struct LayeredSeriesStore {
    uploads: Arc<InMemorySeriesStore>,
    fallback: Arc<dyn ChannelSeriesStore>,
}

impl LayeredSeriesStore {
    pub fn new(uploads: Arc<InMemorySeriesStore>, fallback: Arc<dyn ChannelSeriesStore>) -> Self {
        Self { uploads, fallback }
    }
}

#[async_trait]
impl ChannelSeriesStore for LayeredSeriesStore {
    async fn load_series(&self, patient: &PatientId) -> Result<RawSeries, DashboardError> {
        match self.uploads.load_series(patient).await {
            Err(e) if e.is_not_found() => self.fallback.load_series(patient).await,
            other => other,
        }
    }

    async fn load_box_plot(&self, patient: &PatientId) -> Result<BoxPlotTable, DashboardError> {
        match self.uploads.load_box_plot(patient).await {
            Err(e) if e.is_not_found() => self.fallback.load_box_plot(patient).await,
            other => other,
        }
    }

    async fn load_overview(&self, patient: &PatientId) -> Result<OverviewTable, DashboardError> {
        match self.uploads.load_overview(patient).await {
            Err(e) if e.is_not_found() => self.fallback.load_overview(patient).await,
            other => other,
        }
    }
}
