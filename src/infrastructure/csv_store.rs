// CSV directory store implementation
use crate::application::series_store::ChannelSeriesStore;
use crate::domain::error::DashboardError;
use crate::domain::patient::{OverviewTable, PatientId};
use crate::domain::series::{BoxPlotTable, DatasetKind, RawSeries};
use crate::infrastructure::csv_table::{parse_box_plot, parse_overview, parse_series};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads `num_patient_{id}.csv`, `box_plot_num_patient_{id}.csv` and
/// `base_data_num_patient_{id}.csv` from one directory.
#[derive(Debug, Clone)]
pub struct CsvSeriesStore {
    data_dir: PathBuf,
}

impl CsvSeriesStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn dataset_path(&self, patient: &PatientId, kind: DatasetKind) -> PathBuf {
        let file = match kind {
            DatasetKind::Series => format!("num_patient_{}.csv", patient),
            DatasetKind::BoxPlot => format!("box_plot_num_patient_{}.csv", patient),
            DatasetKind::Overview => format!("base_data_num_patient_{}.csv", patient),
        };
        self.data_dir.join(file)
    }

    async fn read(&self, patient: &PatientId, kind: DatasetKind) -> Result<String, DashboardError> {
        // Ids come from request paths; never let them escape the data dir
        if patient.as_str().is_empty()
            || patient
                .as_str()
                .contains(|c: char| c == '/' || c == '\\' || c == '.')
        {
            return Err(DashboardError::not_found(patient, kind));
        }

        let path = self.dataset_path(patient, kind);
        tracing::debug!("Reading {} dataset from {}", kind, path.display());

        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DashboardError::not_found(patient, kind)
            } else {
                DashboardError::Io {
                    patient: patient.clone(),
                    table: kind,
                    source: e,
                }
            }
        })
    }
}

#[async_trait]
impl ChannelSeriesStore for CsvSeriesStore {
    async fn load_series(&self, patient: &PatientId) -> Result<RawSeries, DashboardError> {
        let content = self.read(patient, DatasetKind::Series).await?;
        parse_series(patient, &content)
    }

    async fn load_box_plot(&self, patient: &PatientId) -> Result<BoxPlotTable, DashboardError> {
        let content = self.read(patient, DatasetKind::BoxPlot).await?;
        parse_box_plot(patient, &content)
    }

    async fn load_overview(&self, patient: &PatientId) -> Result<OverviewTable, DashboardError> {
        let content = self.read(patient, DatasetKind::Overview).await?;
        parse_overview(patient, &content)
    }
}
