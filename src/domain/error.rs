// Typed failures raised while loading or validating patient datasets
use super::patient::PatientId;
use super::series::DatasetKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no {table} dataset for patient {patient}")]
    DatasetNotFound {
        patient: PatientId,
        table: DatasetKind,
    },

    #[error("malformed {table} dataset for patient {patient} (line {line}): {reason}")]
    MalformedDataset {
        patient: PatientId,
        table: DatasetKind,
        line: usize,
        reason: String,
    },

    #[error("failed to read {table} dataset for patient {patient}")]
    Io {
        patient: PatientId,
        table: DatasetKind,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardError {
    pub fn not_found(patient: &PatientId, table: DatasetKind) -> Self {
        Self::DatasetNotFound {
            patient: patient.clone(),
            table,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DatasetNotFound { .. })
    }
}
