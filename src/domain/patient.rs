// Patient domain model
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable key of one patient's dataset.
///
/// Ingestion produces both numeric (`7`) and textual keys, so the id is kept
/// as text and accepts either form when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawPatientId", into = "String")]
pub struct PatientId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPatientId {
    Number(i64),
    Text(String),
}

impl From<RawPatientId> for PatientId {
    fn from(raw: RawPatientId) -> Self {
        match raw {
            RawPatientId::Number(n) => Self(n.to_string()),
            RawPatientId::Text(s) => Self::new(s),
        }
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for PatientId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Externally supplied diagnosis labels shown in a patient's tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: PatientId,
    pub status: String,
    pub confidence_percent: Option<u8>,
    #[serde(default)]
    pub apnea_episodes: u32,
}

impl PatientProfile {
    pub fn header(&self) -> String {
        format!("Patient identifier: {}", self.id)
    }

    /// Human readable lines rendered under the overview table.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Patient status: {}", self.status)];
        if let Some(confidence) = self.confidence_percent {
            lines.push(format!("Matches this type with {}% confidence", confidence));
        }
        if self.apnea_episodes == 0 {
            lines.push("No apnea episodes recorded in the data".to_string());
        } else {
            lines.push(format!(
                "{} apnea episodes recorded in the data",
                self.apnea_episodes
            ));
        }
        lines
    }
}

/// Base-data table passed through verbatim for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
