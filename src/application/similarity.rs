// Similarity index - curated lookup of comparable patients
use crate::domain::patient::PatientId;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    entries: HashMap<PatientId, Vec<PatientId>>,
}

impl SimilarityIndex {
    /// Builds the index from curated `(patient, similar)` pairs.
    /// The first entry for a patient wins.
    pub fn new(table: impl IntoIterator<Item = (PatientId, Vec<PatientId>)>) -> Self {
        let mut entries = HashMap::new();
        for (patient, similar) in table {
            entries.entry(patient).or_insert(similar);
        }
        Self { entries }
    }

    /// Unknown patients have no known comparisons.
    pub fn similar_patients(&self, patient: &PatientId) -> Vec<PatientId> {
        self.entries.get(patient).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
