// Patient service - Use case for listing the configured patient tabs
use crate::domain::patient::{PatientId, PatientProfile};

#[derive(Debug, Clone, Default)]
pub struct PatientService {
    profiles: Vec<PatientProfile>,
}

impl PatientService {
    pub fn new(profiles: Vec<PatientProfile>) -> Self {
        Self { profiles }
    }

    /// Tabs in configured order.
    pub fn list_patients(&self) -> &[PatientProfile] {
        &self.profiles
    }

    pub fn profile(&self, patient: &PatientId) -> Option<&PatientProfile> {
        self.profiles.iter().find(|p| &p.id == patient)
    }
}
