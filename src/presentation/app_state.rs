// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::patient_service::PatientService;
use crate::infrastructure::memory_store::InMemorySeriesStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
    pub dashboard_service: DashboardService,
    pub uploads: Arc<InMemorySeriesStore>,
}
