// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::comparison_service::ComparisonComposer;
use crate::application::dashboard_service::DashboardService;
use crate::application::patient_service::PatientService;
use crate::domain::plot::PlotBuilder;
use crate::infrastructure::config::{load_patients_config, load_server_config};
use crate::infrastructure::csv_store::CsvSeriesStore;
use crate::infrastructure::memory_store::{InMemorySeriesStore, LayeredSeriesStore};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_patients, patient_dashboard, upload_dataset,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let server_config = load_server_config().context("failed to load config/server")?;
    let patients_config = load_patients_config().context("failed to load config/patients")?;

    // Create store (infrastructure layer); uploads shadow the static tables
    let csv_store = Arc::new(CsvSeriesStore::new(server_config.server.data_dir.clone()));
    let uploads = Arc::new(InMemorySeriesStore::new());
    let store = Arc::new(LayeredSeriesStore::new(uploads.clone(), csv_store));

    let similarity = patients_config.similarity_index();
    let palette = patients_config.palette();
    tracing::info!(
        "Loaded {} patient tabs, {} similarity entries, {} palette colors",
        patients_config.patients.len(),
        similarity.len(),
        palette.len()
    );

    // Create services (application layer)
    let patient_service = PatientService::new(patients_config.patients.clone());
    let composer = ComparisonComposer::new(store.clone(), palette)
        .with_annotation_template(patients_config.annotation_template.clone());
    let dashboard_service = DashboardService::new(
        store,
        patient_service.clone(),
        similarity,
        composer,
        PlotBuilder::new(patients_config.layout.clone()),
    );

    // Create application state
    let state = Arc::new(AppState {
        patient_service,
        dashboard_service,
        uploads,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/patients", get(list_patients))
        .route("/patients/:id/dashboard", get(patient_dashboard))
        .route("/patients/:id/datasets/:table", post(upload_dataset))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = server_config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", server_config.server.bind))?;
    tracing::info!(
        "Starting apnoe-dashboard on {} (data dir {})",
        addr,
        server_config.server.data_dir.display()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
