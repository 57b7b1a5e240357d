// HTTP request handlers
use crate::domain::error::DashboardError;
use crate::domain::patient::PatientId;
use crate::domain::series::DatasetKind;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Comma separated comparison ids in selection order, e.g. `36,6`
    pub compare: Option<String>,
}

impl DashboardQuery {
    pub fn comparison_ids(&self) -> Vec<PatientId> {
        self.compare
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PatientId::new)
            .collect()
    }
}

#[derive(Serialize)]
struct UploadReceipt {
    patient: PatientId,
    table: DatasetKind,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the configured patient tabs
pub async fn list_patients(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let patients = state.patient_service.list_patients();
    render(json_response(&patients, StatusCode::OK, accepts_brotli(&headers)).await)
}

/// Both charts and the comparison outcomes for one patient
pub async fn patient_dashboard(
    Path(id): Path<String>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let patient = PatientId::new(id);
    let selected = query.comparison_ids();

    match state
        .dashboard_service
        .patient_dashboard(&patient, &selected)
        .await
    {
        Ok(dashboard) => render(json_response(&dashboard, StatusCode::OK, compress).await),
        Err(e) => error_response(e, compress).await,
    }
}

/// Register an uploaded CSV table; it shadows the static dataset of the same patient
pub async fn upload_dataset(
    Path((id, table)): Path<(String, DatasetKind)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: String,
) -> Response {
    let compress = accepts_brotli(&headers);
    let patient = PatientId::new(id);

    match state.uploads.insert_csv(&patient, table, &body) {
        Ok(()) => {
            let receipt = UploadReceipt { patient, table };
            render(json_response(&receipt, StatusCode::CREATED, compress).await)
        }
        Err(e) => error_response(e, compress).await,
    }
}

async fn error_response(err: DashboardError, compress: bool) -> Response {
    let status = match &err {
        DashboardError::DatasetNotFound { .. } => StatusCode::NOT_FOUND,
        DashboardError::MalformedDataset { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DashboardError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Dashboard request failed: {:?}", err);
    } else {
        tracing::warn!("Dashboard request rejected: {}", err);
    }
    let body = ErrorBody {
        error: err.to_string(),
    };
    render(json_response(&body, status, compress).await)
}

fn render(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
