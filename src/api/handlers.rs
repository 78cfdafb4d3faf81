use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::ml::Model;
use crate::models::IncidentRecord;
use crate::protocols::Protocol;
use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let model = state.model.read().await;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: model.model_name().to_string(),
        trained: model.is_trained(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub trained: bool,
}

/// List the protocol catalog
pub async fn list_protocols(State(state): State<AppState>) -> Result<Json<ProtocolsResponse>> {
    Ok(Json(ProtocolsResponse {
        protocols: state.catalog.all().to_vec(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ProtocolsResponse {
    pub protocols: Vec<Protocol>,
}

/// Recommend a protocol for an incident report
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<IncidentRecord>,
) -> Result<Json<PredictResponse>> {
    record.validate()?;

    let features = state.encoder.encode_batch(std::slice::from_ref(&record));

    let model = state.model.read().await;
    let predicted = model.predict(&features)?;
    let model_name = model.model_name().to_string();
    drop(model);

    let label = predicted
        .first()
        .copied()
        .ok_or_else(|| AppError::Internal("classifier returned no prediction".to_string()))?;

    let protocol = state.catalog.get(label).ok_or_else(|| {
        AppError::Internal(format!("classifier produced unknown protocol label {label}"))
    })?;

    let prediction_id = Uuid::new_v4();
    tracing::info!(
        prediction_id = %prediction_id,
        label = label,
        protocol = protocol.code,
        category = %record.category,
        severity = %record.severity,
        "Protocol recommended"
    );

    Ok(Json(PredictResponse {
        prediction_id,
        label,
        protocol: protocol.clone(),
        model: model_name,
    }))
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub label: i32,
    pub protocol: Protocol,
    pub model: String,
}
