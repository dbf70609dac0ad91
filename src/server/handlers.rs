//! Patient HTTP handlers
//!
//! Nothing is persisted: handlers validate their input and echo it back.

use super::AppState;
use crate::core::error::{RequestError, ServiceError};
use crate::core::record::Record;
use crate::core::validation::Validated;
use crate::models::Patient;
use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Query parameters accepted by [`view`]
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub search: Option<String>,
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_sort() -> String {
    "asc".to_string()
}

pub async fn root() -> Json<Value> {
    Json(json!({ "code": 200, "message": "Hello" }))
}

pub async fn view(
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Path(view_id) = path.map_err(|e| RequestError::InvalidPathParam {
        name: "view_id".to_string(),
        message: e.body_text(),
    })?;
    let Query(query) = query.map_err(|e| RequestError::InvalidQuery {
        message: e.body_text(),
    })?;

    let search = query.search.as_deref().unwrap_or("None");
    Ok(Json(json!({
        "code": 200,
        "message": format!("Hello , {}, {}, {}", view_id, search, query.sort)
    })))
}

pub async fn create_patient(
    Validated(patient): Validated<Patient>,
) -> Result<Json<Value>, ServiceError> {
    tracing::info!(name = %patient.name, bmi = patient.bmi(), "patient record accepted");
    Ok(Json(json!({ "code": 200, "message": patient.export()? })))
}

pub async fn update_patient(Path(patient_id): Path<String>) -> Json<Value> {
    tracing::info!(patient_id = %patient_id, "patient update requested");
    Json(json!({ "message": "Patient updated successfully" }))
}

pub async fn delete_patient(Path(patient_id): Path<String>) -> Json<Value> {
    tracing::info!(patient_id = %patient_id, "patient delete requested");
    Json(json!({ "message": "Patient deleted successfully" }))
}

/// JSON schema of the patient record as configured
pub async fn patient_schema_doc(State(state): State<AppState>) -> Json<Value> {
    Json(state.patient_schema.json_schema())
}
