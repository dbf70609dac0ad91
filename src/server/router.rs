//! Router builder for patient routes

use super::AppState;
use super::handlers::{
    create_patient, delete_patient, patient_schema_doc, root, update_patient, view,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the patient routes
///
/// - GET /                       - Greeting
/// - GET /view/{view_id}         - Echo path and query parameters
/// - POST /create                - Validate a patient record and echo it
/// - PUT /edit/{patient_id}      - Acknowledge an update
/// - DELETE /delete/{patient_id} - Acknowledge a delete
/// - GET /schema                 - Patient JSON schema
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/view/{view_id}", get(view))
        .route("/create", post(create_patient))
        .route("/edit/{patient_id}", put(update_patient))
        .route("/delete/{patient_id}", delete(delete_patient))
        .route("/schema", get(patient_schema_doc))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
