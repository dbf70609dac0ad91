//! Axum extractor for validated records
//!
//! This module provides the `Validated<T>` extractor that decodes a JSON body
//! and builds a [`Record`] before the request reaches the handler.

use crate::core::error::{ServiceError, ValidationError};
use crate::core::record::Record;
use crate::core::validation::schema::RecordSchema;
use axum::{
    Json,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;

/// State that can hand out the schema a record type should be validated with
///
/// Lets the server validate against a schema built from runtime config
/// instead of the record's compiled-in default.
pub trait RecordSchemaSource<T: Record> {
    fn record_schema(&self) -> Arc<RecordSchema>;
}

/// Axum extractor that validates a JSON body into a record
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_patient(
///     Validated(patient): Validated<Patient>,
/// ) -> Json<Value> {
///     // patient already passed every field constraint
/// }
/// ```
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner record
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: RecordSchemaSource<T> + Send + Sync,
    T: Record + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = match Json::from_request(req, state).await {
            Ok(json) => json,
            Err(e) => {
                return Err(ServiceError::from(ValidationError::InvalidJson {
                    message: e.body_text(),
                })
                .into_response());
            }
        };

        let schema = state.record_schema();
        T::construct_with(&schema, &payload)
            .map(Validated)
            .map_err(|errors| {
                tracing::info!(record = %schema.name(), error = %errors, "rejected request body");
                errors.into_response()
            })
    }
}
