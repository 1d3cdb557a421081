//! One thin handler per route, all delegating to the three generic
//! operations below. Validation happens before any store call, so a 400
//! never leaves a partial write behind.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::{
    error::AppError,
    resources::{CONTACTS, PROJECTS, Resource, SURVEYS, required_message},
    state::State as AppState,
    store::StoreError,
};

pub async fn list_surveys(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    list_resource(&state, &SURVEYS).await
}

pub async fn create_survey(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    create_resource(&state, &SURVEYS, &body).await
}

pub async fn delete_survey(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    delete_resource(&state, &SURVEYS, &id).await
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    list_resource(&state, &PROJECTS).await
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    create_resource(&state, &PROJECTS, &body).await
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    delete_resource(&state, &PROJECTS, &id).await
}

pub async fn list_contacts(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    list_resource(&state, &CONTACTS).await
}

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    create_resource(&state, &CONTACTS, &body).await
}

pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    delete_resource(&state, &CONTACTS, &id).await
}

async fn list_resource(state: &AppState, resource: &Resource) -> Result<Response, AppError> {
    let records = state
        .store
        .list(resource.collection)
        .await
        .map_err(|source| store_error(resource.messages.fetch_failed, source))?;

    Ok((StatusCode::OK, Json(Value::Array(records))).into_response())
}

async fn create_resource(
    state: &AppState,
    resource: &Resource,
    body: &Value,
) -> Result<Response, AppError> {
    let missing = resource.missing_fields(body);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(required_message(&missing)));
    }

    // Only the declared fields are persisted; anything else in the body is
    // dropped.
    let mut record = Map::new();
    for field in resource.required {
        if let Some(value) = body.get(field) {
            record.insert((*field).to_string(), value.clone());
        }
    }
    if let Some(field) = resource.timestamp_field {
        record.insert(
            field.to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }

    let stored = state
        .store
        .create(resource.collection, record)
        .await
        .map_err(|source| store_error(resource.messages.create_failed, source))?;

    let mut response = Map::new();
    response.insert(
        "message".to_string(),
        Value::String(resource.messages.created.to_string()),
    );
    response.insert(resource.key.to_string(), stored);

    Ok((StatusCode::CREATED, Json(Value::Object(response))).into_response())
}

async fn delete_resource(
    state: &AppState,
    resource: &Resource,
    id: &str,
) -> Result<Response, AppError> {
    let removed = state
        .store
        .delete_by_id(resource.collection, id)
        .await
        .map_err(|source| store_error(resource.messages.delete_failed, source))?;

    if !removed {
        return Err(AppError::NotFound(resource.messages.not_found));
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "message": resource.messages.deleted })),
    )
        .into_response())
}

fn store_error(message: &'static str, source: StoreError) -> AppError {
    error!("{message}: {source}");
    AppError::Store { message, source }
}
