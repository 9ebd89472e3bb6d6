use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::error::ApiError;
use crate::models::{Client, ClientInput};
use crate::service::{ClientService, NOT_FOUND};

pub const CREATED: &str = "Client created successfully";
pub const UPDATED: &str = "Client updated successfully";
pub const REMOVED: &str = "Client removed successfully";

// Ids that do not parse cannot name a row.
fn client_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(NOT_FOUND.to_string()))
}

fn body(json: Result<Json<ClientInput>, JsonRejection>) -> Result<ClientInput, ApiError> {
    json.map(|Json(input)| input)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn list(State(service): State<ClientService>) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = service
        .list()
        .await
        .map_err(ApiError::service("Failed to list clients"))?;
    Ok(Json(clients))
}

pub async fn get(
    State(service): State<ClientService>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Client>, ApiError> {
    let id = client_id(path)?;
    let client = service
        .get(id)
        .await
        .map_err(ApiError::service("Failed to fetch client"))?;
    Ok(Json(client))
}

pub async fn create(
    State(service): State<ClientService>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = body(payload)?;
    service
        .create(&input)
        .await
        .map_err(ApiError::service("Failed to create client"))?;
    Ok((StatusCode::CREATED, Json(json!({ "message": CREATED }))))
}

pub async fn update(
    State(service): State<ClientService>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = client_id(path)?;
    let input = body(payload)?;
    service
        .update(id, &input)
        .await
        .map_err(ApiError::service("Failed to update client"))?;
    Ok(Json(json!({ "message": UPDATED })))
}

pub async fn delete(
    State(service): State<ClientService>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = client_id(path)?;
    service
        .delete(id)
        .await
        .map_err(ApiError::service("Failed to remove client"))?;
    Ok(Json(json!({ "message": REMOVED })))
}
