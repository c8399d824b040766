use super::common::{created_response, parse_json_body, success_response};
use crate::{
    errors::ServiceError,
    models::transport::TransportRecord,
    services::transport::{
        parse_record_id, CreateTransportRequest, DeleteResponse, PutAction,
        UpdateTransportRequest,
    },
    AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};

#[utoipa::path(
    post,
    path = "/api/transport",
    request_body = CreateTransportRequest,
    responses(
        (status = 201, description = "Record stored", body = TransportRecord),
        (status = 400, description = "Missing or invalid field", body = crate::errors::ErrorResponse),
        (status = 500, description = "Error saving data", body = crate::errors::ErrorResponse)
    ),
    tag = "transport"
)]
pub async fn create_record(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    let payload: CreateTransportRequest = parse_json_body(&body)?;
    let record = state.services.transport.create(payload).await?;
    Ok(created_response(record))
}

#[utoipa::path(
    get,
    path = "/api/transport",
    responses(
        (status = 200, description = "All records, newest date first", body = [TransportRecord]),
        (status = 500, description = "Error fetching data", body = crate::errors::ErrorResponse)
    ),
    tag = "transport"
)]
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let records = state.services.transport.list().await?;
    Ok(success_response(records))
}

/// Mark a record paid, or edit it.
///
/// An empty body, `{}` or `{"isPaid": true}` settles the balance now. Any
/// other object is applied as a field patch. Unknown ids yield `null`.
#[utoipa::path(
    put,
    path = "/api/transport/{id}",
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    request_body(content = UpdateTransportRequest, description = "Omit for mark-paid"),
    responses(
        (status = 200, description = "Updated record, or null if not found", body = TransportRecord),
        (status = 400, description = "Invalid id or field", body = crate::errors::ErrorResponse),
        (status = 500, description = "Error updating data", body = crate::errors::ErrorResponse)
    ),
    tag = "transport"
)]
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_record_id(&id)?;
    let action = PutAction::from_body(&body)?;
    let updated: Option<TransportRecord> = state.services.transport.apply_put(id, action).await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/transport/{id}",
    params(
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Deleted, or never existed", body = DeleteResponse),
        (status = 400, description = "Invalid id", body = crate::errors::ErrorResponse),
        (status = 500, description = "Error deleting data", body = crate::errors::ErrorResponse)
    ),
    tag = "transport"
)]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_record_id(&id)?;
    let response = state.services.transport.delete(id).await?;
    Ok(success_response(response))
}

/// Routes mounted under `/api`.
pub fn transport_routes() -> Router<AppState> {
    Router::new()
        .route("/transport", get(list_records).post(create_record))
        .route("/transport/:id", put(update_record).delete(delete_record))
}
