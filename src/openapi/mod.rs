use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transport Ledger API",
        version = "1.0.0",
        description = r#"
Record keeping for vehicle transport jobs: rent, advance, outstanding balance
and whether it has been settled.

## Records

`balanceAmount` is always `rentAmount - advanceAmount`; the server derives it
on create and on every edit. New records start `UNPAID`.

## Marking paid

`PUT /api/transport/{id}` with an empty body, `{}` or `{"isPaid": true}`
settles the balance as of now. Any other object body is an edit.

## Errors

```json
{
  "error": "rentAmount is required",
  "request_id": "0f6c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "transport", description = "Transport job records"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::transport::create_record,
        crate::handlers::transport::list_records,
        crate::handlers::transport::update_record,
        crate::handlers::transport::delete_record,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::models::transport::TransportRecord,
            crate::models::transport::AdvanceType,
            crate::models::transport::BalanceStatus,
            crate::services::transport::CreateTransportRequest,
            crate::services::transport::UpdateTransportRequest,
            crate::services::transport::DeleteResponse,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::ComponentHealth,
            crate::handlers::health::ComponentStatus,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_transport_endpoints() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Transport Ledger API"));
        assert!(json.contains("/api/transport"));
        assert!(json.contains("/api/transport/{id}"));
        assert!(json.contains("TransportRecord"));
    }
}
