#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use transport_ledger::{
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};

/// Helper harness for spinning up the application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        let state = AppState::new(Arc::new(pool), cfg);
        let router = transport_ledger::build_router(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> axum::response::Response {
        let body = body.map(|json| serde_json::to_vec(&json).expect("failed to serialize json request body"));
        self.request_raw(method, uri, body, &[]).await
    }

    /// Send raw bytes with extra headers; `None` sends an empty body.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header("content-type", "application/json");
                Body::from(bytes)
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// POST a record and return the stored JSON.
    pub async fn create(&self, body: Value) -> Value {
        let response = self.request(Method::POST, "/api/transport", Some(body)).await;
        assert_eq!(response.status(), 201, "create failed");
        response_json(response).await
    }

    /// Serve the router on an ephemeral port for the HTTP client tests.
    pub async fn spawn(self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("no local addr");
        let router = self.router;
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .expect("test server failed");
        });
        addr
    }
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response was not json")
}

/// A complete, valid create body for the given date and vehicle.
pub fn record_body(date: &str, vehicle_no: &str, rent: f64, advance: f64) -> Value {
    json!({
        "date": date,
        "vehicleNo": vehicle_no,
        "driverName": "RAVI",
        "driverMobile": "9876543210",
        "place": "PUNE",
        "transportName": "SAI TRANSPORT",
        "rentAmount": rent,
        "advanceAmount": advance,
        "advanceDate": date,
        "advanceType": "cash",
        "balanceAmount": rent - advance
    })
}
