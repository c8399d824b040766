use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{ClientError, ClientResult};
use crate::models::transport::TransportRecord;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body shape returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    details: Option<String>,
}

/// Confirmation returned by delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Thin async wrapper over the four `/transport` endpoints.
#[derive(Clone, Debug)]
pub struct TransportApiClient {
    client: Client,
    base_url: String,
}

impl TransportApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/transport", self.base_url)
    }

    fn record_url(&self, id: Uuid) -> String {
        format!("{}/transport/{}", self.base_url, id)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> ClientResult<Vec<TransportRecord>> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, "Error fetching data").await
    }

    #[instrument(skip(self, payload))]
    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> ClientResult<TransportRecord> {
        let response = self
            .client
            .post(self.collection_url())
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, "Error saving data. Please try again.").await
    }

    /// `None` when the server no longer has the record.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: Uuid) -> ClientResult<Option<TransportRecord>> {
        let response = self
            .client
            .put(self.record_url(id))
            .json(&json!({ "isPaid": true }))
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, "Error updating payment status").await
    }

    #[instrument(skip(self, payload))]
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        id: Uuid,
        payload: &P,
    ) -> ClientResult<Option<TransportRecord>> {
        let response = self
            .client
            .put(self.record_url(id))
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, "Error updating record").await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> ClientResult<DeleteConfirmation> {
        let response = self
            .client
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, "Error deleting record").await
    }

    async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> ClientResult<T> {
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Network(e)
            } else {
                ClientError::Decode(e.to_string())
            }
        })
    }
}

/// The server's `error`, then `details`, then the per-action fallback.
fn error_message(body: &str, fallback: &str) -> String {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .filter(|m| !m.trim().is_empty())
        .or(parsed.details.filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| fallback.to_string())
}
