//! Client side of the ledger: HTTP access to the API, the entry form, the
//! filtered table view and spreadsheet export.

pub mod api;
pub mod export;
pub mod form;
pub mod view;

pub use api::TransportApiClient;
pub use form::TransportForm;
pub use view::{DateRange, TableStats, TableView};

use thiserror::Error;

/// Message shown when the server cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure or timeout
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Form(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<rust_xlsxwriter::XlsxError> for ClientError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ClientError::Export(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
