//! Error handling.

use axum::{
    extract::rejection::JsonRejection,
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{event, Level};

/// Incentive map error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum IncentiveMapError {
    /// Error sending a request to the remote data store or decoding its response
    #[error("error querying the remote data store")]
    DataAccess(#[from] reqwest::Error),

    /// Remote data store responded with an unsuccessful status
    #[error("remote data store returned status {status} for table {table}")]
    DataAccessStatus { table: &'static str, status: u16 },

    /// A remote table that must have rows was empty
    #[error("no rows returned from {table} table")]
    EmptyTable { table: &'static str },

    /// The remote data store URL cannot have a path appended
    #[error("remote data store URL {url} cannot be used as a base URL")]
    InvalidSourceUrl { url: String },

    /// Invalid listen address
    #[error("invalid host name, IP address or port number")]
    ListenAddress(#[from] std::net::AddrParseError),

    /// Error deserialising request data into a FilterRequest
    #[error("request data is not valid")]
    RequestDataJsonRejection(#[from] JsonRejection),

    /// Error validating request data (single error)
    #[error("request data is not valid")]
    RequestDataValidationSingle(#[from] validator::ValidationError),

    /// Error validating request data (multiple errors)
    #[error("request data is not valid")]
    RequestDataValidation(#[from] validator::ValidationErrors),

    /// I/O error while serving
    #[error("server I/O error")]
    ServerIo(#[from] std::io::Error),

    /// Error rendering a template
    #[error("failed to render {name}")]
    Template {
        name: &'static str,
        #[source]
        source: minijinja::Error,
    },

    /// Filter refers to a region that does not exist
    #[error("unknown region {name}")]
    UnknownRegion { name: String },
}

impl IntoResponse for IncentiveMapError {
    /// Convert from an `IncentiveMapError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Format an error and its chain of causes on a single line.
///
/// Consecutive duplicate messages are collapsed.
pub fn describe<E>(error: &E) -> String
where
    E: std::error::Error + ?Sized,
{
    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(source) = current {
        messages.push(source.to_string());
        current = source.source();
    }
    messages.dedup();
    messages.join(": ")
}

/// Log an error and its chain of causes.
pub fn log_error<E>(error: &E)
where
    E: std::error::Error + ?Sized,
{
    event!(Level::ERROR, "{}", error.to_string());
    let mut current = error.source();
    while let Some(source) = current {
        event!(Level::ERROR, "Caused by: {}", source.to_string());
        current = source.source();
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut causes = Vec::new();
        let mut current = error.source();
        while let Some(source) = current {
            causes.push(source.to_string());
            current = source.source();
        }
        // Remove duplicate entries.
        causes.dedup();
        let caused_by = if causes.is_empty() {
            None
        } else {
            Some(causes)
        };
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 502 bad gateway ErrorResponse
    fn bad_gateway<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_GATEWAY, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<IncentiveMapError> for ErrorResponse {
    /// Convert from an `IncentiveMapError` into an `ErrorResponse`.
    fn from(error: IncentiveMapError) -> Self {
        let response = match &error {
            // Bad request
            IncentiveMapError::RequestDataJsonRejection(_)
            | IncentiveMapError::RequestDataValidationSingle(_)
            | IncentiveMapError::RequestDataValidation(_)
            | IncentiveMapError::UnknownRegion { name: _ } => Self::bad_request(&error),

            // Bad gateway
            IncentiveMapError::DataAccess(_)
            | IncentiveMapError::DataAccessStatus {
                table: _,
                status: _,
            }
            | IncentiveMapError::EmptyTable { table: _ } => Self::bad_gateway(&error),

            // Internal server error
            IncentiveMapError::InvalidSourceUrl { url: _ }
            | IncentiveMapError::ListenAddress(_)
            | IncentiveMapError::ServerIo(_)
            | IncentiveMapError::Template { name: _, source: _ } => {
                Self::internal_server_error(&error)
            }
        };

        // Log server errors.
        if response.status.is_server_error() {
            log_error(&error);
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}
