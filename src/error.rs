//
//  atlas-rest
//  error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Crate-wide error type.
//!
//! Every public API returns [`Result<T>`]. Classified HTTP failures arrive as
//! [`Error::Api`]; the remaining variants cover transport problems and
//! mistakes made before a request is ever sent (unknown endpoint keys,
//! missing template parameters, unknown method names).

use thiserror::Error;

use crate::api::common::{ApiError, ErrorKind};
use crate::api::endpoints::ApiVersion;

/// The main error type for atlas-rest.
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a status >= 400.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Connection failures, timeouts, TLS and other transport-layer issues.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No endpoint is registered under `key` for `version`.
    #[error("Unknown endpoint '{key}' for API version {version}")]
    UnknownEndpoint { key: String, version: ApiVersion },

    /// An endpoint template placeholder had no matching argument.
    #[error("Missing parameter '{param}' for endpoint '{key}'")]
    MissingParameter { key: String, param: String },

    /// Neither the client nor the legacy mapping table knows the name.
    #[error("'{type_name}' object has no attribute '{name}'")]
    MissingAttribute { type_name: String, name: String },

    /// A dynamically dispatched call received arguments it cannot use.
    #[error("Invalid argument for '{method}': {message}")]
    InvalidArgument { method: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A success response whose body could not be used.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl Error {
    /// The classified kind, when this error came from an HTTP status.
    pub fn api_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api(error) => Some(error.kind()),
            _ => None,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(method: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            method: method.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
