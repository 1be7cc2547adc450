//
//  atlas-rest
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! The version-aware REST core and the product clients built on it.
//!
//! ## Architecture
//!
//! - [`client`]: [`RestClient`], the session every request goes through
//! - [`endpoints`]: the (operation, version) → URL template registry
//! - [`transport`]: the HTTP collaborator behind the [`Transport`] trait
//! - [`common`]: error classification and pagination shared by all products
//! - [`jira`]: the issue-tracker client
//!
//! ## Error Handling
//!
//! Every response with a status of 400 or above becomes an [`ApiError`]:
//!
//! - `NotFound`: 404
//! - `PermissionDenied`: 403
//! - `AuthRequired`: 401
//! - `BadRequest`: 400
//! - `Conflict`: 409
//! - `RateLimited`: 429, with the `Retry-After` hint
//! - `ServerError`: 5xx
//! - `Unclassified`: any other status >= 400

/// Session-owning HTTP client.
pub mod client;

/// Error classification and pagination.
pub mod common;

/// Endpoint registry keyed by operation and API version.
pub mod endpoints;

/// Issue-tracker client.
pub mod jira;

/// HTTP transport trait and its `reqwest` implementation.
pub mod transport;

pub use client::RestClient;
pub use common::{ApiError, ErrorKind, Listing, Paginator};
pub use endpoints::{ApiVersion, EndpointRegistry};
pub use transport::{HttpTransport, Method, Request, Response, Transport};
