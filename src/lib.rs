//
//  atlas-rest
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # atlas-rest
//!
//! A version-aware REST client core for Atlassian Cloud and
//! Server/Data Center products.
//!
//! ## Overview
//!
//! The same product speaks different REST dialects depending on where it is
//! hosted and which API major version is in use. This library absorbs those
//! differences so callers write one piece of code for all of them.
//!
//! ## Features
//!
//! - **Endpoint Registry**: one table maps (operation, API version) to a URL template
//! - **Deployment Detection**: Cloud vs Server/DC from the base URL, with an override
//! - **Unified Pagination**: one lazy iterator over both pagination protocols
//! - **Typed Errors**: every HTTP failure classified, with the server's diagnostics
//! - **Legacy Names**: old method names keep working and emit deprecation notices
//!
//! ## Module Structure
//!
//! - [`api`]: the REST client, endpoint registry, pagination and the Jira client
//! - [`auth`]: credentials
//! - [`compat`]: the legacy method-name adapter
//! - [`config`]: session configuration and deployment detection
//! - [`error`]: the crate-wide error type
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use atlas_rest::{ClientConfig, Jira};
//!
//! let config = ClientConfig::new("https://jira.acme.com").with_token("personal-access-token");
//! let jira = Jira::new(config)?;
//!
//! for project in jira.get_projects_iter()? {
//!     println!("{}", project?["key"]);
//! }
//! # Ok::<(), atlas_rest::Error>(())
//! ```
//!
//! ## Platform Differences
//!
//! | Concern | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | Pagination | `nextPage` URL + `isLast` | `startAt` / `maxResults` / `total` |
//! | Users | account IDs | usernames |
//! | API versions | 2 and 3 | 2 |
//!
//! ## Logging
//!
//! The library logs through `tracing` and never installs a subscriber.
//! Request lines are logged at `debug`; request and response bodies at
//! `trace` when [`ClientConfig::debug`] is set. Deprecation notices go to
//! the `atlas_rest::deprecation` target at `warn`.

/// REST client core and product clients.
///
/// Contains the session client, the endpoint registry, the error classifier,
/// the paginator and the Jira client built on them.
pub mod api;

/// Credentials attached to outbound requests.
pub mod auth;

/// Legacy method-name adapter.
///
/// Forwards deprecated method names to their current replacements and
/// reports each use.
pub mod compat;

/// Session configuration.
///
/// Builder, TOML and environment sources, plus the Cloud/Server resolver.
pub mod config;

/// Crate-wide error type.
pub mod error;

pub use api::jira::Jira;
pub use api::RestClient;
pub use compat::LegacyJira;
pub use config::{ClientConfig, Deployment};
pub use error::{Error, Result};

/// Library name, used in the default User-Agent.
pub const APP_NAME: &str = "atlas-rest";

/// Library version, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use atlas_rest::VERSION;
///
/// println!("atlas-rest {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
