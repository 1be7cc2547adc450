//
//  atlas-rest
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! The session configuration a client is constructed from: base URL,
//! credentials, API version, deployment override, custom headers, request
//! timeout, page size, debug logging and User-Agent override.
//!
//! ## Sources
//!
//! A [`ClientConfig`] can be assembled three ways, and the three compose:
//!
//! - **Builder**: [`ClientConfig::new`] followed by `with_*` calls
//! - **TOML document**: [`ClientConfig::from_toml_str`] / [`ClientConfig::load`]
//! - **Environment**: [`ClientConfig::from_env`] (explicit, never implicit)
//!
//! ## Example Configuration File
//!
//! ```toml
//! url = "https://acme.atlassian.net"
//! username = "me@acme.com"
//! password = "api-token"
//! api_version = 3
//! timeout_secs = 30
//! debug = false
//!
//! [headers]
//! X-Atlassian-Token = "no-check"
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ATLAS_URL` | `url` |
//! | `ATLAS_USERNAME` / `ATLAS_PASSWORD` | basic credential |
//! | `ATLAS_TOKEN` | bearer credential |
//! | `ATLAS_API_VERSION` | `api_version` |
//! | `ATLAS_CLOUD` | deployment override (`true` / `false`) |
//! | `ATLAS_TIMEOUT` | timeout in seconds |
//! | `ATLAS_DEBUG` | verbose request/response logging |
//!
//! ## Submodules
//!
//! - [`hosts`]: the deployment resolver

mod hosts;

pub use hosts::*;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::api::endpoints::ApiVersion;
use crate::api::transport::set_header;
use crate::auth::Credential;
use crate::error::{Error, Result};
use crate::{APP_NAME, VERSION};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(75);

/// Default page size requested from offset-paginated listings.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Session configuration shared read-only by every part of a client.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use atlas_rest::api::endpoints::ApiVersion;
/// use atlas_rest::config::{ClientConfig, Deployment};
///
/// let config = ClientConfig::new("https://jira.acme.com/")
///     .with_token("personal-access-token")
///     .with_api_version(ApiVersion::V2)
///     .with_header("X-Atlassian-Token", "no-check")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.url, "https://jira.acme.com");
/// assert_eq!(config.deployment(), Deployment::Server);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the instance, without a trailing slash.
    pub url: String,

    pub credential: Option<Credential>,

    pub api_version: ApiVersion,

    /// Explicit deployment; `None` lets the resolver decide from the URL.
    pub deployment_override: Option<Deployment>,

    /// Headers sent with every request, on top of the defaults.
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout. Never applied to a whole pagination traversal.
    pub timeout: Duration,

    /// Page size requested from listings.
    pub page_size: u32,

    /// Log request and response bodies at `trace` level.
    pub debug: bool,

    /// Replaces the synthesized User-Agent when set.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the URL.
    ///
    /// # Parameters
    ///
    /// * `url` - Base URL of the instance. A trailing slash is dropped.
    ///
    /// # Returns
    ///
    /// A configuration with API version 2, no credential, a 75 second
    /// timeout and a page size of 50.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://acme.atlassian.net/");
    /// assert_eq!(config.url, "https://acme.atlassian.net");
    /// assert_eq!(config.page_size, 50);
    /// ```
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: normalize_base_url(url.as_ref()),
            credential: None,
            api_version: ApiVersion::default(),
            deployment_override: None,
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            debug: false,
            user_agent: None,
        }
    }

    /// Authenticates with a username (or Cloud account email) and password
    /// (or Cloud API token).
    ///
    /// # Parameters
    ///
    /// * `username` - Server username, or the account email on Cloud
    /// * `password` - Server password, or an API token on Cloud
    ///
    /// # Returns
    ///
    /// Returns `self` with a [`Credential::Basic`] set, replacing any
    /// earlier credential.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::auth::Credential;
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://acme.atlassian.net")
    ///     .with_basic_auth("me@acme.com", "api-token");
    /// assert!(matches!(config.credential, Some(Credential::Basic { .. })));
    /// ```
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credential = Some(Credential::basic(username, password));
        self
    }

    /// Authenticates with a bearer token, such as a Server/DC personal
    /// access token.
    ///
    /// # Parameters
    ///
    /// * `token` - The token, sent as `Authorization: Bearer <token>`
    ///
    /// # Returns
    ///
    /// Returns `self` with a [`Credential::Token`] set, replacing any
    /// earlier credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::token(token));
        self
    }

    /// Sets a credential built elsewhere, e.g. loaded from a file.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Chooses the REST API version every endpoint resolves against.
    ///
    /// # Parameters
    ///
    /// * `version` - [`ApiVersion::V2`] works on every deployment;
    ///   [`ApiVersion::V3`] is Cloud only
    ///
    /// # Returns
    ///
    /// Returns `self` with the version set.
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Forces the deployment instead of classifying the URL.
    ///
    /// Useful for Cloud instances behind a custom domain.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::config::{ClientConfig, Deployment};
    ///
    /// let config = ClientConfig::new("https://jira.acme.com").with_deployment(Deployment::Cloud);
    /// assert_eq!(config.deployment(), Deployment::Cloud);
    /// ```
    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment_override = Some(deployment);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Names compare case-insensitively: a later `accept` replaces an
    /// earlier `Accept`, and a configured header replaces the default of
    /// the same name.
    ///
    /// # Parameters
    ///
    /// * `name` - Header name, sent with the spelling given here
    /// * `value` - Header value
    ///
    /// # Returns
    ///
    /// Returns `self` with the header set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://jira.acme.com")
    ///     .with_header("X-Atlassian-Token", "no-check")
    ///     .with_header("x-atlassian-token", "nocheck");
    /// assert_eq!(config.headers.len(), 1);
    /// assert_eq!(config.headers["x-atlassian-token"], "nocheck");
    /// ```
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    /// Sets the per-request timeout.
    ///
    /// The timeout bounds each HTTP exchange on its own. A paginated
    /// traversal issues many requests and has no overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page size requested from listings (`maxResults`).
    ///
    /// # Parameters
    ///
    /// * `page_size` - Items per page. Zero is rejected by
    ///   [`ClientConfig::validate`]. Servers may return fewer.
    ///
    /// # Returns
    ///
    /// Returns `self` with the page size set.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Logs request and response bodies at `trace` level when `true`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replaces the synthesized `atlas-rest/<version> (<os>)` User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The deployment for this configuration, honouring the override.
    pub fn deployment(&self) -> Deployment {
        classify(&self.url, self.deployment_override)
    }

    /// The User-Agent sent with every request.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }

    /// Checks the configuration can be used to build a client.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` does not parse
    /// - [`Error::Config`] for a non-http(s) URL or a zero page size
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        Ok(())
    }

    /// Parses a TOML configuration document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::api::endpoints::ApiVersion;
    /// use atlas_rest::config::{ClientConfig, Deployment};
    ///
    /// let config = ClientConfig::from_toml_str(r#"
    ///     url = "https://jira.acme.com"
    ///     token = "pat"
    ///     api_version = "2"
    ///     cloud = true
    /// "#)?;
    ///
    /// assert_eq!(config.api_version, ApiVersion::V2);
    /// assert_eq!(config.deployment(), Deployment::Cloud);
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        file.into_config()
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Builds a configuration from the `ATLAS_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `ATLAS_URL` is unset or a value does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`ClientConfig::from_env`] over an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("ATLAS_URL").ok_or_else(|| Error::config("ATLAS_URL is not set"))?;
        let mut config = Self::new(url);

        if let Some(token) = lookup("ATLAS_TOKEN") {
            config = config.with_token(token);
        } else if let Some(username) = lookup("ATLAS_USERNAME") {
            let password = lookup("ATLAS_PASSWORD").unwrap_or_default();
            config = config.with_basic_auth(username, password);
        }

        if let Some(version) = lookup("ATLAS_API_VERSION") {
            config.api_version = version.parse()?;
        }
        if let Some(cloud) = lookup("ATLAS_CLOUD") {
            config.deployment_override = Some(Deployment::from_cloud_flag(parse_flag(
                "ATLAS_CLOUD",
                &cloud,
            )?));
        }
        if let Some(timeout) = lookup("ATLAS_TIMEOUT") {
            let seconds: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("ATLAS_TIMEOUT is not a number: '{timeout}'")))?;
            config.timeout = Duration::from_secs(seconds);
        }
        if let Some(debug) = lookup("ATLAS_DEBUG") {
            config.debug = parse_flag("ATLAS_DEBUG", &debug)?;
        }

        Ok(config)
    }
}

/// The User-Agent synthesized from crate identity, version and platform.
///
/// # Example
///
/// ```rust
/// let agent = atlas_rest::config::default_user_agent();
/// assert!(agent.starts_with("atlas-rest/"));
/// ```
pub fn default_user_agent() -> String {
    format!(
        "{APP_NAME}/{VERSION} ({}; {})",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!("{name} is not a boolean: '{other}'"))),
    }
}

/// On-disk shape of a configuration document.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    api_version: Option<ApiVersion>,
    cloud: Option<bool>,
    headers: BTreeMap<String, String>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
    debug: bool,
    user_agent: Option<String>,
}

impl ConfigFile {
    fn into_config(self) -> Result<ClientConfig> {
        let url = self
            .url
            .ok_or_else(|| Error::config("missing required field 'url'"))?;
        let mut config = ClientConfig::new(url);

        config.credential = match (self.token, self.username) {
            (Some(token), _) => Some(Credential::token(token)),
            (None, Some(username)) => Some(Credential::basic(
                username,
                self.password.unwrap_or_default(),
            )),
            (None, None) => None,
        };
        if let Some(version) = self.api_version {
            config.api_version = version;
        }
        config.deployment_override = self.cloud.map(Deployment::from_cloud_flag);
        config.headers = self.headers;
        if let Some(seconds) = self.timeout_secs {
            config.timeout = Duration::from_secs(seconds);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        config.debug = self.debug;
        config.user_agent = self.user_agent;

        config.validate()?;
        Ok(config)
    }
}
