//
//  atlas-rest
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # REST Client
//!
//! [`RestClient`] is the shared base every product client is built on. It
//! owns the session configuration and the transport, and it is the only
//! place requests are issued from.
//!
//! ## Features
//!
//! - Deployment detection (Cloud vs Server/DC) at construction
//! - Version-bound endpoint resolution
//! - Authentication, User-Agent and custom header injection
//! - Error classification of every response
//! - Lazy pagination over both wire protocols
//! - Opt-in request/response body logging

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::api::common::{Listing, Paginator};
use crate::api::endpoints::{ApiVersion, EndpointRegistry};
use crate::api::transport::{set_header, HttpTransport, Method, Request, Response, Transport};
use crate::config::{ClientConfig, Deployment};
use crate::error::Result;

/// The HTTP client shared by all product clients.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use atlas_rest::api::RestClient;
/// use atlas_rest::config::ClientConfig;
///
/// let config = ClientConfig::new("https://acme.atlassian.net")
///     .with_basic_auth("me@acme.com", "api-token");
/// let client = RestClient::new(config)?;
/// assert!(client.is_cloud());
/// # Ok::<(), atlas_rest::Error>(())
/// ```
///
/// # Headers
///
/// The session configuration is read-only after construction, except for
/// the header set, which [`RestClient::update_headers`] changes. That takes
/// `&mut self`, so a client shared across threads needs the caller's own
/// synchronization to mutate it.
pub struct RestClient {
    config: ClientConfig,
    deployment: Deployment,
    endpoints: EndpointRegistry,
    headers: BTreeMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl RestClient {
    /// Creates a client using the default [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// could not be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client over a caller-supplied transport.
    ///
    /// The deployment is classified once here and never again.
    ///
    /// # Parameters
    ///
    /// * `config` - The session configuration
    /// * `transport` - Anything that can execute a [`Request`]
    ///
    /// # Returns
    ///
    /// Returns `Ok(RestClient)` on success, or [`Error::Config`](crate::Error::Config)
    /// if the configuration fails validation.
    ///
    /// # Default Headers
    ///
    /// * `Accept: application/json`
    /// * `User-Agent` from [`ClientConfig::effective_user_agent`]
    /// * every configured header, replacing a default of the same name
    ///   whatever its case
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let deployment = config.deployment();
        let endpoints = EndpointRegistry::new(config.api_version);

        let mut headers = BTreeMap::new();
        set_header(&mut headers, "Accept", "application/json");
        set_header(&mut headers, "User-Agent", config.effective_user_agent());
        for (name, value) in &config.headers {
            set_header(&mut headers, name.as_str(), value.as_str());
        }

        debug!(
            url = %config.url,
            %deployment,
            version = %config.api_version,
            "created REST client"
        );

        Ok(Self {
            config,
            deployment,
            endpoints,
            headers,
            transport,
        })
    }

    /// The session configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The deployment classified at construction.
    pub fn deployment(&self) -> Deployment {
        self.deployment
    }

    /// Returns `true` if this client targets a Cloud instance.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::api::RestClient;
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let client = RestClient::new(ClientConfig::new("https://jira.acme.com"))?;
    /// let assignee_field = if client.is_cloud() { "accountId" } else { "name" };
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn is_cloud(&self) -> bool {
        self.deployment.is_cloud()
    }

    pub fn api_version(&self) -> ApiVersion {
        self.endpoints.version()
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    /// Headers sent with every request (authorization excluded).
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Adds or replaces session headers for all later requests.
    ///
    /// Names compare case-insensitively, so `("accept", ..)` replaces the
    /// default `Accept`.
    ///
    /// # Parameters
    ///
    /// * `headers` - Name/value pairs to merge into the session headers
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::api::RestClient;
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let mut client = RestClient::new(ClientConfig::new("https://jira.acme.com"))?;
    /// client.update_headers([("X-Atlassian-Token", "no-check")]);
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn update_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            set_header(&mut self.headers, name, value);
        }
    }

    /// Resolves an endpoint key for this client's API version.
    pub fn resolve(&self, key: &str, params: &[(&str, &str)]) -> Result<String> {
        self.endpoints.resolve(key, params)
    }

    /// Turns a path into an absolute URL. Absolute URLs pass through as-is.
    ///
    /// ```rust,no_run
    /// # use atlas_rest::api::RestClient;
    /// # use atlas_rest::config::ClientConfig;
    /// let client = RestClient::new(ClientConfig::new("https://jira.acme.com/"))?;
    /// assert_eq!(client.url_for("/rest/api/2/myself"), "https://jira.acme.com/rest/api/2/myself");
    /// assert_eq!(client.url_for("https://elsewhere/x"), "https://elsewhere/x");
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.config.url, path.trim_start_matches('/'))
        }
    }

    /// Builds a request carrying the session headers and credentials.
    ///
    /// # Parameters
    ///
    /// * `method` - The HTTP method
    /// * `path` - A path relative to the base URL, or an absolute URL
    /// * `query` - Query pairs, URL-encoded by the transport
    /// * `body` - A JSON body; sets `Content-Type: application/json`
    ///
    /// # Returns
    ///
    /// The request, not yet sent. `Authorization` comes from the session
    /// credential and replaces any configured header of the same name.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Request {
        let mut request = Request::new(method, self.url_for(path));
        request.query = query
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        request.headers = self.headers.clone();
        if let Some(credential) = &self.config.credential {
            set_header(
                &mut request.headers,
                "Authorization",
                credential.authorization_header(),
            );
        }
        if let Some(body) = body {
            set_header(&mut request.headers, "Content-Type", "application/json");
            request.body = Some(body.clone());
        }
        request
    }

    /// Sends a request and classifies the response.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`](crate::Error::Network) from the transport
    /// - [`Error::Api`](crate::Error::Api) for any status >= 400
    pub fn execute(&self, request: &Request) -> Result<Response> {
        debug!(method = %request.method, url = %request.url, query = ?request.query, "request");
        if self.config.debug {
            if let Some(body) = &request.body {
                trace!(%body, "request body");
            }
        }

        let response = self.transport.execute(request)?;

        debug!(status = response.status, url = %request.url, "response");
        if self.config.debug {
            trace!(body = %response.body, "response body");
        }

        response.error_for_status()?;
        Ok(response)
    }

    /// Issues a request and parses the JSON answer.
    ///
    /// # Returns
    ///
    /// The parsed body, or `null` for an empty body such as a `204`.
    ///
    /// # Errors
    ///
    /// Everything [`RestClient::execute`] returns, plus
    /// [`Error::MalformedResponse`](crate::Error::MalformedResponse) when a
    /// non-empty body is not JSON.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let request = self.build_request(method, path, query, body);
        self.execute(&request)?.json()
    }

    /// Sends a `GET`.
    ///
    /// # Parameters
    ///
    /// * `path` - A path relative to the base URL, or an absolute URL
    /// * `query` - Query pairs to append
    ///
    /// # Returns
    ///
    /// The parsed JSON body.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::api::RestClient;
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let client = RestClient::new(ClientConfig::new("https://jira.acme.com"))?;
    /// let page = client.get("/rest/api/2/search", &[("jql", "project = PROJ")])?;
    /// println!("{} issues", page["total"]);
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request(Method::Get, path, query, None)
    }

    /// Sends a `POST` with a JSON body.
    ///
    /// # Parameters
    ///
    /// * `path` - A path relative to the base URL, or an absolute URL
    /// * `body` - The JSON payload
    ///
    /// # Returns
    ///
    /// The parsed JSON body, or `null` when the answer is empty.
    pub fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::Post, path, &[], Some(body))
    }

    /// Sends a `PUT` with a JSON body.
    ///
    /// Jira answers most edits with `204`, so this usually returns `null`.
    pub fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::Put, path, &[], Some(body))
    }

    /// Sends a `DELETE`.
    pub fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::Delete, path, &[], None)
    }

    /// Starts a lazy traversal of a listing.
    ///
    /// The protocol is the one the listing pins with
    /// [`Listing::protocol`], or else the client's deployment. No request
    /// is sent until the first item is pulled.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::api::common::Listing;
    /// use atlas_rest::api::RestClient;
    /// use atlas_rest::config::ClientConfig;
    ///
    /// let client = RestClient::new(ClientConfig::new("https://acme.atlassian.net"))?;
    /// let keys: Vec<String> = client
    ///     .paginate(Listing::new("/rest/api/3/project/search"))
    ///     .filter_map(|project| project.ok())
    ///     .filter_map(|project| project["key"].as_str().map(str::to_string))
    ///     .collect();
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn paginate(&self, listing: Listing) -> Paginator<'_> {
        Paginator::new(self, listing)
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("url", &self.config.url)
            .field("deployment", &self.deployment)
            .field("version", &self.endpoints.version())
            .finish_non_exhaustive()
    }
}
