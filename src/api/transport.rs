//
//  atlas-rest
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! The REST core decides what to send and how to read the answer; moving
//! bytes is delegated to a [`Transport`]. TLS, connection reuse and
//! socket-level retries live behind this trait.
//!
//! [`HttpTransport`] is the default implementation, built on `reqwest`'s
//! blocking client. Tests and embedders can supply their own.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::api::common::{classify, ApiError};
use crate::error::{Error, Result};

/// HTTP verbs used by the REST core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL. May already carry a query string.
    pub url: String,
    /// Extra query pairs appended to `url`.
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Looks up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Looks up a header, ignoring the case of its name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Sets a header, replacing any existing header whose name differs only in case.
///
/// The caller's spelling of `name` is kept.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use atlas_rest::api::transport::set_header;
///
/// let mut headers = BTreeMap::new();
/// set_header(&mut headers, "Accept", "application/json");
/// set_header(&mut headers, "accept", "text/plain");
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers["accept"], "text/plain");
/// ```
pub fn set_header(
    headers: &mut BTreeMap<String, String>,
    name: impl Into<String>,
    value: impl Into<String>,
) {
    let name = name.into();
    headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
    headers.insert(name, value.into());
}

/// A raw HTTP response.
///
/// Header names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Runs the error classifier over this response.
    pub fn error_for_status(&self) -> std::result::Result<(), ApiError> {
        match classify(self.status, self.header("retry-after"), &self.body) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Parses the body as JSON; an empty body is `null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| Error::MalformedResponse {
            message: format!("HTTP {} body is not JSON: {e}", self.status),
        })
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations must not interpret the status code; a 404 is a
/// successful transport round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &Request) -> Result<Response>;
}

/// [`Transport`] backed by `reqwest::blocking::Client`.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport applying `timeout` to each individual request.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?,
        })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url.as_str());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_lowercase(), value.to_string()))
            })
            .collect();
        let body = response.text()?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
