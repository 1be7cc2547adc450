//
//  atlas-rest
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use atlas_rest::api::{Request, Response, RestClient, Transport};
use atlas_rest::compat::DeprecationNotice;
use atlas_rest::{ClientConfig, Jira, LegacyJira};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once. `ATLAS_DEBUG=debug` shows request lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("ATLAS_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A transport that answers every request with a closure and counts calls.
pub struct FnTransport<F> {
    handler: F,
    requests: Mutex<Vec<Request>>,
}

impl<F> FnTransport<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    pub fn new(handler: F) -> Arc<Self> {
        Arc::new(Self {
            handler,
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl<F> Transport for FnTransport<F>
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    fn execute(&self, request: &Request) -> atlas_rest::Result<Response> {
        self.requests.lock().unwrap().push(request.clone());
        Ok((self.handler)(request))
    }
}

pub fn client<F>(config: ClientConfig, transport: &Arc<FnTransport<F>>) -> RestClient
where
    F: Fn(&Request) -> Response + Send + Sync + 'static,
{
    RestClient::with_transport(config, transport.clone()).unwrap()
}

/// Answers with a description of the request itself.
pub fn echo(request: &Request) -> Response {
    let body = json!({
        "method": request.method.as_str(),
        "url": request.url,
        "query": request.query,
        "body": request.body,
    });
    Response::new(200, body.to_string())
}

pub type Notices = Arc<Mutex<Vec<DeprecationNotice>>>;

/// A legacy adapter whose notices are collected instead of logged.
pub fn recording_legacy(jira: Jira) -> (LegacyJira, Notices) {
    let notices: Notices = Arc::default();
    let sink = Arc::clone(&notices);
    let legacy = LegacyJira::new(jira).with_notifier(move |notice| sink.lock().unwrap().push(notice.clone()));
    (legacy, notices)
}

pub fn json_response(status: u16, body: &Value) -> Response {
    Response::new(status, body.to_string())
}
