//
//  atlas-rest
//  api/jira/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Jira Client
//!
//! An issue-tracker client built on [`RestClient`]. Every method resolves
//! its path through the endpoint registry for the session's API version,
//! so the same code talks to `/rest/api/2` and `/rest/api/3`.
//!
//! ## Method Groups
//!
//! - [`issues`]: issue CRUD, search, comments, transitions, worklogs
//! - [`projects`]: projects, users and instance metadata
//!
//! ## Listings
//!
//! Methods ending in `_iter` return a lazy [`Paginator`]; the plain variant
//! of the same listing returns one page as raw JSON.
//!
//! ## Dynamic Dispatch
//!
//! [`Jira::invoke`] calls a method by name with JSON arguments. It backs the
//! legacy-name adapter in [`crate::compat`], and listing methods are drained
//! into a JSON array when called this way.
//!
//! ## Example
//!
//! ```rust,no_run
//! use atlas_rest::{ClientConfig, Jira};
//!
//! let jira = Jira::new(
//!     ClientConfig::new("https://acme.atlassian.net").with_basic_auth("me@acme.com", "api-token"),
//! )?;
//!
//! let issue = jira.get_issue("PROJ-1")?;
//! println!("{}", issue["fields"]["summary"]);
//!
//! for issue in jira.search_issues_iter("project = PROJ ORDER BY created")? {
//!     println!("{}", issue?["key"]);
//! }
//! # Ok::<(), atlas_rest::Error>(())
//! ```

pub mod issues;
pub mod projects;

use std::fmt;

use serde_json::Value;

use crate::api::client::RestClient;
use crate::api::common::Paginator;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// A dynamically callable method: receives its own name for argument errors.
pub type Handler = fn(&Jira, &str, &[Value]) -> Result<Value>;

/// Every method [`Jira::invoke`] can dispatch, with its handler.
pub static METHODS: &[(&str, Handler)] = &[
    ("get_issue", |jira, name, args| jira.get_issue(str_arg(name, args, 0)?)),
    ("create_issue", |jira, name, args| jira.create_issue(arg(name, args, 0)?)),
    ("update_issue", |jira, name, args| {
        jira.update_issue(str_arg(name, args, 0)?, arg(name, args, 1)?)
    }),
    ("delete_issue", |jira, name, args| jira.delete_issue(str_arg(name, args, 0)?)),
    ("assign_issue", |jira, name, args| {
        jira.assign_issue(str_arg(name, args, 0)?, str_arg(name, args, 1)?)
    }),
    ("search_issues", |jira, name, args| jira.search_issues(str_arg(name, args, 0)?)),
    ("add_comment", |jira, name, args| {
        jira.add_comment(str_arg(name, args, 0)?, arg(name, args, 1)?)
    }),
    ("get_comments", |jira, name, args| {
        drain(jira.get_comments_iter(str_arg(name, args, 0)?)?)
    }),
    ("get_transitions", |jira, name, args| jira.get_transitions(str_arg(name, args, 0)?)),
    ("transition_issue", |jira, name, args| {
        jira.transition_issue(str_arg(name, args, 0)?, str_arg(name, args, 1)?)
    }),
    ("get_watchers", |jira, name, args| jira.get_watchers(str_arg(name, args, 0)?)),
    ("get_worklogs", |jira, name, args| {
        drain(jira.get_worklogs_iter(str_arg(name, args, 0)?)?)
    }),
    ("get_projects", |jira, _, _| drain(jira.get_projects_iter()?)),
    ("get_project", |jira, name, args| jira.get_project(str_arg(name, args, 0)?)),
    ("get_project_components", |jira, name, args| {
        jira.get_project_components(str_arg(name, args, 0)?)
    }),
    ("get_project_versions", |jira, name, args| {
        jira.get_project_versions(str_arg(name, args, 0)?)
    }),
    ("get_user", |jira, name, args| jira.get_user(str_arg(name, args, 0)?)),
    ("search_users", |jira, name, args| jira.search_users(str_arg(name, args, 0)?)),
    ("myself", |jira, _, _| jira.myself()),
    ("server_info", |jira, _, _| jira.server_info()),
    ("get_fields", |jira, _, _| jira.get_fields()),
    ("get_issue_types", |jira, _, _| jira.get_issue_types()),
    ("get_priorities", |jira, _, _| jira.get_priorities()),
    ("get_statuses", |jira, _, _| jira.get_statuses()),
    ("get_filter", |jira, name, args| jira.get_filter(str_arg(name, args, 0)?)),
];

/// Issue-tracker client.
pub struct Jira {
    client: RestClient,
}

impl Jira {
    /// Creates a client over the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// could not be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(RestClient::new(config)?))
    }

    /// Wraps an existing [`RestClient`], e.g. one over a custom transport.
    pub fn from_client(client: RestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    /// Mutable access for header updates.
    pub fn client_mut(&mut self) -> &mut RestClient {
        &mut self.client
    }

    /// Whether `name` is a method [`Jira::invoke`] understands.
    pub fn has_method(name: &str) -> bool {
        Self::handler(name).is_some()
    }

    /// Names of every dynamically callable method, in table order.
    pub fn method_names() -> impl Iterator<Item = &'static str> {
        METHODS.iter().map(|(name, _)| *name)
    }

    fn handler(name: &str) -> Option<Handler> {
        METHODS
            .iter()
            .find(|(method, _)| *method == name)
            .map(|(_, handler)| *handler)
    }

    /// Calls a method by name.
    ///
    /// Arguments are positional, in the order of the typed method's
    /// parameters. Listing methods are drained into a JSON array.
    ///
    /// # Parameters
    ///
    /// * `name` - A name from [`Jira::method_names`]
    /// * `args` - Positional JSON arguments
    ///
    /// # Errors
    ///
    /// - [`Error::MissingAttribute`] if `name` is not a method
    /// - [`Error::InvalidArgument`] if an argument is missing or mistyped
    /// - whatever the called method returns
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::{ClientConfig, Jira};
    /// use serde_json::json;
    ///
    /// let jira = Jira::new(ClientConfig::new("https://jira.acme.com"))?;
    /// let issue = jira.invoke("get_issue", &[json!("PROJ-1")])?;
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        let handler = Self::handler(name).ok_or_else(|| Error::MissingAttribute {
            type_name: "Jira".to_string(),
            name: name.to_string(),
        })?;
        handler(self, name, args)
    }
}

impl fmt::Debug for Jira {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jira").field("client", &self.client).finish()
    }
}

/// Collects a listing into one JSON array, stopping at the first error.
pub fn drain(paginator: Paginator<'_>) -> Result<Value> {
    paginator.collect::<Result<Vec<_>>>().map(Value::Array)
}

pub(crate) fn arg<'v>(method: &str, args: &'v [Value], index: usize) -> Result<&'v Value> {
    args.get(index).ok_or_else(|| {
        Error::invalid_argument(method, format!("missing positional argument {}", index + 1))
    })
}

pub(crate) fn str_arg<'v>(method: &str, args: &'v [Value], index: usize) -> Result<&'v str> {
    arg(method, args, index)?.as_str().ok_or_else(|| {
        Error::invalid_argument(method, format!("argument {} must be a string", index + 1))
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::Jira;
    use crate::api::client::testing::{client, ScriptedTransport};
    use crate::config::ClientConfig;

    pub fn jira(config: ClientConfig, transport: &Arc<ScriptedTransport>) -> Jira {
        Jira::from_client(client(config, transport))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::jira;
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn test_invoke_matches_typed_call() {
        let page = json!({"startAt": 0, "total": 1, "issues": [{"key": "X-1"}]});
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, page.clone()),
            ScriptedTransport::json(200, page),
        ]);
        let jira = jira(ClientConfig::new("https://jira.acme.com"), &transport);

        let typed = jira.search_issues("project = X").unwrap();
        let dynamic = jira.invoke("search_issues", &[json!("project = X")]).unwrap();
        assert_eq!(typed, dynamic);

        let requests = transport.requests();
        assert_eq!(requests[0], requests[1]);
    }

    #[test]
    fn test_invoke_unknown_name() {
        let transport = ScriptedTransport::new([]);
        let jira = jira(ClientConfig::new("https://jira.acme.com"), &transport);

        let error = jira.invoke("frobnicate", &[]).unwrap_err();
        assert_eq!(error.to_string(), "'Jira' object has no attribute 'frobnicate'");
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_invoke_checks_arguments() {
        let transport = ScriptedTransport::new([]);
        let jira = jira(ClientConfig::new("https://jira.acme.com"), &transport);

        assert!(matches!(
            jira.invoke("get_issue", &[]),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            jira.invoke("get_issue", &[json!(42)]),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_every_listed_method_dispatches() {
        let transport = ScriptedTransport::new([]);
        let jira = jira(ClientConfig::new("https://jira.acme.com"), &transport);
        let args = [json!("A"), json!("B")];

        for name in Jira::method_names() {
            assert!(Jira::has_method(name));
            // An exhausted script answers 500; anything but MissingAttribute means dispatched.
            let result = jira.invoke(name, &args);
            assert!(
                !matches!(result, Err(Error::MissingAttribute { .. })),
                "{name} is listed but not dispatched"
            );
        }
    }

    #[test]
    fn test_method_names_are_unique() {
        let names: Vec<&str> = Jira::method_names().collect();
        let unique: std::collections::HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 25);
    }

    #[test]
    fn test_argument_errors_name_the_method() {
        let transport = ScriptedTransport::new([]);
        let jira = jira(ClientConfig::new("https://jira.acme.com"), &transport);

        match jira.invoke("transition_issue", &[json!("A-1")]) {
            Err(Error::InvalidArgument { method, .. }) => assert_eq!(method, "transition_issue"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_drain_listing() {
        let transport = ScriptedTransport::new([ScriptedTransport::json(200, json!([{"key": "A"}, {"key": "B"}]))]);
        let jira = jira(ClientConfig::new("https://jira.acme.com"), &transport);

        let projects = jira.invoke("get_projects", &[]).unwrap();
        assert_eq!(projects, json!([{"key": "A"}, {"key": "B"}]));
    }
}
