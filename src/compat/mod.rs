//
//  atlas-rest
//  compat/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Legacy Method Names
//!
//! Older releases exposed methods under different names. [`LegacyJira`]
//! keeps those names working on top of [`Jira`] without duplicating any
//! request logic.
//!
//! # Overview
//!
//! A fixed table maps every legacy name to a [`Target`]:
//!
//! - [`Target::Rename`]: the current method takes the same arguments
//! - [`Target::Shim`]: a small function reshapes arguments or results where
//!   the API versions genuinely differ
//!
//! # Resolution
//!
//! [`LegacyJira::call`] resolves a name in this order:
//!
//! 1. A current [`Jira`] method: dispatched directly, no notice
//! 2. A legacy name in the table: one [`DeprecationNotice`], then delegated
//! 3. Anything else: [`Error::MissingAttribute`]
//!
//! Errors from the delegated call are returned untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use atlas_rest::{ClientConfig, Jira, LegacyJira};
//! use serde_json::json;
//!
//! let jira = Jira::new(ClientConfig::new("https://jira.acme.com"))?;
//! let legacy = LegacyJira::new(jira);
//!
//! // Logs: 'jql' is deprecated; use 'search_issues' instead
//! let page = legacy.call("jql", &[json!("project = PROJ")])?;
//! # Ok::<(), atlas_rest::Error>(())
//! ```
//!
//! # Legacy Names
//!
//! | Legacy | Current | Kind |
//! |--------|---------|------|
//! | `jql` | `search_issues` | rename |
//! | `issue` | `get_issue` | rename |
//! | `issue_update` | `update_issue` | rename |
//! | `issue_delete` | `delete_issue` | rename |
//! | `issue_assign` | `assign_issue` | rename |
//! | `get_issue_transitions` | `get_transitions` | rename |
//! | `issue_transition` | `transition_issue` | rename |
//! | `issue_get_watchers` | `get_watchers` | rename |
//! | `issue_get_worklog` | `get_worklogs` | rename |
//! | `issue_get_comments` | `get_comments` | rename |
//! | `projects` | `get_projects` | rename |
//! | `project` | `get_project` | rename |
//! | `project_components` | `get_project_components` | rename |
//! | `project_versions` | `get_project_versions` | rename |
//! | `user` | `get_user` | rename |
//! | `user_find_by_user_string` | `search_users` | rename |
//! | `get_server_info` | `server_info` | rename |
//! | `get_all_fields` | `get_fields` | rename |
//! | `get_all_priorities` | `get_priorities` | rename |
//! | `get_all_statuses` | `get_statuses` | rename |
//! | `issue_add_comment` | `add_comment` | shim |
//! | `issue_create` | `create_issue` | shim |
//! | `jql_get_list_of_tickets` | `search_issues_iter` | shim |
//! | `get_all_projects` | `get_projects_iter` | shim |

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

use serde_json::{json, Value};
use tracing::warn;

use crate::api::jira::{arg, drain, str_arg, Jira};
use crate::error::{Error, Result};

/// Signature of a shim: the wrapped client and the caller's arguments.
pub type ShimFn = fn(&Jira, &[Value]) -> Result<Value>;

/// Where a legacy name leads.
#[derive(Clone, Copy)]
pub enum Target {
    /// Same arguments, same result, new name.
    Rename(&'static str),
    /// Reshaping function standing in for `replacement`.
    Shim {
        replacement: &'static str,
        call: ShimFn,
    },
}

impl Target {
    /// The current name reported in deprecation notices.
    pub fn replacement(&self) -> &'static str {
        match self {
            Self::Rename(name) => *name,
            Self::Shim { replacement, .. } => *replacement,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename(name) => f.debug_tuple("Rename").field(name).finish(),
            Self::Shim { replacement, .. } => f
                .debug_struct("Shim")
                .field("replacement", replacement)
                .finish_non_exhaustive(),
        }
    }
}

/// The legacy name table.
pub static LEGACY_METHODS: &[(&str, Target)] = &[
    ("jql", Target::Rename("search_issues")),
    ("issue", Target::Rename("get_issue")),
    ("issue_update", Target::Rename("update_issue")),
    ("issue_delete", Target::Rename("delete_issue")),
    ("issue_assign", Target::Rename("assign_issue")),
    ("get_issue_transitions", Target::Rename("get_transitions")),
    ("issue_transition", Target::Rename("transition_issue")),
    ("issue_get_watchers", Target::Rename("get_watchers")),
    ("issue_get_worklog", Target::Rename("get_worklogs")),
    ("issue_get_comments", Target::Rename("get_comments")),
    ("projects", Target::Rename("get_projects")),
    ("project", Target::Rename("get_project")),
    ("project_components", Target::Rename("get_project_components")),
    ("project_versions", Target::Rename("get_project_versions")),
    ("user", Target::Rename("get_user")),
    ("user_find_by_user_string", Target::Rename("search_users")),
    ("get_server_info", Target::Rename("server_info")),
    ("get_all_fields", Target::Rename("get_fields")),
    ("get_all_priorities", Target::Rename("get_priorities")),
    ("get_all_statuses", Target::Rename("get_statuses")),
    (
        "issue_add_comment",
        Target::Shim {
            replacement: "add_comment",
            call: issue_add_comment,
        },
    ),
    (
        "issue_create",
        Target::Shim {
            replacement: "create_issue",
            call: issue_create,
        },
    ),
    (
        "jql_get_list_of_tickets",
        Target::Shim {
            replacement: "search_issues_iter",
            call: jql_get_list_of_tickets,
        },
    ),
    (
        "get_all_projects",
        Target::Shim {
            replacement: "get_projects_iter",
            call: get_all_projects,
        },
    ),
];

/// Reported once for every call made through a legacy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub old: String,
    pub new: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is deprecated; use '{}' instead", self.old, self.new)
    }
}

/// Receives deprecation notices.
pub type Notifier = Box<dyn Fn(&DeprecationNotice) + Send + Sync>;

/// Logs the notice at `warn` under the `atlas_rest::deprecation` target.
pub fn log_notice(notice: &DeprecationNotice) {
    warn!(
        target: "atlas_rest::deprecation",
        old = %notice.old,
        new = %notice.new,
        "{notice}"
    );
}

/// [`Jira`] with legacy method names.
///
/// Current methods are reachable directly through `Deref`; legacy names go
/// through [`LegacyJira::call`] or the typed `#[deprecated]` wrappers.
pub struct LegacyJira {
    inner: Jira,
    table: HashMap<&'static str, Target>,
    notifier: Notifier,
}

impl LegacyJira {
    pub fn new(inner: Jira) -> Self {
        Self {
            inner,
            table: LEGACY_METHODS.iter().copied().collect(),
            notifier: Box::new(log_notice),
        }
    }

    /// Replaces the notice sink.
    ///
    /// ```rust,no_run
    /// use std::sync::{Arc, Mutex};
    /// use atlas_rest::{ClientConfig, Jira, LegacyJira};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let legacy = LegacyJira::new(Jira::new(ClientConfig::new("https://jira.acme.com"))?)
    ///     .with_notifier(move |notice| sink.lock().unwrap().push(notice.clone()));
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn with_notifier<F>(mut self, notifier: F) -> Self
    where
        F: Fn(&DeprecationNotice) + Send + Sync + 'static,
    {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn inner(&self) -> &Jira {
        &self.inner
    }

    pub fn into_inner(self) -> Jira {
        self.inner
    }

    /// Looks up a legacy name.
    pub fn lookup(&self, name: &str) -> Option<Target> {
        self.table.get(name).copied()
    }

    /// Calls a current or legacy method by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAttribute`] naming `LegacyJira` if `name` is
    /// neither a current method nor a legacy one. Errors from the called
    /// method are returned unchanged.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        if Jira::has_method(name) {
            return self.inner.invoke(name, args);
        }

        let Some(target) = self.lookup(name) else {
            return Err(Error::MissingAttribute {
                type_name: "LegacyJira".to_string(),
                name: name.to_string(),
            });
        };

        (self.notifier)(&DeprecationNotice {
            old: name.to_string(),
            new: target.replacement().to_string(),
        });

        match target {
            Target::Rename(current) => self.inner.invoke(current, args),
            Target::Shim { call, .. } => call(&self.inner, args),
        }
    }

    #[deprecated(note = "use `Jira::search_issues`")]
    pub fn jql(&self, jql: &str) -> Result<Value> {
        self.call("jql", &[json!(jql)])
    }

    #[deprecated(note = "use `Jira::get_issue`")]
    pub fn issue(&self, issue_key: &str) -> Result<Value> {
        self.call("issue", &[json!(issue_key)])
    }

    #[deprecated(note = "use `Jira::add_comment` with `Jira::comment_envelope`")]
    pub fn issue_add_comment(&self, issue_key: &str, text: &str) -> Result<Value> {
        self.call("issue_add_comment", &[json!(issue_key), json!(text)])
    }

    #[deprecated(note = "use `Jira::create_issue`")]
    pub fn issue_create(&self, fields: &Value) -> Result<Value> {
        self.call("issue_create", std::slice::from_ref(fields))
    }

    #[deprecated(note = "use `Jira::search_issues_iter`")]
    pub fn jql_get_list_of_tickets(&self, jql: &str) -> Result<Value> {
        self.call("jql_get_list_of_tickets", &[json!(jql)])
    }

    #[deprecated(note = "use `Jira::get_projects_iter`")]
    pub fn get_all_projects(&self) -> Result<Value> {
        self.call("get_all_projects", &[])
    }
}

impl Deref for LegacyJira {
    type Target = Jira;

    fn deref(&self) -> &Jira {
        &self.inner
    }
}

impl fmt::Debug for LegacyJira {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyJira")
            .field("inner", &self.inner)
            .field("legacy_names", &self.table.len())
            .finish_non_exhaustive()
    }
}

// Shims

/// Plain text in, version-specific comment envelope out.
fn issue_add_comment(jira: &Jira, args: &[Value]) -> Result<Value> {
    let method = "issue_add_comment";
    let issue_key = str_arg(method, args, 0)?;
    let text = str_arg(method, args, 1)?;
    let envelope = Jira::comment_envelope(jira.client().api_version(), text);
    jira.add_comment(issue_key, &envelope)
}

/// Accepts a bare field map as well as a full payload.
fn issue_create(jira: &Jira, args: &[Value]) -> Result<Value> {
    let fields = arg("issue_create", args, 0)?;
    if fields.get("fields").is_some() {
        return jira.create_issue(fields);
    }
    jira.create_issue(&json!({ "fields": fields }))
}

fn jql_get_list_of_tickets(jira: &Jira, args: &[Value]) -> Result<Value> {
    let jql = str_arg("jql_get_list_of_tickets", args, 0)?;
    drain(jira.search_issues_iter(jql)?)
}

fn get_all_projects(jira: &Jira, _args: &[Value]) -> Result<Value> {
    drain(jira.get_projects_iter()?)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::api::common::ErrorKind;
    use crate::api::endpoints::ApiVersion;
    use crate::api::jira::testing::jira;
    use crate::config::ClientConfig;
    use pretty_assertions::assert_eq;

    type Seen = Arc<Mutex<Vec<DeprecationNotice>>>;

    fn legacy(config: ClientConfig, transport: &Arc<ScriptedTransport>) -> (LegacyJira, Seen) {
        let seen: Seen = Arc::default();
        let sink = Arc::clone(&seen);
        let legacy = LegacyJira::new(jira(config, transport))
            .with_notifier(move |notice| sink.lock().unwrap().push(notice.clone()));
        (legacy, seen)
    }

    #[test]
    fn test_jql_matches_search_issues_with_one_notice() {
        let page = json!({"startAt": 0, "maxResults": 50, "total": 1, "issues": [{"key": "X-1"}]});
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, page.clone()),
            ScriptedTransport::json(200, page),
        ]);
        let (legacy, seen) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        let old = legacy.call("jql", &[json!("project = X")]).unwrap();
        let new = legacy.search_issues("project = X").unwrap();
        assert_eq!(old, new);

        let notices = seen.lock().unwrap();
        assert_eq!(
            *notices,
            vec![DeprecationNotice {
                old: "jql".to_string(),
                new: "search_issues".to_string()
            }]
        );

        let requests = transport.requests();
        assert_eq!(requests[0], requests[1]);
    }

    #[test]
    fn test_one_notice_per_call() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"key": "A-1"})),
            ScriptedTransport::json(200, json!({"key": "A-1"})),
            ScriptedTransport::json(200, json!({"key": "A-1"})),
        ]);
        let (legacy, seen) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        for _ in 0..3 {
            legacy.call("issue", &[json!("A-1")]).unwrap();
        }
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_current_names_emit_no_notice() {
        let transport = ScriptedTransport::new([ScriptedTransport::json(200, json!({}))]);
        let (legacy, seen) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        legacy.call("myself", &[]).unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_name_names_the_adapter() {
        let transport = ScriptedTransport::new([]);
        let (legacy, seen) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        let error = legacy.call("no_such_method", &[]).unwrap_err();
        match &error {
            Error::MissingAttribute { type_name, name } => {
                assert_eq!(type_name, "LegacyJira");
                assert_eq!(name, "no_such_method");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(seen.lock().unwrap().is_empty());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_delegated_errors_pass_through() {
        let transport = ScriptedTransport::new([ScriptedTransport::json(
            404,
            json!({"errorMessages": ["Issue does not exist"]}),
        )]);
        let (legacy, seen) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        let error = legacy.call("issue", &[json!("NOPE-1")]).unwrap_err();
        assert_eq!(error.api_kind(), Some(ErrorKind::NotFound));
        assert_eq!(
            error.to_string(),
            "Resource not found (HTTP 404 Not Found: Issue does not exist)"
        );
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_comment_shim_builds_version_envelope() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(201, json!({"id": "1"})),
            ScriptedTransport::json(201, json!({"id": "2"})),
        ]);
        let (v2, _) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);
        let (v3, _) = legacy(
            ClientConfig::new("https://acme.atlassian.net").with_api_version(ApiVersion::V3),
            &transport,
        );

        v2.call("issue_add_comment", &[json!("A-1"), json!("looks good")]).unwrap();
        v3.call("issue_add_comment", &[json!("A-1"), json!("looks good")]).unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].body, Some(json!({"body": "looks good"})));
        assert_eq!(
            requests[1].body.as_ref().unwrap()["body"]["content"][0]["content"][0]["text"],
            "looks good"
        );
        assert_eq!(requests[1].url, "https://acme.atlassian.net/rest/api/3/issue/A-1/comment");
    }

    #[test]
    fn test_create_shim_wraps_bare_fields() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(201, json!({"key": "A-2"})),
            ScriptedTransport::json(201, json!({"key": "A-3"})),
        ]);
        let (legacy, _) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        let fields = json!({"project": {"key": "A"}, "summary": "x"});
        legacy.call("issue_create", &[fields.clone()]).unwrap();
        legacy
            .call("issue_create", &[json!({"fields": fields.clone()})])
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].body, Some(json!({"fields": fields})));
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[test]
    fn test_list_shim_drains_all_pages() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 0, "total": 3, "issues": [1, 2]})),
            ScriptedTransport::json(200, json!({"startAt": 2, "total": 3, "issues": [3]})),
        ]);
        let (legacy, seen) = legacy(
            ClientConfig::new("https://jira.acme.com").with_page_size(2),
            &transport,
        );

        let tickets = legacy.call("jql_get_list_of_tickets", &[json!("project = X")]).unwrap();
        assert_eq!(tickets, json!([1, 2, 3]));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_list_shim_drains_all_pages_on_cloud() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 0, "maxResults": 2, "total": 5, "issues": [1, 2]})),
            ScriptedTransport::json(200, json!({"startAt": 2, "maxResults": 2, "total": 5, "issues": [3, 4]})),
            ScriptedTransport::json(200, json!({"startAt": 4, "maxResults": 2, "total": 5, "issues": [5]})),
        ]);
        let (legacy, _) = legacy(
            ClientConfig::new("https://acme.atlassian.net")
                .with_api_version(ApiVersion::V3)
                .with_page_size(2),
            &transport,
        );

        let tickets = legacy.call("jql_get_list_of_tickets", &[json!("project = X")]).unwrap();
        assert_eq!(tickets, json!([1, 2, 3, 4, 5]));
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    #[allow(deprecated)]
    fn test_typed_wrappers_route_through_table() {
        let transport = ScriptedTransport::new([ScriptedTransport::json(200, json!({"issues": []}))]);
        let (legacy, seen) = legacy(ClientConfig::new("https://jira.acme.com"), &transport);

        legacy.jql("project = X").unwrap();
        assert_eq!(seen.lock().unwrap()[0].new, "search_issues");
    }

    #[test]
    fn test_table_is_consistent() {
        for (legacy_name, target) in LEGACY_METHODS {
            assert!(
                !Jira::has_method(legacy_name),
                "{legacy_name} shadows a current method"
            );
            if let Target::Rename(current) = target {
                assert!(Jira::has_method(current), "{current} is not a current method");
            }
        }
    }

    #[test]
    fn test_default_notifier_logs() {
        let notice = DeprecationNotice {
            old: "jql".to_string(),
            new: "search_issues".to_string(),
        };
        assert_eq!(notice.to_string(), "'jql' is deprecated; use 'search_issues' instead");
        log_notice(&notice);
    }
}
