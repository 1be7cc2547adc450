//
//  atlas-rest
//  api/jira/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue operations.
//!
//! # Payload Shapes
//!
//! Request bodies are passed through as JSON. The exceptions are bodies
//! whose shape depends on the deployment or API version:
//!
//! | Operation | Cloud / API 3 | Server / API 2 |
//! |-----------|---------------|----------------|
//! | assignee | `{"accountId": ..}` | `{"name": ..}` |
//! | comment text | document format | plain string |

use serde_json::{json, Value};

use super::Jira;
use crate::api::common::{Listing, Paginator, Protocol};
use crate::api::endpoints::ApiVersion;
use crate::error::Result;

impl Jira {
    /// Fetches a single issue.
    ///
    /// # Parameters
    ///
    /// * `issue_key` - The issue key or numeric ID (e.g., "PROJ-123")
    ///
    /// # Returns
    ///
    /// Returns the issue JSON exactly as Jira sends it.
    ///
    /// # Errors
    ///
    /// Fails with an API error classified as `NotFound` when the issue does
    /// not exist or is not visible to the caller.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::{ClientConfig, Jira};
    ///
    /// let jira = Jira::new(ClientConfig::new("https://jira.acme.com"))?;
    /// let issue = jira.get_issue("PROJ-123")?;
    /// println!("{}", issue["fields"]["summary"]);
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn get_issue(&self, issue_key: &str) -> Result<Value> {
        let path = self.client.resolve("issue", &[("issue_key", issue_key)])?;
        self.client.get(&path, &[])
    }

    /// Creates an issue from a full payload.
    ///
    /// # Parameters
    ///
    /// * `payload` - The create body, `{"fields": {...}}` plus any
    ///   `update` section the caller wants
    ///
    /// # Returns
    ///
    /// Returns Jira's reply, which carries the new `id`, `key` and `self`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::{ClientConfig, Jira};
    /// use serde_json::json;
    ///
    /// let jira = Jira::new(ClientConfig::new("https://jira.acme.com"))?;
    /// let created = jira.create_issue(&json!({
    ///     "fields": {
    ///         "project": {"key": "PROJ"},
    ///         "summary": "Login button not responding",
    ///         "issuetype": {"name": "Bug"}
    ///     }
    /// }))?;
    /// println!("created {}", created["key"]);
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn create_issue(&self, payload: &Value) -> Result<Value> {
        let path = self.client.resolve("issue_create", &[])?;
        self.client.post(&path, payload)
    }

    /// Edits an issue. Jira answers `204`, so this usually returns `null`.
    pub fn update_issue(&self, issue_key: &str, payload: &Value) -> Result<Value> {
        let path = self.client.resolve("issue", &[("issue_key", issue_key)])?;
        self.client.put(&path, payload)
    }

    pub fn delete_issue(&self, issue_key: &str) -> Result<Value> {
        let path = self.client.resolve("issue", &[("issue_key", issue_key)])?;
        self.client.delete(&path)
    }

    /// Assigns an issue.
    ///
    /// # Parameters
    ///
    /// * `issue_key` - The issue to assign
    /// * `assignee` - An account ID on Cloud, a username on Server
    ///
    /// # Returns
    ///
    /// Returns `null` on success; Jira answers `204`.
    pub fn assign_issue(&self, issue_key: &str, assignee: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("issue_assignee", &[("issue_key", issue_key)])?;
        let body = if self.client.is_cloud() {
            json!({ "accountId": assignee })
        } else {
            json!({ "name": assignee })
        };
        self.client.put(&path, &body)
    }

    /// Runs a JQL search and returns the first page as-is.
    pub fn search_issues(&self, jql: &str) -> Result<Value> {
        let path = self.client.resolve("search", &[])?;
        self.client.get(&path, &[("jql", jql)])
    }

    /// Runs a JQL search and yields every matching issue.
    ///
    /// Search pages by `startAt`/`maxResults`/`total` on Cloud as well as on
    /// Server, so the listing always uses the offset protocol.
    ///
    /// # Parameters
    ///
    /// * `jql` - The JQL query (e.g., "project = PROJ AND status = Open")
    ///
    /// # Returns
    ///
    /// Returns a lazy [`Paginator`]; nothing is fetched until it is iterated.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::{ClientConfig, Jira};
    ///
    /// let jira = Jira::new(ClientConfig::new("https://acme.atlassian.net"))?;
    /// for issue in jira.search_issues_iter("assignee = currentUser()")? {
    ///     println!("{}", issue?["key"]);
    /// }
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn search_issues_iter(&self, jql: &str) -> Result<Paginator<'_>> {
        let path = self.client.resolve("search", &[])?;
        let listing = Listing::new(path)
            .query("jql", jql)
            .item_key("issues")
            .protocol(Protocol::Server);
        Ok(self.client.paginate(listing))
    }

    /// Adds a comment. `body` is the comment envelope, e.g. `{"body": ".."}`.
    ///
    /// See [`Jira::comment_envelope`] to build one from plain text.
    pub fn add_comment(&self, issue_key: &str, body: &Value) -> Result<Value> {
        let path = self
            .client
            .resolve("issue_comments", &[("issue_key", issue_key)])?;
        self.client.post(&path, body)
    }

    /// Wraps plain text in the comment envelope the API version expects.
    ///
    /// ```rust
    /// use atlas_rest::api::endpoints::ApiVersion;
    /// use atlas_rest::Jira;
    /// use serde_json::json;
    ///
    /// assert_eq!(Jira::comment_envelope(ApiVersion::V2, "hi"), json!({"body": "hi"}));
    /// assert_eq!(Jira::comment_envelope(ApiVersion::V3, "hi")["body"]["type"], "doc");
    /// ```
    pub fn comment_envelope(version: ApiVersion, text: &str) -> Value {
        match version {
            ApiVersion::V2 => json!({ "body": text }),
            ApiVersion::V3 => json!({
                "body": {
                    "type": "doc",
                    "version": 1,
                    "content": [{
                        "type": "paragraph",
                        "content": [{ "type": "text", "text": text }]
                    }]
                }
            }),
        }
    }

    /// Yields every comment on an issue, oldest first.
    ///
    /// # Parameters
    ///
    /// * `issue_key` - The issue whose comments to list
    ///
    /// # Returns
    ///
    /// Returns a lazy [`Paginator`] over the `comments` array of each page.
    /// Offset-paginated on every deployment.
    pub fn get_comments_iter(&self, issue_key: &str) -> Result<Paginator<'_>> {
        let path = self
            .client
            .resolve("issue_comments", &[("issue_key", issue_key)])?;
        let listing = Listing::new(path)
            .item_key("comments")
            .protocol(Protocol::Server);
        Ok(self.client.paginate(listing))
    }

    pub fn get_transitions(&self, issue_key: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("issue_transitions", &[("issue_key", issue_key)])?;
        self.client.get(&path, &[])
    }

    /// Moves an issue through a workflow transition.
    ///
    /// # Parameters
    ///
    /// * `issue_key` - The issue to transition
    /// * `transition_id` - An ID from [`Jira::get_transitions`]
    pub fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("issue_transitions", &[("issue_key", issue_key)])?;
        let body = json!({ "transition": { "id": transition_id } });
        self.client.post(&path, &body)
    }

    pub fn get_watchers(&self, issue_key: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("issue_watchers", &[("issue_key", issue_key)])?;
        self.client.get(&path, &[])
    }

    /// Yields every worklog on an issue.
    ///
    /// # Parameters
    ///
    /// * `issue_key` - The issue whose worklogs to list
    ///
    /// # Returns
    ///
    /// Returns a lazy [`Paginator`] over the `worklogs` array of each page.
    /// Offset-paginated on every deployment.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::{ClientConfig, Jira};
    ///
    /// let jira = Jira::new(ClientConfig::new("https://jira.acme.com"))?;
    /// let seconds: u64 = jira
    ///     .get_worklogs_iter("PROJ-123")?
    ///     .filter_map(|worklog| worklog.ok())
    ///     .filter_map(|worklog| worklog["timeSpentSeconds"].as_u64())
    ///     .sum();
    /// println!("{seconds}s logged");
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn get_worklogs_iter(&self, issue_key: &str) -> Result<Paginator<'_>> {
        let path = self
            .client
            .resolve("issue_worklogs", &[("issue_key", issue_key)])?;
        let listing = Listing::new(path)
            .item_key("worklogs")
            .protocol(Protocol::Server);
        Ok(self.client.paginate(listing))
    }
}
