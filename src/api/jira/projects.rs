//
//  atlas-rest
//  api/jira/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects, users and instance metadata.
//!
//! The project listing differs between versions: API 2 returns a bare
//! array in one response, API 3 returns a paginated `values` envelope.
//! [`Jira::get_projects_iter`] hides both behind the paginator.

use serde_json::Value;

use super::Jira;
use crate::api::common::{Listing, Paginator};
use crate::error::Result;

impl Jira {
    /// Yields every project visible to the caller.
    ///
    /// The protocol follows the deployment: Cloud's `project/search` links
    /// pages with `nextPage`, while API 2 answers with one bare array.
    ///
    /// # Returns
    ///
    /// Returns a lazy [`Paginator`] over the projects.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atlas_rest::{ClientConfig, Jira};
    ///
    /// let jira = Jira::new(ClientConfig::new("https://acme.atlassian.net"))?;
    /// for project in jira.get_projects_iter()? {
    ///     let project = project?;
    ///     println!("{} {}", project["key"], project["name"]);
    /// }
    /// # Ok::<(), atlas_rest::Error>(())
    /// ```
    pub fn get_projects_iter(&self) -> Result<Paginator<'_>> {
        let path = self.client.resolve("projects", &[])?;
        Ok(self.client.paginate(Listing::new(path).item_key("values")))
    }

    /// Fetches one project by key or numeric ID.
    pub fn get_project(&self, project_key: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("project", &[("project_key", project_key)])?;
        self.client.get(&path, &[])
    }

    pub fn get_project_components(&self, project_key: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("project_components", &[("project_key", project_key)])?;
        self.client.get(&path, &[])
    }

    pub fn get_project_versions(&self, project_key: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("project_versions", &[("project_key", project_key)])?;
        self.client.get(&path, &[])
    }

    /// Looks up a user.
    ///
    /// # Parameters
    ///
    /// * `user` - An account ID on Cloud, a username on Server
    ///
    /// # Returns
    ///
    /// Returns the user JSON as Jira sends it.
    pub fn get_user(&self, user: &str) -> Result<Value> {
        let path = self.client.resolve("user", &[])?;
        let param = if self.client.is_cloud() {
            "accountId"
        } else {
            "username"
        };
        self.client.get(&path, &[(param, user)])
    }

    /// Finds users matching a query.
    ///
    /// Cloud matches `query` against display names and emails; Server
    /// matches it against usernames.
    pub fn search_users(&self, query: &str) -> Result<Value> {
        let path = self.client.resolve("user_search", &[])?;
        let param = if self.client.is_cloud() {
            "query"
        } else {
            "username"
        };
        self.client.get(&path, &[(param, query)])
    }

    /// The user the session is authenticated as.
    pub fn myself(&self) -> Result<Value> {
        self.get_static("myself")
    }

    /// Version and deployment details of the instance. Needs no permissions.
    pub fn server_info(&self) -> Result<Value> {
        self.get_static("server_info")
    }

    pub fn get_fields(&self) -> Result<Value> {
        self.get_static("fields")
    }

    pub fn get_issue_types(&self) -> Result<Value> {
        self.get_static("issue_types")
    }

    pub fn get_priorities(&self) -> Result<Value> {
        self.get_static("priorities")
    }

    pub fn get_statuses(&self) -> Result<Value> {
        self.get_static("statuses")
    }

    pub fn get_filter(&self, filter_id: &str) -> Result<Value> {
        let path = self
            .client
            .resolve("filter", &[("filter_id", filter_id)])?;
        self.client.get(&path, &[])
    }

    fn get_static(&self, key: &str) -> Result<Value> {
        let path = self.client.resolve(key, &[])?;
        self.client.get(&path, &[])
    }
}
