//
//  atlas-rest
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Deployment Resolver
//!
//! Classifies a base URL as a vendor-hosted Cloud instance or a self-managed
//! Server/Data Center instance. The classification picks the pagination
//! protocol and the request shaping used by the REST core.
//!
//! ## Rules
//!
//! 1. An explicit override always wins.
//! 2. The URL must parse, use `http` or `https`, and carry a host.
//! 3. The host (case-insensitive) must be one of [`CLOUD_DOMAINS`] or a
//!    subdomain of one.
//! 4. Anything else, including a parse failure or a blown deadline, is
//!    [`Deployment::Server`].
//!
//! Only the hostname is consulted, so a self-managed instance fronted by a
//! cloud-looking proxy is misclassified. Pass an override for those.
//!
//! ## Usage
//!
//! ```rust
//! use atlas_rest::config::{classify, Deployment};
//!
//! assert_eq!(classify("https://acme.atlassian.net", None), Deployment::Cloud);
//! assert_eq!(classify("https://jira.acme.com", None), Deployment::Server);
//! assert_eq!(
//!     classify("https://jira.acme.com", Some(Deployment::Cloud)),
//!     Deployment::Cloud
//! );
//! ```

use std::fmt;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Hostnames (and their subdomains) served by the vendor's cloud.
pub const CLOUD_DOMAINS: &[&str] = &[
    "atlassian.net",
    "jira.com",
    "jira-dev.com",
    "jira.atlassian.com",
    "bitbucket.org",
    "api.bitbucket.org",
];

/// Upper bound on how long hostname classification may take.
pub const CLASSIFY_DEADLINE: Duration = Duration::from_secs(1);

/// Where an instance is hosted.
///
/// | Deployment | Pagination | Rich text |
/// |------------|------------|-----------|
/// | `Cloud` | next-page URL + `isLast` | document format on API 3 |
/// | `Server` | `startAt` / `maxResults` / `total` | wiki markup |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    Cloud,
    #[default]
    Server,
}

impl Deployment {
    pub fn is_cloud(self) -> bool {
        matches!(self, Self::Cloud)
    }

    /// Maps the boolean `cloud` flag used in configuration files.
    pub fn from_cloud_flag(cloud: bool) -> Self {
        if cloud {
            Self::Cloud
        } else {
            Self::Server
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloud => write!(f, "cloud"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Classifies `url`, honouring `override_deployment` when given.
///
/// Runs under [`CLASSIFY_DEADLINE`]. Never fails: every problem classifies
/// as [`Deployment::Server`].
pub fn classify(url: &str, override_deployment: Option<Deployment>) -> Deployment {
    classify_within(url, override_deployment, CLASSIFY_DEADLINE)
}

/// [`classify`] with a caller-chosen deadline.
pub fn classify_within(
    url: &str,
    override_deployment: Option<Deployment>,
    deadline: Duration,
) -> Deployment {
    if let Some(deployment) = override_deployment {
        return deployment;
    }

    let owned = url.to_string();
    match run_with_deadline(deadline, move || is_cloud_url(&owned)) {
        Some(true) => Deployment::Cloud,
        Some(false) => Deployment::Server,
        None => {
            debug!(url, ?deadline, "deployment classification timed out, assuming server");
            Deployment::Server
        }
    }
}

/// Checks if a hostname belongs to the vendor's cloud.
///
/// # Examples
///
/// ```rust
/// use atlas_rest::config::is_cloud_host;
///
/// assert!(is_cloud_host("acme.atlassian.net"));
/// assert!(is_cloud_host("ACME.Atlassian.NET"));
/// assert!(is_cloud_host("bitbucket.org"));
/// assert!(!is_cloud_host("atlassian.net.example.com"));
/// assert!(!is_cloud_host("jira.company.com"));
/// ```
pub fn is_cloud_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_lowercase();
    CLOUD_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

fn is_cloud_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    parsed.host_str().is_some_and(is_cloud_host)
}

/// Runs `task` on a helper thread and waits at most `deadline` for it.
///
/// Returns `None` on timeout, on a panic inside `task`, or when the thread
/// cannot be spawned. A timed-out task is left to finish on its own.
pub(crate) fn run_with_deadline<T, F>(deadline: Duration, task: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("atlas-rest-deadline".to_string())
        .spawn(move || {
            // The receiver may have given up already.
            let _ = sender.send(task());
        });

    if spawned.is_err() {
        return None;
    }
    receiver.recv_timeout(deadline).ok()
}

/// Normalizes a base URL for storage and comparison.
///
/// Trims whitespace and trailing slashes. A bare hostname gets `https://`.
///
/// # Examples
///
/// ```rust
/// use atlas_rest::config::normalize_base_url;
///
/// assert_eq!(normalize_base_url(" https://jira.acme.com/ "), "https://jira.acme.com");
/// assert_eq!(normalize_base_url("acme.atlassian.net"), "https://acme.atlassian.net");
/// ```
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
