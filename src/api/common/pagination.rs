//
//  atlas-rest
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination for listing endpoints
//!
//! Cloud and Server/Data Center paginate differently on the wire. This
//! module hides the difference behind [`Paginator`], a lazy iterator that
//! yields one item at a time regardless of the protocol underneath.
//!
//! # Protocols
//!
//! | Protocol | Page metadata | Advance | Stop |
//! |----------|---------------|---------|------|
//! | Cloud | `isLast`, `nextPage` | follow `nextPage` verbatim | `isLast`, empty page, no next URL |
//! | Server | `startAt`, `maxResults`, `total` | offset += items returned | `offset >= total`, empty page |
//!
//! The protocol follows the deployment unless the listing pins one with
//! [`Listing::protocol`]. Jira Cloud's search, comment and worklog
//! endpoints still speak the offset protocol, so those listings pin
//! [`Protocol::Server`].
//!
//! # Item Containers
//!
//! Items are looked up under the listing's own key first, then under
//! [`CONTAINER_KEYS`]. A bare JSON array is the item list itself; any
//! other object is treated as one synthetic item.
//!
//! # Example
//!
//! ```rust,no_run
//! use atlas_rest::api::common::Listing;
//! use atlas_rest::api::RestClient;
//! use atlas_rest::config::ClientConfig;
//!
//! let client = RestClient::new(ClientConfig::new("https://jira.acme.com"))?;
//! let listing = Listing::new("/rest/api/2/search")
//!     .query("jql", "project = PROJ")
//!     .item_key("issues");
//!
//! for issue in client.paginate(listing) {
//!     let issue = issue?;
//!     println!("{}", issue["key"]);
//! }
//! # Ok::<(), atlas_rest::Error>(())
//! ```
//!
//! # Notes
//!
//! - Nothing is fetched until the first call to `next()`
//! - Pages are fetched one at a time; dropping the iterator stops fetching
//! - A failed fetch is yielded once as `Err`, then the iterator ends
//! - A page whose body is not JSON ends the iterator without an error

use std::collections::VecDeque;
use std::iter::FusedIterator;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::api::client::RestClient;
use crate::api::transport::{Method, Request};
use crate::config::Deployment;
use crate::error::Result;

/// Generic container keys tried after the listing's own key.
pub const CONTAINER_KEYS: &[&str] = &["values", "issues", "results"];

/// Query parameter carrying the Server offset.
pub const OFFSET_PARAM: &str = "startAt";

/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "maxResults";

/// Which wire protocol a traversal speaks.
///
/// Usually implied by the deployment. A [`Listing`] whose endpoint answers
/// with `startAt`/`maxResults`/`total` everywhere declares it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Cloud,
    Server,
}

impl From<Deployment> for Protocol {
    fn from(deployment: Deployment) -> Self {
        match deployment {
            Deployment::Cloud => Self::Cloud,
            Deployment::Server => Self::Server,
        }
    }
}

/// A listing endpoint to traverse.
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::common::{Listing, Protocol};
///
/// let listing = Listing::new("/rest/api/2/issue/PROJ-1/worklog")
///     .item_key("worklogs")
///     .protocol(Protocol::Server);
/// assert_eq!(listing.item_key.as_deref(), Some("worklogs"));
/// assert_eq!(listing.protocol, Some(Protocol::Server));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Path relative to the base URL, or an absolute URL.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Operation-specific container key, tried before [`CONTAINER_KEYS`].
    pub item_key: Option<String>,
    /// Protocol the endpoint always speaks. `None` follows the deployment.
    pub protocol: Option<Protocol>,
}

impl Listing {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn item_key(mut self, key: impl Into<String>) -> Self {
        self.item_key = Some(key.into());
        self
    }

    /// Pins the wire protocol whatever the deployment.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }
}

/// Continuation state of a traversal.
///
/// The cursor on its own decides what the next request is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Absolute URL of the next page, or `None` once the last page is seen.
    Cloud {
        next_url: Option<String>,
        is_last: bool,
    },
    /// Offset of the next page, requested page size, and the last total seen.
    Server {
        offset: u64,
        page_size: u32,
        total: Option<u64>,
    },
}

/// Page metadata of the Cloud protocol.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudPageInfo {
    #[serde(default)]
    pub is_last: Option<bool>,
    #[serde(default)]
    pub next_page: Option<String>,
    /// Bitbucket Cloud style `next`.
    #[serde(default)]
    pub next: Option<String>,
    /// Confluence Cloud style `_links.next`.
    #[serde(default, rename = "_links")]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

impl CloudPageInfo {
    pub fn next_url(&self) -> Option<&str> {
        self.next_page
            .as_deref()
            .or(self.next.as_deref())
            .or_else(|| self.links.as_ref().and_then(|links| links.next.as_deref()))
    }
}

/// Page metadata of the Server protocol.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPageInfo {
    #[serde(default)]
    pub start_at: Option<u64>,
    #[serde(default)]
    pub max_results: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    /// Bitbucket Server style last-page flag.
    #[serde(default)]
    pub is_last_page: Option<bool>,
}

/// The items carried by one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageItems {
    List(Vec<Value>),
    /// A non-list body, surfaced as one item.
    Single(Value),
}

impl PageItems {
    pub fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const METADATA_KEYS: &[&str] = &[
    "isLast",
    "nextPage",
    "startAt",
    "maxResults",
    "total",
    "isLastPage",
];

/// Pulls the items out of a page body.
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::common::{extract_items, PageItems};
/// use serde_json::json;
///
/// let page = json!({"worklogs": [{"id": "1"}], "total": 1});
/// assert_eq!(extract_items(page, Some("worklogs")).len(), 1);
///
/// let bare = json!([1, 2, 3]);
/// assert_eq!(extract_items(bare, None).len(), 3);
///
/// let single = json!({"id": "10000"});
/// assert!(matches!(extract_items(single, None), PageItems::Single(_)));
/// ```
pub fn extract_items(body: Value, item_key: Option<&str>) -> PageItems {
    match body {
        Value::Array(items) => PageItems::List(items),
        Value::Null => PageItems::List(Vec::new()),
        Value::Object(mut map) => {
            let keys = item_key.into_iter().chain(CONTAINER_KEYS.iter().copied());
            for key in keys {
                if matches!(map.get(key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return PageItems::List(items);
                    }
                }
            }
            // Pure pagination envelope with nothing in it.
            if METADATA_KEYS.iter().any(|key| map.contains_key(*key)) {
                return PageItems::List(Vec::new());
            }
            PageItems::Single(Value::Object(map))
        }
        other => PageItems::Single(other),
    }
}

/// A lazy, forward-only, single-pass sequence over a listing.
///
/// Created by [`RestClient::paginate`]. Each call to `next()` either hands
/// out a buffered item or fetches exactly one more page.
pub struct Paginator<'a> {
    client: &'a RestClient,
    listing: Listing,
    protocol: Protocol,
    cursor: PageCursor,
    buffer: VecDeque<Value>,
    fetches: usize,
    done: bool,
}

impl<'a> Paginator<'a> {
    /// Creates a paginator speaking the listing's pinned protocol, or the
    /// client's deployment protocol when none is pinned.
    pub fn new(client: &'a RestClient, listing: Listing) -> Self {
        let protocol = listing
            .protocol
            .unwrap_or_else(|| Protocol::from(client.deployment()));
        Self::with_protocol(client, listing, protocol)
    }

    /// Creates a paginator speaking `protocol`, whatever the deployment.
    pub fn with_protocol(client: &'a RestClient, listing: Listing, protocol: Protocol) -> Self {
        let page_size = client.config().page_size;
        let cursor = match protocol {
            Protocol::Cloud => PageCursor::Cloud {
                next_url: Some(initial_cloud_url(client, &listing, page_size)),
                is_last: false,
            },
            Protocol::Server => PageCursor::Server {
                offset: 0,
                page_size,
                total: None,
            },
        };

        Self {
            client,
            listing,
            protocol,
            cursor,
            buffer: VecDeque::new(),
            fetches: 0,
            done: false,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Number of pages requested so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// The request the cursor calls for, or `None` when nothing is left.
    fn next_request(&self) -> Option<Request> {
        match &self.cursor {
            PageCursor::Cloud { is_last: true, .. } | PageCursor::Cloud { next_url: None, .. } => {
                None
            }
            PageCursor::Cloud {
                next_url: Some(url),
                ..
            } => Some(self.client.build_request(Method::Get, url, &[], None)),
            PageCursor::Server {
                offset,
                page_size,
                total,
            } => {
                if total.is_some_and(|total| *offset >= total) {
                    return None;
                }
                let offset = offset.to_string();
                let page_size = page_size.to_string();
                let mut query: Vec<(&str, &str)> = self
                    .listing
                    .query
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                query.push((OFFSET_PARAM, offset.as_str()));
                query.push((LIMIT_PARAM, page_size.as_str()));
                Some(
                    self.client
                        .build_request(Method::Get, &self.listing.path, &query, None),
                )
            }
        }
    }

    /// Fetches one page into the buffer and advances the cursor.
    fn fetch_page(&mut self) -> Result<()> {
        let Some(request) = self.next_request() else {
            self.done = true;
            return Ok(());
        };

        self.fetches += 1;
        let response = self.client.execute(&request)?;

        let body: Value = match serde_json::from_str(&response.body) {
            Ok(body) => body,
            Err(error) => {
                warn!(url = %request.url, %error, "page body is not JSON, ending pagination");
                self.done = true;
                return Ok(());
            }
        };

        match self.protocol {
            Protocol::Cloud => self.advance_cloud(body),
            Protocol::Server => self.advance_server(body),
        }
        Ok(())
    }

    fn advance_cloud(&mut self, body: Value) {
        let info = page_info::<CloudPageInfo>(&body);
        let next_url = info.next_url().map(|url| self.client.url_for(url));
        let is_last = info.is_last.unwrap_or(false);

        match extract_items(body, self.listing.item_key.as_deref()) {
            PageItems::List(items) if items.is_empty() => self.finish(),
            PageItems::List(items) => {
                self.buffer.extend(items);
                if is_last || next_url.is_none() {
                    self.finish();
                } else {
                    self.cursor = PageCursor::Cloud {
                        next_url,
                        is_last: false,
                    };
                }
            }
            PageItems::Single(item) => {
                self.buffer.push_back(item);
                self.finish();
            }
        }
    }

    fn advance_server(&mut self, body: Value) {
        let info = page_info::<ServerPageInfo>(&body);

        let PageCursor::Server {
            offset, page_size, ..
        } = self.cursor
        else {
            self.finish();
            return;
        };

        match extract_items(body, self.listing.item_key.as_deref()) {
            PageItems::List(items) if items.is_empty() => self.finish(),
            PageItems::List(items) => {
                if let Some(start_at) = info.start_at.filter(|start| *start != offset) {
                    warn!(
                        path = %self.listing.path,
                        requested = offset,
                        start_at,
                        "page starts at a different offset than requested"
                    );
                }
                if let Some(max_results) = info.max_results.filter(|max| *max < u64::from(page_size)) {
                    debug!(
                        path = %self.listing.path,
                        requested = page_size,
                        max_results,
                        "server capped the page size"
                    );
                }

                let returned = items.len() as u64;
                self.buffer.extend(items);

                let offset = offset + returned;
                self.cursor = PageCursor::Server {
                    offset,
                    page_size,
                    total: info.total,
                };

                let exhausted = match (info.total, info.is_last_page) {
                    (_, Some(true)) => true,
                    (Some(total), _) => offset >= total,
                    (None, Some(false)) => false,
                    // No total at all: a plain, unpaginated list.
                    (None, None) => true,
                };
                if exhausted {
                    self.finish();
                }
            }
            PageItems::Single(item) => {
                self.buffer.push_back(item);
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.done = true;
        match &mut self.cursor {
            PageCursor::Cloud { next_url, is_last } => {
                *next_url = None;
                *is_last = true;
            }
            PageCursor::Server { .. } => {}
        }
        debug!(fetches = self.fetches, path = %self.listing.path, "pagination finished");
    }
}

impl Iterator for Paginator<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            if let Err(error) = self.fetch_page() {
                self.done = true;
                return Some(Err(error));
            }
        }
    }
}

impl FusedIterator for Paginator<'_> {}

fn page_info<T: Default + for<'de> Deserialize<'de>>(body: &Value) -> T {
    if body.is_object() {
        T::deserialize(body).unwrap_or_default()
    } else {
        T::default()
    }
}

fn initial_cloud_url(client: &RestClient, listing: &Listing, page_size: u32) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in &listing.query {
        serializer.append_pair(name, value);
    }
    if !listing.query.iter().any(|(name, _)| name == LIMIT_PARAM) {
        serializer.append_pair(LIMIT_PARAM, &page_size.to_string());
    }
    let query = serializer.finish();

    let url = client.url_for(&listing.path);
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::{client, ScriptedTransport};
    use crate::api::common::ErrorKind;
    use crate::api::transport::Response;
    use crate::config::ClientConfig;
    use serde_json::json;

    fn cloud_config() -> ClientConfig {
        ClientConfig::new("https://acme.atlassian.net").with_page_size(2)
    }

    fn server_config() -> ClientConfig {
        ClientConfig::new("https://jira.acme.com").with_page_size(2)
    }

    #[test]
    fn test_nothing_is_fetched_before_first_item() {
        let transport = ScriptedTransport::new([]);
        let client = client(server_config(), &transport);

        let paginator = client.paginate(Listing::new("/rest/api/2/search"));
        assert_eq!(paginator.fetches(), 0);
        drop(paginator);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_cloud_follows_next_page_verbatim() {
        let next = "https://acme.atlassian.net/rest/api/3/project/search?startAt=2&maxResults=2";
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(
                200,
                json!({"isLast": false, "nextPage": next, "values": [{"id": 1}, {"id": 2}]}),
            ),
            ScriptedTransport::json(200, json!({"isLast": true, "values": [{"id": 3}]})),
        ]);
        let client = client(cloud_config(), &transport);

        let listing = Listing::new("/rest/api/3/project/search").query("orderBy", "key");
        let mut paginator = client.paginate(listing);
        let ids: Vec<i64> = paginator
            .by_ref()
            .map(|item| item.unwrap()["id"].as_i64().unwrap())
            .collect();

        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(paginator.fetches(), 2);

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "https://acme.atlassian.net/rest/api/3/project/search?orderBy=key&maxResults=2"
        );
        assert_eq!(requests[1].url, next);
        assert!(requests[1].query.is_empty(), "local query must be dropped");
    }

    #[test]
    fn test_cloud_stops_on_empty_page() {
        let transport = ScriptedTransport::new([ScriptedTransport::json(
            200,
            json!({"isLast": false, "nextPage": "https://acme.atlassian.net/next", "values": []}),
        )]);
        let client = client(cloud_config(), &transport);

        let items: Vec<_> = client.paginate(Listing::new("/x")).collect();
        assert!(items.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_cloud_relative_next_link_is_resolved_against_base() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(
                200,
                json!({"results": [{"id": "a"}], "_links": {"next": "/wiki/rest/api/content?cursor=xyz"}}),
            ),
            ScriptedTransport::json(200, json!({"results": [{"id": "b"}], "_links": {}})),
        ]);
        let client = client(cloud_config(), &transport);

        let items: Vec<Value> = client
            .paginate(Listing::new("/wiki/rest/api/content"))
            .map(|item| item.unwrap())
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(
            transport.requests()[1].url,
            "https://acme.atlassian.net/wiki/rest/api/content?cursor=xyz"
        );
    }

    #[test]
    fn test_server_advances_offset_by_items_returned() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 0, "maxResults": 2, "total": 5, "issues": [1, 2]})),
            ScriptedTransport::json(200, json!({"startAt": 2, "maxResults": 2, "total": 5, "issues": [3, 4]})),
            ScriptedTransport::json(200, json!({"startAt": 4, "maxResults": 2, "total": 5, "issues": [5]})),
        ]);
        let client = client(server_config(), &transport);

        let listing = Listing::new("/rest/api/2/search")
            .query("jql", "project = X")
            .item_key("issues");
        let items: Vec<Value> = client.paginate(listing).map(|item| item.unwrap()).collect();

        assert_eq!(items, [json!(1), json!(2), json!(3), json!(4), json!(5)]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        let offsets: Vec<&str> = requests
            .iter()
            .map(|request| request.query_param(OFFSET_PARAM).unwrap())
            .collect();
        assert_eq!(offsets, ["0", "2", "4"]);
        assert!(requests
            .iter()
            .all(|request| request.query_param("jql") == Some("project = X")));
    }

    #[test]
    fn test_server_stops_on_empty_page_despite_unmet_total() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 0, "total": 10, "values": [1, 2]})),
            ScriptedTransport::json(200, json!({"startAt": 2, "total": 10, "values": []})),
        ]);
        let client = client(server_config(), &transport);

        let items: Vec<_> = client.paginate(Listing::new("/x")).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_server_bare_array_is_one_page() {
        let transport =
            ScriptedTransport::new([ScriptedTransport::json(200, json!([{"key": "A"}, {"key": "B"}]))]);
        let client = client(server_config(), &transport);

        let items: Vec<_> = client.paginate(Listing::new("/rest/api/2/project")).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_server_is_last_page_flag_without_total() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"isLastPage": false, "values": [1, 2]})),
            ScriptedTransport::json(200, json!({"isLastPage": true, "values": [3]})),
        ]);
        let client = client(server_config(), &transport);

        assert_eq!(client.paginate(Listing::new("/x")).count(), 3);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_non_list_body_is_one_synthetic_item() {
        let transport =
            ScriptedTransport::new([ScriptedTransport::json(200, json!({"id": "10000", "name": "x"}))]);
        let client = client(cloud_config(), &transport);

        let items: Vec<Value> = client
            .paginate(Listing::new("/x"))
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(items, [json!({"id": "10000", "name": "x"})]);
    }

    #[test]
    fn test_operation_specific_key_wins() {
        let page = json!({"values": [1], "worklogs": [1, 2, 3]});
        assert_eq!(extract_items(page, Some("worklogs")).len(), 3);
    }

    #[test]
    fn test_empty_envelope_is_zero_items() {
        let page = json!({"isLast": true});
        assert!(extract_items(page, None).is_empty());
    }

    #[test]
    fn test_malformed_page_ends_quietly() {
        let transport = ScriptedTransport::new([Response::new(200, "<html>maintenance</html>")]);
        let client = client(server_config(), &transport);

        let mut paginator = client.paginate(Listing::new("/x"));
        assert!(paginator.next().is_none());
        assert!(paginator.next().is_none());
        assert_eq!(paginator.fetches(), 1);
    }

    #[test]
    fn test_http_error_is_yielded_once_then_fused() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 0, "total": 4, "values": [1, 2]})),
            ScriptedTransport::json(401, json!({"errorMessages": ["Login required"]})),
        ]);
        let client = client(server_config(), &transport);

        let mut paginator = client.paginate(Listing::new("/x"));
        assert!(paginator.next().unwrap().is_ok());
        assert!(paginator.next().unwrap().is_ok());

        let error = paginator.next().unwrap().unwrap_err();
        assert_eq!(error.api_kind(), Some(ErrorKind::AuthRequired));

        assert!(paginator.next().is_none());
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_each_call_is_a_fresh_sequence() {
        let page = json!({"startAt": 0, "total": 1, "values": ["only"]});
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, page.clone()),
            ScriptedTransport::json(200, page),
        ]);
        let client = client(server_config(), &transport);

        assert_eq!(client.paginate(Listing::new("/x")).count(), 1);
        assert_eq!(client.paginate(Listing::new("/x")).count(), 1);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_pinned_protocol_overrides_cloud_deployment() {
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 0, "maxResults": 2, "total": 3, "comments": [1, 2]})),
            ScriptedTransport::json(200, json!({"startAt": 2, "maxResults": 2, "total": 3, "comments": [3]})),
        ]);
        let client = client(cloud_config(), &transport);

        let listing = Listing::new("/rest/api/3/issue/A-1/comment")
            .item_key("comments")
            .protocol(Protocol::Server);
        let paginator = client.paginate(listing);
        assert_eq!(paginator.protocol(), Protocol::Server);

        let items: Vec<Value> = paginator.map(|item| item.unwrap()).collect();
        assert_eq!(items, [json!(1), json!(2), json!(3)]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].query_param(OFFSET_PARAM), Some("2"));
    }

    #[test]
    fn test_unpinned_listing_follows_deployment() {
        let transport = ScriptedTransport::new([]);
        let cloud = client(cloud_config(), &transport);
        let server = client(server_config(), &transport);

        assert_eq!(cloud.paginate(Listing::new("/x")).protocol(), Protocol::Cloud);
        assert_eq!(server.paginate(Listing::new("/x")).protocol(), Protocol::Server);
    }

    #[test]
    fn test_offset_advances_by_returned_count_when_server_disagrees() {
        // Echoed startAt and a capped maxResults are logged, never trusted.
        let transport = ScriptedTransport::new([
            ScriptedTransport::json(200, json!({"startAt": 7, "maxResults": 1, "total": 3, "values": [1]})),
            ScriptedTransport::json(200, json!({"startAt": 7, "maxResults": 1, "total": 3, "values": [2]})),
            ScriptedTransport::json(200, json!({"startAt": 7, "maxResults": 1, "total": 3, "values": [3]})),
        ]);
        let client = client(server_config(), &transport);

        assert_eq!(client.paginate(Listing::new("/x")).count(), 3);
        let offsets: Vec<String> = transport
            .requests()
            .iter()
            .map(|request| request.query_param(OFFSET_PARAM).unwrap().to_string())
            .collect();
        assert_eq!(offsets, ["0", "1", "2"]);
        assert!(transport
            .requests()
            .iter()
            .all(|request| request.query_param(LIMIT_PARAM) == Some("2")));
    }

    #[test]
    fn test_cursor_tracks_server_progress() {
        let transport = ScriptedTransport::new([ScriptedTransport::json(
            200,
            json!({"startAt": 0, "total": 3, "values": [1, 2]}),
        )]);
        let client = client(server_config(), &transport);

        let mut paginator = client.paginate(Listing::new("/x"));
        paginator.next();
        assert_eq!(
            paginator.cursor(),
            &PageCursor::Server {
                offset: 2,
                page_size: 2,
                total: Some(3)
            }
        );
    }
}
