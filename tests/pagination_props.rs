//
//  atlas-rest
//  tests/pagination_props.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Property tests for the paginator over simulated servers.

mod common;

use atlas_rest::api::common::{Listing, Protocol, LIMIT_PARAM, OFFSET_PARAM};
use atlas_rest::api::{Request, Response};
use atlas_rest::{ClientConfig, Deployment};
use proptest::prelude::*;
use serde_json::{json, Value};

const CLOUD_BASE: &str = "https://acme.atlassian.net";

fn page_number(request: &Request) -> usize {
    request
        .url
        .split_once("page=")
        .and_then(|(_, page)| page.parse().ok())
        .unwrap_or(0)
}

/// A Cloud listing of `total` items served `page_size` at a time.
fn cloud_server(total: usize, page_size: usize) -> impl Fn(&Request) -> Response + Send + Sync + 'static {
    move |request| {
        let page = page_number(request);
        let start = page * page_size;
        let end = (start + page_size).min(total);
        let values: Vec<Value> = (start..end).map(|n| json!(n)).collect();
        let is_last = end >= total;

        let mut body = json!({"isLast": is_last, "values": values});
        if !is_last {
            body["nextPage"] = json!(format!("{CLOUD_BASE}/rest/api/3/project/search?page={}", page + 1));
        }
        common::json_response(200, &body)
    }
}

/// A Server listing of `total` items that returns at most `cap` per page,
/// whatever page size is asked for.
fn offset_server(total: u64, cap: u64) -> impl Fn(&Request) -> Response + Send + Sync + 'static {
    move |request| {
        let start: u64 = request
            .query_param(OFFSET_PARAM)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0);
        let limit: u64 = request
            .query_param(LIMIT_PARAM)
            .and_then(|value| value.parse().ok())
            .unwrap_or(cap);
        let end = (start + limit.min(cap)).min(total);
        let issues: Vec<Value> = (start..end).map(|n| json!(n)).collect();
        common::json_response(
            200,
            &json!({"startAt": start, "maxResults": limit, "total": total, "issues": issues}),
        )
    }
}

proptest! {
    /// Cloud yields every item once, in order, in ceil(N / P) fetches.
    #[test]
    fn prop_cloud_fetch_count(total in 0usize..60, page_size in 1usize..12) {
        let transport = common::FnTransport::new(cloud_server(total, page_size));
        let client = common::client(
            ClientConfig::new(CLOUD_BASE).with_page_size(page_size as u32),
            &transport,
        );

        let items: Vec<Value> = client
            .paginate(Listing::new("/rest/api/3/project/search"))
            .map(|item| item.unwrap())
            .collect();

        let expected: Vec<Value> = (0..total).map(|n| json!(n)).collect();
        prop_assert_eq!(items, expected);
        prop_assert_eq!(transport.calls(), total.div_ceil(page_size).max(1));
    }

    /// Server yields exactly `total` items even when pages come back short.
    #[test]
    fn prop_server_yields_total(total in 0u64..80, page_size in 1u32..20, cap in 1u64..20) {
        let transport = common::FnTransport::new(offset_server(total, cap));
        let client = common::client(
            ClientConfig::new("https://jira.acme.com").with_page_size(page_size),
            &transport,
        );

        let listing = Listing::new("/rest/api/2/search").item_key("issues");
        let items: Vec<Value> = client.paginate(listing).map(|item| item.unwrap()).collect();

        let expected: Vec<Value> = (0..total).map(|n| json!(n)).collect();
        prop_assert_eq!(items, expected);

        let per_page = u64::from(page_size).min(cap);
        prop_assert_eq!(transport.calls() as u64, total.div_ceil(per_page).max(1));
    }

    /// A zero-item page ends the sequence whatever total the server claims.
    #[test]
    fn prop_empty_page_terminates(served in 0u64..30, claimed in 30u64..1000, page_size in 1u32..10) {
        let transport = common::FnTransport::new(move |request: &Request| {
            let start: u64 = request
                .query_param(OFFSET_PARAM)
                .and_then(|value| value.parse().ok())
                .unwrap_or(0);
            let end = (start + u64::from(page_size)).min(served);
            let values: Vec<Value> = (start..end).map(|n| json!(n)).collect();
            common::json_response(200, &json!({"startAt": start, "total": claimed, "values": values}))
        });
        let client = common::client(
            ClientConfig::new("https://jira.acme.com").with_page_size(page_size),
            &transport,
        );

        let count = client.paginate(Listing::new("/rest/api/2/filter")).count();
        prop_assert_eq!(count as u64, served);
    }

    /// The protocol follows the deployment override, not the host name.
    #[test]
    fn prop_override_selects_protocol(cloud in any::<bool>()) {
        let transport = common::FnTransport::new(offset_server(3, 10));
        let deployment = Deployment::from_cloud_flag(cloud);
        let client = common::client(
            ClientConfig::new("https://jira.acme.com").with_deployment(deployment),
            &transport,
        );

        let _ = client.paginate(Listing::new("/rest/api/2/search")).count();
        let requests = transport.requests();
        prop_assert_eq!(requests[0].query_param(OFFSET_PARAM).is_some(), !cloud);
    }

    /// A listing pinned to the offset protocol drains fully on either deployment.
    #[test]
    fn prop_pinned_offset_listing_yields_total(
        cloud in any::<bool>(),
        total in 0u64..40,
        page_size in 1u32..8,
    ) {
        let transport = common::FnTransport::new(offset_server(total, 50));
        let client = common::client(
            ClientConfig::new(CLOUD_BASE)
                .with_deployment(Deployment::from_cloud_flag(cloud))
                .with_page_size(page_size),
            &transport,
        );

        let listing = Listing::new("/rest/api/3/search")
            .item_key("issues")
            .protocol(Protocol::Server);
        let items: Vec<Value> = client.paginate(listing).map(|item| item.unwrap()).collect();

        let expected: Vec<Value> = (0..total).map(|n| json!(n)).collect();
        prop_assert_eq!(items, expected);
        prop_assert_eq!(transport.calls() as u64, total.div_ceil(u64::from(page_size)).max(1));
    }
}
