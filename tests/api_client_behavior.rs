//! Behaviour tests for the SAHMK client: caching, failure reporting and
//! lookup resolution as a dashboard user experiences them.

use std::time::Duration;

use serde_json::json;
use tasi_core::{ApiError, MoversKind, QuoteLookup, SahmkClient};
use tasi_tests::{client, config, HttpError, HttpResponse, ScriptedHttpClient, Symbol};

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn when_page_is_rendered_twice_within_ttl_then_network_is_hit_once() {
    // Given: a summary endpoint that answers
    let http = ScriptedHttpClient::routes(vec![(
        "/market/summary/",
        json!({ "index_value": 11890.4, "market_mood": "bullish" }),
    )]);
    let client = client(http.clone());

    // When: the summary is requested twice
    let first = client.market_summary().await.expect("summary");
    let second = client.market_summary().await.expect("summary");

    // Then: one network request served both
    assert_eq!(first, second);
    assert_eq!(http.request_count(), 1);
    assert_eq!(client.network_requests(), 1);
}

#[tokio::test]
async fn when_params_differ_then_cache_entries_are_separate() {
    let http = ScriptedHttpClient::routes(vec![("/market/gainers/", json!({ "gainers": [] }))]);
    let client = client(http.clone());

    client.movers(MoversKind::Gainers, 5).await;
    client.movers(MoversKind::Gainers, 10).await;
    client.movers(MoversKind::Gainers, 5).await;

    assert_eq!(http.request_count(), 2);
}

#[tokio::test]
async fn when_cache_is_cleared_then_next_request_refetches() {
    // Given: a warmed cache
    let http = ScriptedHttpClient::routes(vec![("/market/sectors/", json!({ "sectors": [] }))]);
    let client = client(http.clone());
    client.sectors().await;

    // When: the user refreshes
    client.clear_cache().await;
    client.sectors().await;

    // Then: the data is fetched again
    assert_eq!(http.request_count(), 2);
}

#[tokio::test]
async fn when_ttl_elapses_then_entry_expires() {
    // Given: a client with a very short TTL
    let http = ScriptedHttpClient::routes(vec![("/market/sectors/", json!({ "sectors": [] }))]);
    let config = config().with_cache_ttl(Duration::from_millis(30));
    let client = SahmkClient::new(http.clone(), config);
    client.sectors().await;

    // When: the TTL passes
    tokio::time::sleep(Duration::from_millis(60)).await;
    client.sectors().await;

    // Then: a second request went out
    assert_eq!(http.request_count(), 2);
}

#[tokio::test]
async fn when_clients_are_cloned_then_they_share_one_cache() {
    let http = ScriptedHttpClient::routes(vec![("/market/sectors/", json!({ "sectors": [] }))]);
    let client = client(http.clone());
    let clone = client.clone();

    client.sectors().await;
    clone.sectors().await;

    assert_eq!(http.request_count(), 1);
}

// =============================================================================
// Failure reporting
// =============================================================================

#[tokio::test]
async fn when_upstream_fails_then_failure_is_reported_once_and_not_cached() {
    // Given: an endpoint that always answers 500
    let http = ScriptedHttpClient::new(|_, _| Ok(HttpResponse::with_status(500, "{}")));
    let client = client(http.clone());

    // When: the same data is requested twice
    let first = client.market_summary().await;
    let second = client.market_summary().await;

    // Then: no data, both attempts hit the network, each reported once
    assert!(first.is_none());
    assert!(second.is_none());
    assert_eq!(http.request_count(), 2);

    let reported = client.take_reported();
    assert_eq!(reported.len(), 2);
    assert!(reported
        .iter()
        .all(|error| matches!(error, ApiError::Status { status: 500, .. })));
    assert!(client.take_reported().is_empty(), "draining empties the queue");
}

#[tokio::test]
async fn when_transport_times_out_then_timeout_is_reported() {
    let http = ScriptedHttpClient::new(|_, _| Err(HttpError::timeout("deadline exceeded")));
    let client = client(http);

    assert!(client.sectors().await.is_none());

    let reported = client.take_reported();
    assert!(matches!(
        reported.as_slice(),
        [ApiError::Transport { timeout: true, .. }]
    ));
}

#[tokio::test]
async fn when_body_is_not_json_then_decode_failure_is_reported() {
    let http = ScriptedHttpClient::new(|_, _| Ok(HttpResponse::ok_json("<html>")));
    let client = client(http);

    assert!(client.market_summary().await.is_none());
    assert!(matches!(
        client.take_reported().as_slice(),
        [ApiError::Decode { .. }]
    ));
}

#[tokio::test]
async fn when_list_key_is_missing_then_list_is_empty_not_failed() {
    let http = ScriptedHttpClient::routes(vec![("/market/losers/", json!({ "count": 0 }))]);
    let client = client(http);

    let losers = client.losers(10).await;

    assert_eq!(losers, Some(Vec::new()));
    assert!(client.take_reported().is_empty());
}

#[tokio::test]
async fn when_requests_go_out_then_api_key_header_is_attached() {
    let http = ScriptedHttpClient::routes(vec![("/market/sectors/", json!({ "sectors": [] }))]);
    let client = client(http.clone());

    client.sectors().await;

    let request = &http.requests()[0];
    assert_eq!(request.headers.get("x-api-key").map(String::as_str), Some("test-key"));
    assert_eq!(request.timeout_ms, 10_000);
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn when_symbol_is_unknown_then_lookup_is_not_found_without_error() {
    // Given: the quote endpoint answers 404
    let http = ScriptedHttpClient::routes(Vec::new());
    let client = client(http.clone());

    // When: a user looks up an unknown ticker
    let result = client.lookup(" 9999 ").await;

    // Then: a plain not-found, nothing reported, no company call
    assert_eq!(
        result,
        QuoteLookup::NotFound {
            symbol: String::from("9999")
        }
    );
    assert!(client.take_reported().is_empty());
    assert_eq!(http.request_count(), 1);
}

#[tokio::test]
async fn when_input_is_not_a_symbol_then_no_request_is_made() {
    let http = ScriptedHttpClient::routes(Vec::new());
    let client = client(http.clone());

    let result = client.lookup("22 22").await;

    assert!(matches!(result, QuoteLookup::NotFound { .. }));
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn when_quote_exists_then_company_profile_is_attached() {
    let http = ScriptedHttpClient::routes(vec![
        ("/quote/2222/", json!({ "symbol": "2222", "price": 27.4 })),
        ("/company/2222/", json!({ "name": "Saudi Aramco", "sector": "Energy" })),
    ]);
    let client = client(http);

    let QuoteLookup::Found { quote, company } = client.lookup("2222").await else {
        panic!("expected a quote");
    };

    assert_eq!(quote.symbol, Symbol::parse("2222").expect("symbol"));
    assert_eq!(quote.price, Some(27.4));
    assert_eq!(
        company.and_then(|profile| profile.sector).as_deref(),
        Some("Energy")
    );
}

#[tokio::test]
async fn when_quote_endpoint_is_down_then_lookup_is_unavailable_and_reported() {
    let http = ScriptedHttpClient::new(|_, _| Ok(HttpResponse::with_status(503, "{}")));
    let client = client(http);

    assert_eq!(client.lookup("2222").await, QuoteLookup::Unavailable);
    assert_eq!(client.take_reported().len(), 1);
}
