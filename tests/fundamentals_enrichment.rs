//! Behaviour tests for the fundamentals loader: batching, the left join
//! and degraded operation when live quotes are missing.

use std::io::Write;
use std::sync::Arc;

use serde_json::{json, Value};
use tasi_core::{DatasetError, QUOTE_BATCH_LIMIT};
use tasi_tests::{
    client, quotes_body, requested_symbols, synthetic_dataset, FundamentalsDataset,
    FundamentalsLoader, HttpResponse, ScriptedHttpClient, CSV_HEADER,
};
use tempfile::NamedTempFile;

fn loader(http: Arc<ScriptedHttpClient>, rows: usize) -> FundamentalsLoader {
    FundamentalsLoader::new(client(http), Arc::new(synthetic_dataset(rows)))
}

// =============================================================================
// Batching
// =============================================================================

#[tokio::test]
async fn when_dataset_spans_batches_then_each_call_stays_within_limit() {
    for (rows, expected_calls) in [(49, 1), (50, 1), (51, 2), (101, 3)] {
        // Given: a dataset of `rows` companies and a quote API that answers all
        let http = ScriptedHttpClient::new(|_, request| Ok(quotes_body(request, |_| true)));
        let loader = loader(http.clone(), rows);

        // When: the enriched table is loaded
        let enriched = loader.load_enriched().await;

        // Then: the batches cover every symbol exactly once, each within the limit
        assert_eq!(enriched.len(), rows);
        assert_eq!(http.request_count(), expected_calls, "rows = {rows}");

        let batches: Vec<Vec<String>> = http.requests().iter().map(requested_symbols).collect();
        assert!(batches.iter().all(|batch| batch.len() <= QUOTE_BATCH_LIMIT));
        assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), rows);
        assert!(enriched.iter().all(|row| row.has_live_quote()));
    }
}

#[tokio::test]
async fn when_only_some_symbols_are_quoted_then_the_rest_keep_empty_live_fields() {
    // Given: a quote API that only knows even-numbered symbols
    let http = ScriptedHttpClient::new(|_, request| {
        Ok(quotes_body(request, |symbol| {
            symbol.parse::<u32>().is_ok_and(|number| number % 2 == 0)
        }))
    });
    let loader = loader(http, 101);

    // When
    let enriched = loader.load_enriched().await;

    // Then: dataset order and row count are preserved
    assert_eq!(enriched.len(), 101);
    assert_eq!(enriched[0].record.symbol.as_str(), "1000");
    assert_eq!(enriched[100].record.symbol.as_str(), "1100");
    for row in &enriched {
        let even = row.record.symbol.as_str().parse::<u32>().is_ok_and(|n| n % 2 == 0);
        assert_eq!(row.has_live_quote(), even, "{}", row.record.symbol);
        if !even {
            assert_eq!(row.price, None);
        }
    }
}

#[tokio::test]
async fn when_one_batch_fails_then_other_batches_still_enrich() {
    // Given: the second batch errors
    let http = ScriptedHttpClient::new(|_, request| {
        if requested_symbols(request).first().map(String::as_str) == Some("1050") {
            Ok(HttpResponse::with_status(502, "{}"))
        } else {
            Ok(quotes_body(request, |_| true))
        }
    });
    let loader = loader(http, 120);

    let enriched = loader.load_enriched().await;

    let live = enriched.iter().filter(|row| row.has_live_quote()).count();
    assert_eq!(live, 70);
    assert!(!enriched[60].has_live_quote());
    assert_eq!(loader.client().take_reported().len(), 1);
}

#[tokio::test]
async fn when_one_quote_in_a_batch_is_malformed_then_only_that_entry_is_lost() {
    // Given: a batch answer with every requested quote plus one broken entry
    let http = ScriptedHttpClient::new(|_, request| {
        let mut quotes: Vec<Value> = requested_symbols(request)
            .iter()
            .map(|symbol| json!({ "symbol": symbol, "price": 10.0 }))
            .collect();
        quotes.push(json!({ "symbol": null, "price": 1.0 }));
        Ok(HttpResponse::ok_json(json!({ "quotes": quotes }).to_string()))
    });
    let loader = loader(http, 10);

    // When
    let enriched = loader.load_enriched().await;

    // Then: the valid quotes still enrich their rows
    let live = enriched.iter().filter(|row| row.has_live_quote()).count();
    assert_eq!(live, 10);
    assert!(loader.client().take_reported().is_empty());
}

#[tokio::test]
async fn when_quote_api_is_down_then_every_row_is_still_returned() {
    // Given: total outage
    let http = ScriptedHttpClient::new(|_, _| Ok(HttpResponse::with_status(503, "{}")));
    let loader = loader(http, 30);

    // When
    let enriched = loader.load_enriched().await;

    // Then: no error, all live fields empty
    assert_eq!(enriched.len(), 30);
    assert!(enriched.iter().all(|row| !row.has_live_quote()));
}

#[tokio::test]
async fn when_enriched_table_is_cached_then_reload_makes_no_calls_until_cleared() {
    let http = ScriptedHttpClient::new(|_, request| Ok(quotes_body(request, |_| true)));
    let loader = loader(http.clone(), 10);

    loader.load_enriched().await;
    loader.load_enriched().await;
    assert_eq!(http.request_count(), 1);

    loader.clear_cache().await;
    loader.client().clear_cache().await;
    loader.load_enriched().await;
    assert_eq!(http.request_count(), 2);
}

// =============================================================================
// Dataset loading
// =============================================================================

#[test]
fn when_csv_has_leading_zero_symbols_then_they_survive_as_text() {
    let mut file = NamedTempFile::new().expect("tempfile");
    writeln!(file, "{CSV_HEADER}").expect("write");
    writeln!(
        file,
        "0100,Padded Co,Insurance,9.0,1.0,8.0,5.0,0.0,0.3,1.2,10.0,yes,1.0,0.1,4.0,1.0"
    )
    .expect("write");

    let dataset = FundamentalsDataset::from_path(file.path()).expect("dataset");

    assert_eq!(dataset.records()[0].symbol.as_str(), "0100");
    assert!(dataset.records()[0].shariah_compliant);
}

#[test]
fn when_a_row_has_a_bad_symbol_then_its_line_is_reported() {
    let csv = format!(
        "{CSV_HEADER}\n2222,Aramco,Energy,16,4,26,25,5.8,0.2,1.4,8.5,true,1600,398,2450,320\n\
         ??,Broken,Energy,1,1,1,1,1,1,1,1,false,1,1,1,1\n"
    );

    let error = FundamentalsDataset::from_reader(csv.as_bytes()).expect_err("bad symbol");

    assert!(matches!(error, DatasetError::Validation { row: 3, .. }));
}
