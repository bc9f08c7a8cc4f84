//! Search Integration Tests
//!
//! Tests for latest-wins commits, debouncing and category filtering.

use std::sync::Arc;
use std::time::Duration;

use flowstate::adapters::{DeezerClient, DeezerConfig, StubHttpClient, TmdbClient, TmdbConfig};
use flowstate::search::{SearchCategory, SearchController, SearchOutcome};
use flowstate::ContentItem;
use serde_json::json;

fn tracks(title: &str) -> serde_json::Value {
    json!({"data": [{"id": 1, "title": title, "artist": {"name": "Someone"}}]})
}

fn controller(stub: StubHttpClient, debounce: Duration) -> Arc<SearchController> {
    let stub = Arc::new(stub);
    let deezer = DeezerClient::new(DeezerConfig::default(), stub.clone()).unwrap();
    let tmdb = TmdbClient::new(TmdbConfig::with_api_key("k"), stub).unwrap();
    Arc::new(SearchController::new(Arc::new(deezer), Some(Arc::new(tmdb))).with_debounce(debounce))
}

#[tokio::test]
async fn test_slow_earlier_query_never_overwrites_later() {
    let stub = StubHttpClient::new()
        .respond_after("/search/track?q=slow", tracks("Slow Result"), Duration::from_millis(200))
        .respond("/search/track?q=fast", tracks("Fast Result"));
    let c = controller(stub, Duration::ZERO);

    let slow = {
        let c = c.clone();
        tokio::spawn(async move { c.input("slow").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let fast = c.input("fast").await;
    assert!(matches!(fast, SearchOutcome::Completed(_)));
    assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);

    let committed = c.committed().unwrap();
    assert_eq!(committed.query, "fast");
    assert_eq!(committed.music[0].title, "Fast Result");
}

#[tokio::test]
async fn test_debounce_collapses_rapid_input() {
    let stub = Arc::new(StubHttpClient::new().respond("/search/track", tracks("Rain")));
    let deezer = DeezerClient::new(DeezerConfig::default(), stub.clone()).unwrap();
    let c = Arc::new(
        SearchController::new(Arc::new(deezer), None).with_debounce(Duration::from_millis(50)),
    );

    let mut handles = Vec::new();
    for partial in ["r", "ra", "rai", "rain"] {
        let c = c.clone();
        handles.push(tokio::spawn(async move { c.input(partial).await }));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let mut completed = 0;
    for handle in handles {
        if let SearchOutcome::Completed(results) = handle.await.unwrap() {
            assert_eq!(results.query, "rain");
            completed += 1;
        }
    }
    assert_eq!(completed, 1);
    // One track search and one playlist search for the final query only
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_results_combine_music_and_movies() {
    let stub = StubHttpClient::new()
        .respond("/search/track", tracks("Interstellar Main Theme"))
        .respond("/search/movie", json!({"results": [{"id": 157336, "title": "Interstellar"}]}));
    let c = controller(stub, Duration::ZERO);

    c.input("interstellar").await;
    let all = c.results();
    assert_eq!(all.len(), 2);
    assert!(matches!(all[0], ContentItem::Music(_)));
    assert!(matches!(all[1], ContentItem::Movie(_)));

    c.set_category(SearchCategory::Movies);
    assert_eq!(c.results().len(), 1);
    assert_eq!(c.results()[0].title(), "Interstellar");
}

#[tokio::test]
async fn test_blank_input_clears_results() {
    let c = controller(StubHttpClient::new().respond("/search/track", tracks("A")), Duration::ZERO);
    c.input("a").await;
    assert!(c.committed().is_some());

    assert_eq!(c.input("  ").await, SearchOutcome::Cleared);
    assert!(c.committed().is_none());
    assert!(c.results().is_empty());
}

#[tokio::test]
async fn test_providers_down_completes_empty() {
    let c = controller(StubHttpClient::new(), Duration::ZERO);
    match c.input("anything").await {
        SearchOutcome::Completed(results) => assert!(results.is_empty()),
        other => panic!("unexpected outcome: {:?}", other),
    }
}
