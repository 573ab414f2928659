//! HTTP page source integration tests.
//!
//! Starts an axum server that serves a picsum-style listing and reads it back
//! through `HttpPageSource`.

#![cfg(feature = "http")]

mod support;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use lazy_feed::{
    FeedConfig, FeedSession, FetchError, HttpPageSource, PageRequest, PageSource, WatchMode,
};
use support::{column, sentinel_after, viewport_at};

const LAST_PAGE: u64 = 2;

#[derive(Deserialize)]
struct ListQuery {
    page: u64,
    limit: u32,
}

async fn list(Query(query): Query<ListQuery>) -> Json<Value> {
    if query.page > LAST_PAGE {
        return Json(json!([]));
    }
    let items: Vec<Value> = (0..query.limit)
        .map(|i| {
            let id = format!("{}-{}", query.page, i);
            json!({
                "id": id,
                "author": format!("author {i}"),
                "width": 5000,
                "height": 3333,
                "url": format!("https://unsplash.example/{id}"),
                "download_url": format!("https://picsum.example/id/{id}/5000/3333"),
            })
        })
        .collect();
    Json(Value::Array(items))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream down")
}

async fn not_json() -> &'static str {
    "<html>definitely not a listing</html>"
}

/// Bind to port 0 and return the actual address.
async fn start_server() -> String {
    let app = Router::new()
        .route("/v2/list", get(list))
        .route("/broken", get(broken))
        .route("/html", get(not_json));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_and_decodes_a_page() {
    let base = start_server().await;
    let source = HttpPageSource::new(format!("{base}/v2/list"));

    let records = source.fetch_page(PageRequest::new(1, 3)).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].id, "1-0");
    assert_eq!(records[0].author, "author 0");
    assert_eq!(records[2].full_url, "https://picsum.example/id/1-2/5000/3333");
}

#[tokio::test]
async fn past_the_end_is_an_empty_page() {
    let base = start_server().await;
    let source = HttpPageSource::new(format!("{base}/v2/list"));

    let records = source.fetch_page(PageRequest::new(9, 10)).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let base = start_server().await;
    let source = HttpPageSource::new(format!("{base}/broken"));

    let err = source.fetch_page(PageRequest::new(0, 10)).await.unwrap_err();
    assert_eq!(err, FetchError::Status(500));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let base = start_server().await;
    let source = HttpPageSource::new(format!("{base}/html"));

    let err = source.fetch_page(PageRequest::new(0, 10)).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpPageSource::new(format!("http://{addr}/v2/list"));
    let err = source.fetch_page(PageRequest::new(0, 10)).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn session_scrolls_through_the_listing() {
    let base = start_server().await;
    let config = FeedConfig {
        endpoint: format!("{base}/v2/list"),
        page_size: 4,
        halt_on_empty_page: true,
        ..FeedConfig::default()
    };
    let source = HttpPageSource::from_config(&config);
    let session = FeedSession::new(config, source).unwrap();

    session.mount(sentinel_after(0)).unwrap();
    session.settle().await.unwrap();
    assert_eq!(session.image_count().unwrap(), 4);

    // keep scrolling to the bottom until the listing runs out
    let sentinel = session.sentinel().unwrap().unwrap();
    while session.watched(WatchMode::Repeating).unwrap() == 1 {
        let cards = session.image_count().unwrap();
        session.mount_new_cards(column).unwrap();
        session.set_bounds(sentinel, sentinel_after(cards)).unwrap();
        session.handle_viewport(viewport_at(-10_000.0)).unwrap();
        session
            .handle_viewport(viewport_at(cards as f64 * support::CARD_HEIGHT))
            .unwrap();
        session.settle().await.unwrap();
    }

    assert_eq!(session.page().unwrap(), LAST_PAGE + 1);
    assert_eq!(session.image_count().unwrap(), 12);
    assert!(session.is_exhausted().unwrap());
    assert!(session.diagnostics().is_empty());

    let ids: Vec<String> = session.images().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids.first().map(String::as_str), Some("0-0"));
    assert_eq!(ids.last().map(String::as_str), Some("2-3"));
}
