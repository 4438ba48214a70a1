//! Integration tests for a browsing session against a mocked catalog.
//!
//! Each test starts its own wiremock server and drives the public feed and
//! catalog API the same way the UI does: tickets out, results back in.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use shelf::catalog::{CatalogClient, DetailView};
use shelf::feed::{Applied, Category, Endpoint, FeedController, FilterSignature, PageTicket, PAGE_SIZE};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn docs(start: usize, n: usize) -> Value {
    let docs: Vec<Value> = (start..start + n)
        .map(|i| {
            json!({
                "key": format!("/works/OL{}W", i),
                "title": format!("Book {}", i),
                "author_name": ["Anon"],
                "cover_i": i + 1,
                "first_publish_year": 1900 + i
            })
        })
        .collect();
    json!({ "docs": docs })
}

async fn mount_browse(server: &MockServer, offset: usize, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "book"))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

async fn run(client: &CatalogClient, feed: &mut FeedController, ticket: &PageTicket) -> Applied {
    let result = client.fetch_page(&ticket.request).await;
    feed.apply(ticket, result)
}

#[tokio::test]
async fn test_scroll_two_pages_then_switch_category() {
    let server = MockServer::start().await;
    mount_browse(&server, 0, docs(0, PAGE_SIZE)).await;
    mount_browse(&server, 40, docs(40, PAGE_SIZE)).await;
    Mock::given(method("GET"))
        .and(path("/subjects/science.json"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "works": [
                {"key": "/works/OL900W", "title": "Cosmos", "authors": [{"name": "Carl Sagan"}], "cover_id": 5},
                {"key": "/works/OL901W", "title": "The Selfish Gene", "authors": [{"name": "Richard Dawkins"}]}
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut feed = FeedController::new();

    let first = feed.set_filter(FilterSignature::new(Category::All, "")).unwrap();
    assert_eq!(first.request.endpoint, Endpoint::DefaultBrowse);
    assert_eq!(run(&client, &mut feed, &first).await, Applied::Appended { added: 40, duplicates: 0 });

    let second = feed.load_next_page().unwrap();
    assert_eq!(second.offset, 40);
    assert_eq!(run(&client, &mut feed, &second).await, Applied::Appended { added: 40, duplicates: 0 });
    assert_eq!(feed.items().len(), 80);
    assert_eq!(feed.state().offset(), 80);

    let science = feed.set_filter(FilterSignature::new(Category::Science, "")).unwrap();
    assert_eq!(science.offset, 0);
    assert_eq!(science.request.endpoint, Endpoint::SearchBySubjectCategory);
    assert!(feed.items().is_empty());

    run(&client, &mut feed, &science).await;
    let titles: Vec<&str> = feed.items().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Cosmos", "The Selfish Gene"]);
    assert_eq!(feed.items()[0].cover_url(), "https://covers.openlibrary.org/b/id/5-L.jpg");
}

#[tokio::test]
async fn test_late_reply_from_old_filter_is_dropped() {
    let server = MockServer::start().await;
    mount_browse(&server, 0, docs(0, 5)).await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("title", "emma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"key": "/works/OL7W", "title": "Emma", "author_name": ["Jane Austen"]}]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut feed = FeedController::new();

    let browse = feed.set_filter(FilterSignature::new(Category::All, "")).unwrap();
    let search = feed.set_filter(FilterSignature::new(Category::All, "emma")).unwrap();
    assert_eq!(search.request.search_term.as_deref(), Some("emma"));

    // Search answers first, then the superseded browse page arrives.
    run(&client, &mut feed, &search).await;
    assert_eq!(run(&client, &mut feed, &browse).await, Applied::Discarded);

    assert_eq!(feed.items().len(), 1);
    assert_eq!(feed.items()[0].title, "Emma");
}

#[tokio::test]
async fn test_overlapping_pages_are_deduplicated() {
    let server = MockServer::start().await;
    mount_browse(&server, 0, docs(0, PAGE_SIZE)).await;
    // The catalog shifted: the next page repeats the last ten records.
    mount_browse(&server, 40, docs(30, PAGE_SIZE)).await;

    let client = client(&server);
    let mut feed = FeedController::new();

    let first = feed.set_filter(FilterSignature::default()).unwrap();
    run(&client, &mut feed, &first).await;
    let second = feed.load_next_page().unwrap();
    assert_eq!(run(&client, &mut feed, &second).await, Applied::Appended { added: 30, duplicates: 10 });
    assert_eq!(feed.items().len(), 70);
    assert_eq!(feed.items()[69].id, "/works/OL69W");
}

#[tokio::test]
async fn test_empty_page_ends_the_feed() {
    let server = MockServer::start().await;
    mount_browse(&server, 0, docs(0, 3)).await;
    mount_browse(&server, 40, json!({ "docs": [] })).await;

    let client = client(&server);
    let mut feed = FeedController::new();

    let first = feed.set_filter(FilterSignature::default()).unwrap();
    run(&client, &mut feed, &first).await;
    let second = feed.load_next_page().unwrap();
    assert_eq!(run(&client, &mut feed, &second).await, Applied::Exhausted);

    assert!(feed.state().is_exhausted());
    assert!(feed.load_next_page().is_none());
    assert_eq!(feed.items().len(), 3);
}

#[tokio::test]
async fn test_server_error_keeps_items_and_allows_retry() {
    let server = MockServer::start().await;
    mount_browse(&server, 0, docs(0, PAGE_SIZE)).await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_browse(&server, 40, docs(40, 2)).await;

    let client = client(&server);
    let mut feed = FeedController::new();

    let first = feed.set_filter(FilterSignature::default()).unwrap();
    run(&client, &mut feed, &first).await;

    let failing = feed.load_next_page().unwrap();
    match run(&client, &mut feed, &failing).await {
        Applied::Failed(advisory) => assert!(advisory.message.contains("503")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(feed.items().len(), 40);
    assert!(!feed.state().in_flight());

    let retry = feed.load_next_page().unwrap();
    assert_eq!(retry.offset, 40);
    run(&client, &mut feed, &retry).await;
    assert_eq!(feed.items().len(), 42);
}

#[tokio::test]
async fn test_print_pages_writes_highlighted_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("title", "hobbit"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [
                {"key": "/works/OL27W", "title": "The Hobbit", "author_name": ["J.R.R. Tolkien"], "first_publish_year": 1937}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("title", "hobbit"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "docs": [] })))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut out = Vec::new();
    let count = shelf::headless::print_pages(
        &client,
        FilterSignature::new(Category::Fiction, "hobbit"),
        3,
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(count, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "The <mark>Hobbit</mark>\tJ.R.R. Tolkien\t1937\n"
    );
}

#[tokio::test]
async fn test_detail_enriches_record() {
    let server = MockServer::start().await;
    mount_browse(&server, 0, docs(0, 1)).await;
    Mock::given(method("GET"))
        .and(path("/works/OL0W.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": {"type": "/type/text", "value": "A short tale."},
            "subjects": ["Adventure", "Dragons"]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut feed = FeedController::new();
    let first = feed.set_filter(FilterSignature::default()).unwrap();
    run(&client, &mut feed, &first).await;

    let book = feed.items()[0].clone();
    let key = book.detail_key.as_deref().unwrap();
    let detail = client.fetch_detail(key).await.unwrap();
    let view = DetailView::merge(&book, Some(&detail));

    assert_eq!(view.description, "A short tale.");
    assert_eq!(view.subjects, "Adventure, Dragons");
    assert_eq!(view.first_published, "1900");
    assert_eq!(view.authors, "Anon");
}
