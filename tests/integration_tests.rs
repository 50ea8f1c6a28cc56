//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → TrackerClient → HTTP requests →
//! typed results, for both the pagination cursor and the aggregator.

use clap::Parser;
use futures::StreamExt;
use serde_json::{json, Value};
use std::io::Write;
use tracker_api::aggregator::CorrelationStrategy;
use tracker_api::auth::TOKEN_HEADER;
use tracker_api::cli::{Cli, Runner};
use tracker_api::models::Story;
use tracker_api::{ClientConfig, Error, TrackerClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Mock endpoints
// ============================================================================

/// Serves `limit`/`offset` slices of `total` generated stories
struct StoryPages {
    total: u64,
}

impl Respond for StoryPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let param = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<u64>().ok())
                .unwrap_or(0)
        };
        let (offset, limit) = (param("offset"), param("limit"));
        let items: Vec<Value> = (offset..self.total.min(offset + limit))
            .map(|i| json!({"kind": "story", "id": i + 1, "project_id": 99, "name": format!("story-{}", i + 1)}))
            .collect();

        ResponseTemplate::new(200)
            .insert_header("X-Tracker-Pagination-Total", self.total.to_string().as_str())
            .set_body_json(items)
    }
}

/// Answers aggregator POSTs for stories of project 99
struct Aggregator;

impl Aggregator {
    fn fragment(sub_url: &str) -> Option<Value> {
        let parts: Vec<&str> = sub_url.split('?').next()?.split('/').collect();
        // ["", "services", "v5", "projects", "99", "stories", "{id}", ...]
        let story_id: u64 = parts.get(6)?.parse().ok()?;
        if story_id == 404 {
            return Some(json!({"kind": "error", "code": "unfound_resource", "error": "not found"}));
        }
        Some(match parts.get(7).copied() {
            None => json!({"kind": "story", "id": story_id, "project_id": 99, "name": format!("story-{story_id}")}),
            Some("comments") => json!([
                {"kind": "comment", "id": story_id * 10, "story_id": story_id, "text": "looks good"}
            ]),
            Some("reviews") => json!([]),
            Some(_) => return None,
        })
    }
}

impl Respond for Aggregator {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let sub_urls: Vec<String> = serde_json::from_slice(&request.body).unwrap_or_default();
        let answer: serde_json::Map<String, Value> = sub_urls
            .into_iter()
            .filter_map(|url| Self::fragment(&url).map(|fragment| (url, fragment)))
            .collect();
        ResponseTemplate::new(200).set_body_json(Value::Object(answer))
    }
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(format!("{}/services/v5/", server.uri()))
        .token("integration-token")
        .page_size(10)
        .batch_size(2)
        .build()
}

fn client_for(server: &MockServer) -> TrackerClient {
    TrackerClient::new(config_for(server)).unwrap()
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_cursor_pages_through_stories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .and(header(TOKEN_HEADER, "integration-token"))
        .respond_with(StoryPages { total: 23 })
        // probe + ceil(23 / 10) pages
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut cursor = client.stories().iterate(99, None).await.unwrap();
    assert_eq!(cursor.total().total(), 23);

    let stories = cursor.all().await.unwrap();
    assert_eq!(stories.len(), 23);
    assert!(stories.iter().zip(1..).all(|(story, id)| story.id == id));
    assert!(cursor.next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_cursor_as_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .respond_with(StoryPages { total: 12 })
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let names: Vec<String> = client
        .stories()
        .iterate(99, None)
        .await
        .unwrap()
        .into_stream()
        .map(|story: tracker_api::Result<Story>| story.unwrap().name)
        .collect()
        .await;

    assert_eq!(names.len(), 12);
    assert_eq!(names[11], "story-12");
}

#[tokio::test]
async fn test_list_fetches_in_one_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .and(query_param("limit", "0"))
        .respond_with(StoryPages { total: 15 })
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .and(query_param("limit", "15"))
        .respond_with(StoryPages { total: 15 })
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let stories = client.stories().list(99, None).await.unwrap();
    assert_eq!(stories.len(), 15);
}

#[tokio::test]
async fn test_probe_rejected_by_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "kind": "error",
            "code": "unauthorized_operation",
            "error": "Authorization failure."
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.stories().iterate(99, None).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_missing_total_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.stories().iterate(99, None).await.unwrap_err();

    assert!(matches!(err, Error::MissingPaginationTotal));
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_aggregation_batches_and_correlates_by_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/v5/aggregator"))
        .and(header(TOKEN_HEADER, "integration-token"))
        .respond_with(Aggregator)
        // 9 sub-requests in chunks of 2
        .expect(5)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut aggregation = client.aggregation(CorrelationStrategy::ByUrl);
    for story_id in [1, 2, 3] {
        aggregation.queue_story_bundle(99, story_id);
    }
    assert_eq!(aggregation.pending(), 9);

    let summary = aggregation.dispatch().await.unwrap();
    assert_eq!(summary.batches, 5);
    assert_eq!(summary.fragments, 9);

    assert_eq!(aggregation.story(99, 2).unwrap().name, "story-2");
    assert_eq!(aggregation.comments(99, 3).unwrap()[0].id, 30);
    assert!(aggregation.reviews(99, 1).unwrap().is_empty());
}

#[tokio::test]
async fn test_aggregation_bundles_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/v5/aggregator"))
        .respond_with(Aggregator)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut aggregation = client.aggregation(CorrelationStrategy::ById);
    aggregation.queue_story_bundle(99, 1).queue_story_bundle(99, 2);
    aggregation.dispatch().await.unwrap();

    let bundle = aggregation.bundle(2).unwrap();
    assert_eq!(bundle.story.unwrap().id, 2);
    assert_eq!(bundle.comments.unwrap()[0].story_id, 2);
    assert_eq!(bundle.reviews, Some(vec![]));
}

#[tokio::test]
async fn test_aggregations_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/v5/aggregator"))
        .respond_with(Aggregator)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut first = client.aggregation(CorrelationStrategy::ByUrl);
    first.queue_story(99, 1);
    first.dispatch().await.unwrap();

    let second = client.aggregation(CorrelationStrategy::ByUrl);
    assert_eq!(second.pending(), 0);
    assert!(second.story(99, 1).unwrap_err().is_not_found());
    assert!(first.story(99, 1).is_ok());
}

#[tokio::test]
async fn test_aggregator_failure_surfaces_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/v5/aggregator"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut aggregation = client.aggregation(CorrelationStrategy::ByUrl);
    aggregation.queue_stories(99, &[1, 2, 3]);

    let err = aggregation.dispatch().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    // The first chunk was consumed; the second is still queued
    assert_eq!(aggregation.pending(), 1);
}

// ============================================================================
// Single-request services
// ============================================================================

#[tokio::test]
async fn test_account_members_and_project_resources() {
    let mock_server = MockServer::start().await;

    for (endpoint, body) in [
        (
            "/services/v5/accounts/12/memberships",
            json!([{"id": 40, "owner": true, "person": {"id": 7, "name": "Ada", "username": "ada"}}]),
        ),
        (
            "/services/v5/projects/99/memberships",
            json!([{"id": 5, "project_id": 99, "role": "owner", "person": {"id": 7, "username": "ada"}}]),
        ),
        (
            "/services/v5/projects/99/iterations/4",
            json!({"number": 4, "project_id": 99, "story_ids": [1, 2, 3]}),
        ),
        (
            "/services/v5/projects/99/epics",
            json!([{"id": 70, "project_id": 99, "name": "Billing"}]),
        ),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header(TOKEN_HEADER, "integration-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);

    let members = client.accounts().memberships(12).list().await.unwrap();
    assert_eq!(members[0].person.username, "ada");
    assert!(members[0].owner);

    let project_members = client.memberships().list(99).await.unwrap();
    assert_eq!(project_members[0].role, "owner");

    let iteration = client.iterations().get(99, 4).await.unwrap();
    assert_eq!(iteration.story_ids.len(), 3);

    let epics = client.epics().list(99).await.unwrap();
    assert_eq!(epics[0].name, "Billing");
}

// ============================================================================
// Configuration and CLI
// ============================================================================

#[tokio::test]
async fn test_client_from_yaml_config() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/me"))
        .and(header(TOKEN_HEADER, "from-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "username": "ada"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "base_url: {}/services/v5/\ntoken: from-file\npage_size: 25\n",
        mock_server.uri()
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(config.page_size, 25);

    let client = TrackerClient::new(config).unwrap();
    assert_eq!(client.current_user().await.unwrap().username, "ada");
}

#[test]
fn test_client_requires_token() {
    let config = ClientConfig::builder()
        .base_url("https://www.pivotaltracker.com/services/v5/")
        .build();
    assert!(TrackerClient::new(config).is_err());
}

#[tokio::test]
async fn test_cli_aggregate_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/v5/aggregator"))
        .respond_with(Aggregator)
        .mount(&mock_server)
        .await;

    let cli = Cli::parse_from([
        "tracker-api",
        "aggregate",
        "--project",
        "99",
        "--stories",
        "1,404",
        "--by-id",
    ]);
    let client = client_for(&mock_server);
    let mut out = Vec::new();
    Runner::new(cli).execute(&client, &mut out).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["story"]["name"], "story-1");
    assert_eq!(lines[0]["comments"][0]["id"], 10);
    assert!(lines[1]["error"].as_str().unwrap().contains("unfound_resource"));
}

#[tokio::test]
async fn test_cli_stories_respects_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .respond_with(StoryPages { total: 40 })
        // probe + first page only
        .expect(2)
        .mount(&mock_server)
        .await;

    let cli = Cli::parse_from(["tracker-api", "stories", "--project", "99", "--limit", "5"]);
    let client = client_for(&mock_server);
    let mut out = Vec::new();
    Runner::new(cli).execute(&client, &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 5);
}

#[tokio::test]
async fn test_cli_rejects_bad_sort_order() {
    let mock_server = MockServer::start().await;

    let cli = Cli::parse_from([
        "tracker-api",
        "activity",
        "--project",
        "99",
        "--sort-order",
        "sideways",
    ]);
    let client = client_for(&mock_server);
    let mut out = Vec::new();
    let err = Runner::new(cli).execute(&client, &mut out).await.unwrap_err();

    assert!(matches!(err, Error::InvalidSortOrder(ref order) if order == "sideways"));
}
