//! Tests for the resource services

use super::*;
use crate::http::{HttpClient, Transport};
use crate::types::SortOrder;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> Arc<dyn Transport> {
    Arc::new(HttpClient::with_base_url(&format!("{}/services/v5/", server.uri())).unwrap())
}

fn paged(total: u64, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-Tracker-Pagination-Total", total.to_string().as_str())
        .set_body_json(body)
}

#[tokio::test]
async fn test_story_list_fetches_everything_in_one_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .and(query_param("filter", "state:started"))
        .and(query_param("limit", "0"))
        .respond_with(paged(3, json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .and(query_param("filter", "state:started"))
        .and(query_param("limit", "3"))
        .and(query_param("offset", "0"))
        .respond_with(paged(
            3,
            json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}, {"id": 3, "name": "c"}]),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = StoryService::new(transport_for(&mock_server), 10);
    let stories = service.list(99, Some("state:started")).await.unwrap();

    assert_eq!(
        stories.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_story_iterate_omits_empty_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories"))
        .and(query_param_is_missing("filter"))
        .respond_with(paged(0, json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = StoryService::new(transport_for(&mock_server), 10);
    let mut cursor = service.iterate(99, Some("")).await.unwrap();

    assert_eq!(cursor.total().total(), 0);
    assert!(cursor.next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_story_get_and_comments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "five"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/stories/5/comments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 50, "story_id": 5}])),
        )
        .mount(&mock_server)
        .await;

    let service = StoryService::new(transport_for(&mock_server), 10);

    assert_eq!(service.get(99, 5).await.unwrap().name, "five");
    assert_eq!(service.comments(99, 5).await.unwrap()[0].id, 50);
}

#[tokio::test]
async fn test_activity_iterate_sends_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/activity"))
        .and(query_param("sort_order", "asc"))
        .and(query_param("since_version", "40"))
        .and(query_param("occurred_after", "2024-03-01T00:00:00Z"))
        .and(query_param("limit", "0"))
        .respond_with(paged(1, json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/activity"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(paged(1, json!([{"guid": "99_41", "project_version": 41}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = ActivityQuery::new()
        .sort_order(SortOrder::Asc)
        .since_version(40)
        .occurred_after(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

    let service = ActivityService::new(transport_for(&mock_server), 10);
    let activity = service.iterate(99, &query).await.unwrap().all().await.unwrap();

    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].project_version, 41);
}

#[tokio::test]
async fn test_activity_list_with_explicit_window() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/activity"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "4"))
        .and(query_param("sort_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"guid": "99_5", "project_version": 5},
            {"guid": "99_4", "project_version": 4}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = ActivityQuery::new()
        .sort_order(SortOrder::Desc)
        .limit(2)
        .offset(4);
    assert!(query.is_windowed());

    let service = ActivityService::new(transport_for(&mock_server), 10);
    let activity = service.list(99, &query).await.unwrap();

    assert_eq!(activity[1].guid, "99_4");
}

#[tokio::test]
async fn test_projects_me_and_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 99, "name": "Tracker"}])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99, "name": "Tracker"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "username": "ada"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/search"))
        .and(query_param("query", "label:\"needs review\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stories": {"stories": [{"id": 3, "name": "c"}], "total_hits": 1}
        })))
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);

    let projects = ProjectService::new(transport.clone()).list().await.unwrap();
    assert_eq!(projects[0].name, "Tracker");
    assert_eq!(ProjectService::new(transport.clone()).get(99).await.unwrap().id, 99);
    assert_eq!(MeService::new(transport.clone()).get().await.unwrap().username, "ada");

    let found = SearchService::new(transport)
        .search(99, "label:\"needs review\"")
        .await
        .unwrap();
    assert_eq!(found.stories.total_hits, 1);
}

#[tokio::test]
async fn test_account_and_account_memberships() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/accounts/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "name": "Acme", "plan": "Free", "status": "active", "kind": "account"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/accounts/12/memberships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 40, "owner": true, "person": {"id": 7, "name": "Ada", "username": "ada"}},
            {"id": 41, "admin": true, "person": {"id": 8, "name": "Bob", "username": "bob"}}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let accounts = AccountService::new(transport_for(&mock_server));
    assert_eq!(accounts.get(12).await.unwrap().name, "Acme");

    let memberships = accounts.memberships(12);
    assert_eq!(memberships.account_id(), 12);
    let members = memberships.list().await.unwrap();
    assert_eq!(
        members.iter().map(|m| m.person.username.as_str()).collect::<Vec<_>>(),
        vec!["ada", "bob"]
    );
    assert!(members[0].owner);
    assert!(!members[0].admin);
}

#[tokio::test]
async fn test_project_memberships_reject_zero_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/memberships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "project_id": 99, "role": "owner", "person": {"id": 7}},
            {"project_id": 99, "role": "member"}
        ])))
        .mount(&mock_server)
        .await;

    let err = MembershipService::new(transport_for(&mock_server))
        .list(99)
        .await
        .unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn test_iterations_get_and_scoped_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/iterations/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 3,
            "project_id": 99,
            "length": 1,
            "story_ids": [1, 2],
            "start": "2024-03-04T00:00:00Z",
            "finish": "2024-03-11T00:00:00Z"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/iterations"))
        .and(query_param("scope", "done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"number": 1, "project_id": 99},
            {"number": 2, "project_id": 99}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let iterations = IterationService::new(transport_for(&mock_server));

    let third = iterations.get(99, 3).await.unwrap();
    assert_eq!(third.story_ids, vec![1, 2]);
    assert_eq!(
        third.start.unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
    );

    let done = iterations.list(99, Some("done")).await.unwrap();
    assert_eq!(done.iter().map(|i| i.number).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_epics_list_and_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/epics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 70, "project_id": 99, "name": "Billing",
             "label": {"id": 3, "project_id": 99, "name": "billing"}}
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/v5/projects/99/epics/70"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 70, "project_id": 99, "name": "Billing"
        })))
        .mount(&mock_server)
        .await;

    let epics = EpicService::new(transport_for(&mock_server));

    let listed = epics.list(99).await.unwrap();
    assert_eq!(listed[0].label.as_ref().unwrap().name, "billing");
    assert_eq!(epics.get(99, 70).await.unwrap().name, "Billing");
}
