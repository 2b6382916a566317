mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use townsquare::resources::events::{self, CtaBadge, EventSearch, EventStatus};
use townsquare::resources::meetings::{self, MeetingSearch};
use townsquare::resources::questions::{self, QuestionCategory};
use townsquare::resources::{answers, categories, towns, users, ALL_FILTER};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{api_with_token, ok};

fn page(content: serde_json::Value, last: bool) -> serde_json::Value {
    ok(json!({
        "content": content,
        "number": 0,
        "size": 6,
        "totalElements": 1,
        "totalPages": 1,
        "last": last
    }))
}

#[tokio::test]
async fn meeting_list_skips_all_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meetings"))
        .and(query_param("page", "0"))
        .and(query_param("size", "6"))
        .and(query_param("city", "Mapo-gu"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{
                "meetingId": 4, "title": "Book club", "status": "RECRUITING",
                "capacity": 10, "memberCount": 3
            }]),
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    let search = MeetingSearch::builder()
        .category(ALL_FILTER)
        .city("Mapo-gu")
        .build();
    let page = meetings::list(&api, &search).await.expect("list");

    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].title, "Book club");
    assert!(page.last);
}

#[tokio::test]
async fn meeting_join_sends_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/meetings/4/join"))
        .and(body_json(json!({ "message": "count me in" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    meetings::join(&api, 4, "count me in").await.expect("join");
}

#[tokio::test]
async fn meeting_join_request_management_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meetings/4/manage/join-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{
            "requestId": 2, "userId": 9, "userName": "kim", "message": "hi",
            "requestedAt": "2025-02-01T12:00:00"
        }]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/meetings/4/manage/join-requests/2/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/meetings/4/manage/members/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    let requests = meetings::join_requests(&api, 4).await.expect("requests");
    assert_eq!(requests[0].user_name.as_deref(), Some("kim"));
    meetings::approve_join_request(&api, 4, requests[0].request_id)
        .await
        .expect("approve");
    meetings::remove_member(&api, 4, 9).await.expect("remove");
}

#[tokio::test]
async fn flash_events_use_small_pages_and_cta_reflects_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/flash"))
        .and(query_param("size", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{
                "eventId": 1, "title": "Picnic", "status": "CANCELED",
                "capacity": 5, "memberCount": 1
            }]),
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    let page = events::flash(&api, &EventSearch::default()).await.expect("flash");
    let event = &page.content[0];
    assert_eq!(event.status, EventStatus::Canceled);
    assert_eq!(event.cta().badge, Some(CtaBadge::Canceled));
}

#[tokio::test]
async fn event_join_and_cancel_hit_event_scoped_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/8/join-requests"))
        .and(body_json(json!({ "message": "see you" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/8/join-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    events::request_join(&api, 8, "see you").await.expect("join");
    events::cancel_join_request(&api, 8).await.expect("cancel");
}

#[tokio::test]
async fn question_view_returns_refreshed_question() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/questions/5/views"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 5, "title": "Clinic open Sunday?", "category": "HOSPITAL", "views": 12
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    let question = questions::record_view(&api, 5).await.expect("views");
    assert_eq!(question.views, 12);
    assert_eq!(question.category, Some(QuestionCategory::Hospital));
}

#[tokio::test]
async fn answer_accept_and_unaccept_use_patch() {
    let server = MockServer::start().await;
    for action in ["accept", "unaccept"] {
        Mock::given(method("PATCH"))
            .and(path(format!("/api/answers/3/{action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = api_with_token(&server, "tok");
    answers::accept(&api, 3).await.expect("accept");
    answers::unaccept(&api, 3).await.expect("unaccept");
}

#[tokio::test]
async fn answers_list_treats_null_data_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/2/answers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    assert!(answers::list(&api, 2).await.expect("list").is_empty());
}

#[tokio::test]
async fn categories_accept_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["맛집", "교통"])))
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    assert_eq!(categories::list(&api).await.unwrap(), vec!["맛집", "교통"]);
}

#[tokio::test]
async fn my_meetings_pass_cursor_and_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/meetings"))
        .and(query_param("cursor", "40"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "items": [{ "meetingId": 39, "title": "Run club", "participantCount": 4, "capacity": 8 }],
            "nextCursor": null,
            "hasNext": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    let page = users::my_meetings(&api, Some(40)).await.expect("my meetings");
    assert_eq!(page.items[0].meeting_id, 39);
    assert!(!page.has_next);
}

#[tokio::test]
async fn town_dashboard_and_location_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/towns/11/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "stats": { "activeMeetings": 2, "upcomingEvents": 0, "totalQuestions": 5, "activeUsers": 9 },
            "popularMeetings": [{ "id": 1, "name": "Hiking", "category": "SPORTS", "members": 5, "maxMembers": 10 }],
            "upcomingEvents": [],
            "latestQuestions": []
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/locations"))
        .and(query_param("keyword", "Mapo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            { "id": 11, "province": "Seoul", "city": "Mapo-gu", "town": null }
        ]))))
        .mount(&server)
        .await;

    let api = api_with_token(&server, "tok");
    let dashboard = towns::dashboard(&api, 11).await.expect("dashboard");
    assert_eq!(dashboard.stats.active_users, 9);
    assert_eq!(dashboard.popular_meetings[0].max_members, 10);

    let found = towns::search_locations(&api, " Mapo ").await.expect("search");
    assert_eq!(towns::Town::from(found[0].clone()).city, "Mapo-gu");
}
