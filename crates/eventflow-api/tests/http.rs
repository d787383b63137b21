//! End-to-end HTTP tests against the in-memory store.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use tower::ServiceExt;

use eventflow_api::{AppState, build_router};
use eventflow_core::config::{CorsConfig, WorkflowConfig};
use eventflow_core::types::{EventId, UserId};
use eventflow_database::{MemoryStore, Storage};
use eventflow_entity::event::{EventRecord, EventStatus};
use eventflow_entity::user::{ActorRole, UserSummary};

struct TestApp {
    router: Router,
    organiser: UserId,
    admin: UserId,
    event: EventId,
}

fn user(name: &str, role: ActorRole) -> UserSummary {
    UserSummary {
        id: UserId::new(),
        display_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role,
        is_active: true,
    }
}

async fn app() -> TestApp {
    let store = MemoryStore::new();
    let organiser = user("Olive", ActorRole::Organiser);
    let admin = user("Ada", ActorRole::Admin);
    store.insert_user(organiser.clone()).await;
    store.insert_user(admin.clone()).await;

    let now = Utc::now();
    let event = EventRecord {
        id: EventId::new(),
        organiser_id: organiser.id,
        name: "Lakeside 10K".to_string(),
        status: EventStatus::Draft,
        created_at: now,
        updated_at: now,
    };
    store.insert_event(event.clone()).await;

    let state = AppState::new(
        Storage::memory(store),
        &WorkflowConfig::default(),
        CorsConfig::default(),
    );

    TestApp {
        router: build_router(state),
        organiser: organiser.id,
        admin: admin.id,
        event: event.id,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        as_user: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = as_user {
            builder = builder.header("x-user-id", user_id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_health_reports_storage() {
    let app = app().await;
    let (status, body) = app.call(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["storage"], "connected");
}

#[tokio::test]
async fn test_requests_without_identity_are_rejected() {
    let app = app().await;
    let (status, body) = app
        .call(Method::GET, "/api/notifications", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHENTICATED");

    let (status, _) = app
        .call(Method::GET, "/api/notifications", Some(UserId::new()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_then_approve_flow() {
    let app = app().await;
    let submit = format!("/api/events/{}/submit", app.event);
    let approve = format!("/api/events/{}/approve", app.event);

    let (status, body) = app
        .call(Method::POST, &approve, Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "INVALID_TRANSITION");

    let (status, body) = app
        .call(Method::POST, &submit, Some(app.organiser), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending_approval");
    assert_eq!(
        body["data"]["audit_entry"]["action_type"],
        "submitted_for_approval"
    );

    let (_, body) = app
        .call(
            Method::GET,
            "/api/notifications/unread-count",
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(body["data"]["count"], 1);

    let (status, body) = app
        .call(Method::POST, &approve, Some(app.organiser), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .call(Method::POST, &approve, Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "published");

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/events/{}/audit-trail", app.event),
            Some(app.organiser),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action_type"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["submitted_for_approval", "published"]);
    assert_eq!(body["data"][0]["performer_name"], "Olive");
}

#[tokio::test]
async fn test_reject_body_is_validated() {
    let app = app().await;
    app.call(
        Method::POST,
        &format!("/api/events/{}/submit", app.event),
        Some(app.organiser),
        None,
    )
    .await;

    let reject = format!("/api/events/{}/reject", app.event);
    let (status, body) = app
        .call(Method::POST, &reject, Some(app.admin), Some(json!({ "reason": "" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .call(
            Method::POST,
            &reject,
            Some(app.admin),
            Some(json!({ "reason": "Route crosses a motorway" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(
        body["data"]["audit_entry"]["metadata"]["reason"],
        "Route crosses a motorway"
    );
}

#[tokio::test]
async fn test_change_request_keeps_event_pending() {
    let app = app().await;
    app.call(
        Method::POST,
        &format!("/api/events/{}/submit", app.event),
        Some(app.organiser),
        None,
    )
    .await;

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/events/{}/change-requests", app.event),
            Some(app.organiser),
            Some(json!({ "text": "fix date" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["action_type"], "change_requested");
    assert_eq!(body["data"]["message"], "fix date");

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/events/{}/approve", app.event),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_message_thread_and_inbox() {
    let app = app().await;

    let (status, m1) = app
        .call(
            Method::POST,
            "/api/messages",
            Some(app.organiser),
            Some(json!({
                "recipient_id": app.admin,
                "subject": "Timing chips",
                "body": "Do we need our own?",
                "event_id": app.event,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let m1_id = m1["data"]["id"].as_str().unwrap().to_string();

    let (status, m2) = app
        .call(
            Method::POST,
            "/api/messages",
            Some(app.admin),
            Some(json!({
                "recipient_id": app.organiser,
                "subject": "Re: Timing chips",
                "body": "No, we provide them.",
                "parent_message_id": m1_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(m2["data"]["event_id"], json!(app.event));

    let (status, thread) = app
        .call(
            Method::GET,
            &format!("/api/messages/{m1_id}/thread"),
            Some(app.organiser),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(thread["data"]["messages"].as_array().unwrap().len(), 2);
    assert_eq!(thread["data"]["messages"][1]["depth"], 1);
    assert_eq!(thread["data"]["truncated"], false);

    let (_, count) = app
        .call(
            Method::GET,
            "/api/messages/unread-count",
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(count["data"]["count"], 1);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/messages/{m1_id}/read"),
            Some(app.organiser),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/messages/{m1_id}/read"),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app
        .call(Method::GET, "/api/messages?limit=1", Some(app.admin), None)
        .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_all_notifications_read() {
    let app = app().await;
    app.call(
        Method::POST,
        "/api/messages",
        Some(app.organiser),
        Some(json!({
            "recipient_id": app.admin,
            "subject": "Hello",
            "body": "First",
        })),
    )
    .await;
    app.call(
        Method::POST,
        "/api/messages",
        Some(app.organiser),
        Some(json!({
            "recipient_id": app.admin,
            "subject": "Hello again",
            "body": "Second",
        })),
    )
    .await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/notifications/read-all",
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["marked"], 2);

    let (_, body) = app
        .call(
            Method::GET,
            "/api/notifications/unread-count",
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(body["data"]["count"], 0);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/notifications/{}/read", UserId::new()),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
