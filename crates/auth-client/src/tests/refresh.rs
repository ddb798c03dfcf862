//! The 401 refresh-and-retry cycle.

use super::harness::{context, sample_user};
use crate::RequestOptions;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn refresh_success_retries_with_new_token() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    ctx.api.respond(401, r#"{"detail": "Token expired"}"#);
    ctx.api.respond(200, r#"{"access_token": "A2"}"#);
    ctx.api.respond(200, r#"{"students": []}"#);

    let response = ctx.client.get("/api/student/batch/5").await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["students"], serde_json::json!([]));

    let requests = ctx.api.requests();
    assert_eq!(requests.len(), 3);

    // Primary request with the stale token
    assert_eq!(requests[0].path, "/api/student/batch/5");
    assert_eq!(requests[0].authorization(), Some("Bearer A1"));

    // Refresh call carries the refresh token as a JSON body, no bearer
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/api/auth/refresh");
    assert_eq!(requests[1].authorization(), None);
    assert_eq!(requests[1].body_json()["refresh_token"], "R1");

    // Retried original request with the fresh token
    assert_eq!(requests[2].path, "/api/student/batch/5");
    assert_eq!(requests[2].authorization(), Some("Bearer A2"));

    // The new token was persisted
    assert_eq!(ctx.store.get_access_token().unwrap(), Some("A2".to_string()));
}

#[tokio::test]
async fn forged_authorization_never_survives_the_retry() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    ctx.api.respond(401, r#"{"detail": "Token expired"}"#);
    ctx.api.respond(200, r#"{"access_token": "A2"}"#);
    ctx.api.respond(200, "{}");

    let options = RequestOptions::new().header(
        AUTHORIZATION,
        HeaderValue::from_static("Bearer forged-token"),
    );
    let response = ctx
        .client
        .fetch(Method::GET, "/api/batch", options)
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let requests = ctx.api.requests();
    assert_eq!(requests.len(), 3);

    // The stored token wins on the primary request and again on the retry
    assert_eq!(requests[0].authorization(), Some("Bearer A1"));
    assert_eq!(requests[2].authorization(), Some("Bearer A2"));
}

#[tokio::test]
async fn refresh_failure_clears_session_and_returns_401() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    ctx.events.set_on_unauthorized(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    ctx.api.respond(401, r#"{"detail": "Token expired"}"#);
    ctx.api.respond(400, r#"{"detail": "Refresh token revoked"}"#);

    let response = ctx.client.get("/api/batch").await.unwrap();

    // The caller gets the original 401 back, not an error
    assert_eq!(response.status(), 401);
    assert_eq!(ctx.api.request_count(), 2);

    // Storage fully cleared, hub fired exactly once
    assert_eq!(ctx.store.get_access_token().unwrap(), None);
    assert_eq!(ctx.store.get_refresh_token().unwrap(), None);
    assert_eq!(ctx.store.get_user().unwrap(), None);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refresh_endpoint_401_does_not_recurse() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    ctx.api.respond(401, "{}");
    ctx.api.respond(401, "{}");

    let response = ctx.client.get("/api/batch").await.unwrap();
    assert_eq!(response.status(), 401);

    // Exactly two requests: the primary and one refresh, nothing more
    assert_eq!(ctx.api.request_count(), 2);
}

#[tokio::test]
async fn retried_request_is_returned_whatever_its_status() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    ctx.api.respond(401, "{}");
    ctx.api.respond(200, r#"{"access_token": "A2"}"#);
    ctx.api.respond(401, "{}");

    let response = ctx.client.get("/api/batch").await.unwrap();

    // The 401 from the retry comes back as-is; no second refresh
    assert_eq!(response.status(), 401);
    assert_eq!(ctx.api.request_count(), 3);
}

#[tokio::test]
async fn missing_refresh_token_skips_the_network() {
    let ctx = context().await;
    ctx.store.set_access_token("A1").unwrap();
    ctx.store.set_user(&sample_user()).unwrap();

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    ctx.events.set_on_unauthorized(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    ctx.api.respond(401, "{}");

    let response = ctx.client.get("/api/batch").await.unwrap();
    assert_eq!(response.status(), 401);

    // No request ever reached the refresh endpoint
    assert_eq!(ctx.api.request_count(), 1);

    // The failure path still runs in full
    assert_eq!(ctx.store.get_access_token().unwrap(), None);
    assert_eq!(ctx.store.get_user().unwrap(), None);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unexpected_refresh_body_is_a_refresh_failure() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    ctx.events.set_on_unauthorized(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    ctx.api.respond(401, "{}");
    // 2xx but no access_token field; must not produce an empty token
    ctx.api.respond(200, r#"{"accessToken": "A2"}"#);

    let response = ctx.client.get("/api/batch").await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(ctx.api.request_count(), 2);
    assert_eq!(ctx.store.get_access_token().unwrap(), None);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_401_responses_pass_through_untouched() {
    let ctx = context().await;
    ctx.store.set_session("A1", "R1", &sample_user()).unwrap();

    ctx.api.respond(404, r#"{"detail": "No such batch"}"#);

    let response = ctx.client.get("/api/batch/999").await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(ctx.api.request_count(), 1);

    // Session untouched
    assert_eq!(ctx.store.get_access_token().unwrap(), Some("A1".to_string()));
}
