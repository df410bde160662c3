mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use order_desk::AppState;
use std::sync::Arc;
use tower::ServiceExt;

const DB: &str = "order_desk_test_webhook";

fn make_state(pool: sqlx::PgPool, secret: Option<&str>) -> AppState {
    AppState {
        pool,
        webhook_secret: secret.map(Into::into),
        provider: Arc::new(FakeProvider {
            items: vec![],
            subscription: None,
        }),
        mailer: Arc::new(RecordingMailer::default()),
        org: Arc::new(test_org()),
    }
}

fn webhook_request(signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/stripe")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("Stripe-Signature", sig);
    }
    builder
        .body(Body::from(r#"{"id":"evt_test_1","type":"checkout.session.completed"}"#))
        .unwrap()
}

// ── missing signature → 400, zero writes ───────────────────────────────────

#[tokio::test]
async fn missing_signature_is_rejected() {
    let pool = setup_pool(DB).await;
    let app = order_desk::router(make_state(pool.clone(), Some("whsec_test")));

    let response = app.oneshot(webhook_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_all_orders(&pool).await, 0);
}

// ── invalid signature → 400, zero writes ───────────────────────────────────

#[tokio::test]
async fn invalid_signature_is_rejected() {
    let pool = setup_pool(DB).await;
    let app = order_desk::router(make_state(pool.clone(), Some("whsec_test")));

    let response = app
        .oneshot(webhook_request(Some("t=12345,v1=deadbeef")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_all_orders(&pool).await, 0);
}

// ── secret not configured → 500 ────────────────────────────────────────────

#[tokio::test]
async fn missing_secret_is_server_error() {
    let pool = setup_pool(DB).await;
    let app = order_desk::router(make_state(pool.clone(), None));

    let response = app
        .oneshot(webhook_request(Some("t=12345,v1=deadbeef")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(count_all_orders(&pool).await, 0);
}

// ── email endpoint contract ────────────────────────────────────────────────

fn email_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/emails/send")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn email_send_requires_order_id_and_type() {
    let pool = setup_pool(DB).await;
    let app = order_desk::router(make_state(pool, Some("whsec_test")));

    let response = app.oneshot(email_request("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn email_send_unknown_order_is_404() {
    let pool = setup_pool(DB).await;
    let app = order_desk::router(make_state(pool, Some("whsec_test")));

    let body = format!(
        r#"{{"orderId":"{}","emailType":"cancellation"}}"#,
        uuid::Uuid::now_v7()
    );
    let response = app.oneshot(email_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_send_shipping_requires_tracking_number() {
    let pool = setup_pool(DB).await;

    // Seed an order through the pipeline so the endpoint has one to find.
    let provider = FakeProvider {
        items: vec![line_item(None, "Honey Jar", 1, 1500)],
        subscription: None,
    };
    let mailer = RecordingMailer::default();
    let outcome = order_desk::services::order_pipeline::ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &test_org(),
        make_checkout(
            "cs_ship_endpoint_1",
            order_desk::domain::checkout::CheckoutMode::Payment,
        ),
    )
    .await
    .unwrap();

    let app = order_desk::router(make_state(pool, Some("whsec_test")));
    let body = format!(
        r#"{{"orderId":"{}","emailType":"shipping"}}"#,
        outcome.order_id()
    );
    let response = app.oneshot(email_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
