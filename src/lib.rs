pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    crate::config::OrgProfile,
    crate::domain::{checkout::CheckoutProvider, outbound::Mailer},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post, put},
    },
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub webhook_secret: Option<Arc<str>>,
    pub provider: Arc<dyn CheckoutProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub org: Arc<OrgProfile>,
}

pub fn router(state: AppState) -> Router {
    use crate::adapters::http::{coupons, emails, events, reviews};
    use crate::adapters::stripe::webhook;

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/webhooks/stripe", post(webhook::stripe_webhook_handler))
        .route("/emails/send", post(emails::send_order_email))
        .route(
            "/admin/coupons",
            get(coupons::list_coupons).post(coupons::create_coupon),
        )
        .route(
            "/admin/coupons/{id}",
            get(coupons::get_coupon)
                .put(coupons::update_coupon)
                .delete(coupons::delete_coupon),
        )
        .route(
            "/admin/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/admin/events/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        .route(
            "/admin/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/admin/reviews/{id}",
            put(reviews::moderate_review).delete(reviews::delete_review),
        )
        .route("/admin/reviews/import", post(reviews::import_reviews))
        .layer(DefaultBodyLimit::max(256 * 1024)) // Stripe events and CSV uploads stay small
        .with_state(state)
}
