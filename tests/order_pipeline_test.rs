mod common;

use common::*;
use order_desk::domain::checkout::CheckoutMode;
use order_desk::domain::subscription::{BillingInterval, SubscriptionStatus};
use order_desk::services::emails::TAX_DEDUCTIBLE_NOTICE;
use order_desk::services::order_pipeline::{IngestOutcome, ingest_checkout};
use order_desk::services::subscription_sync::mirror_subscription;

const DB: &str = "order_desk_test_pipeline";

// ── 1. creates_order_with_items ────────────────────────────────────────────
// $10.00×1 + $5.00×2 = $20.00 subtotal, $3.00 shipping, $2.00 discount
// → total $21.00 and two item rows with matching prices.

#[tokio::test]
async fn creates_order_with_items() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![
            line_item(None, "Beeswax Candle", 1, 1000),
            line_item(None, "Apple Butter", 2, 500),
        ],
        subscription: None,
    };
    let mailer = RecordingMailer::default();

    let outcome = ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &test_org(),
        make_checkout("cs_create_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();
    assert!(matches!(outcome, IngestOutcome::Created(_)));

    let row = get_order(&pool, "cs_create_1").await.unwrap();
    assert_eq!(row.status, "processing");
    assert_eq!(row.payment_status, "paid");
    assert_eq!(row.subtotal_cents, 2000);
    assert_eq!(row.shipping_cents, 300);
    assert_eq!(row.discount_cents, 200);
    assert_eq!(row.total_cents, 2100);
    assert_eq!(row.currency, "usd");

    let items = get_items(&pool, row.id).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Apple Butter");
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price_cents, 500);
    assert_eq!(items[0].total_cents, 1000);
    assert_eq!(items[1].title, "Beeswax Candle");
    assert_eq!(items[1].unit_price_cents, 1000);
}

// ── 2. total_matches_items_plus_shipping_minus_discount ────────────────────

#[tokio::test]
async fn total_matches_items_plus_shipping_minus_discount() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![
            line_item(None, "Jam Trio", 3, 799),
            line_item(None, "Tote Bag", 1, 1250),
        ],
        subscription: None,
    };
    let mailer = RecordingMailer::default();

    ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &test_org(),
        make_checkout("cs_invariant_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();

    let row = get_order(&pool, "cs_invariant_1").await.unwrap();
    let items = get_items(&pool, row.id).await;
    let item_sum: i64 = items.iter().map(|i| i.total_cents).sum();
    assert_eq!(row.total_cents, item_sum + row.shipping_cents - row.discount_cents);
}

// ── 3. duplicate_session_creates_single_order ──────────────────────────────

#[tokio::test]
async fn duplicate_session_creates_single_order() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Honey Jar", 1, 1500)],
        subscription: None,
    };
    let mailer = RecordingMailer::default();
    let org = test_org();

    let first = ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &org,
        make_checkout("cs_dup_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();
    assert!(matches!(first, IngestOutcome::Created(_)));

    // Redelivered webhook: a fresh summary for the same session.
    let second = ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &org,
        make_checkout("cs_dup_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();
    assert!(matches!(second, IngestOutcome::AlreadyProcessed(_)));
    assert_eq!(first.order_id(), second.order_id());

    assert_eq!(count_orders(&pool, "cs_dup_1").await, 1);
    // No second confirmation email either.
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

// ── 4. inventory_decrement_applies ─────────────────────────────────────────

#[tokio::test]
async fn inventory_decrement_applies() {
    let pool = setup_pool(DB).await;
    seed_product(&pool, "prod_candle", "Beeswax Candle", 10).await;
    let provider = FakeProvider {
        items: vec![line_item(Some("prod_candle"), "Beeswax Candle", 3, 1000)],
        subscription: None,
    };
    let mailer = RecordingMailer::default();

    ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &test_org(),
        make_checkout("cs_inv_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();

    assert_eq!(inventory_of(&pool, "prod_candle").await, Some(7));
}

// ── 5. inventory_miss_never_blocks_order ───────────────────────────────────
// Item references a product the catalog has never heard of.

#[tokio::test]
async fn inventory_miss_never_blocks_order() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(Some("prod_ghost"), "Phantom Item", 1, 900)],
        subscription: None,
    };
    let mailer = RecordingMailer::default();

    let outcome = ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &test_org(),
        make_checkout("cs_inv_miss_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();

    assert!(matches!(outcome, IngestOutcome::Created(_)));
    assert_eq!(count_orders(&pool, "cs_inv_miss_1").await, 1);
}

// ── 6. mailer_failure_never_blocks_order ───────────────────────────────────

#[tokio::test]
async fn mailer_failure_never_blocks_order() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Honey Jar", 1, 1500)],
        subscription: None,
    };

    let outcome = ingest_checkout(
        &pool,
        &provider,
        &FailingMailer,
        &test_org(),
        make_checkout("cs_mail_fail_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();

    assert!(matches!(outcome, IngestOutcome::Created(_)));
    assert_eq!(count_orders(&pool, "cs_mail_fail_1").await, 1);
}

// ── 7. confirmation_email_rendered_and_sent ────────────────────────────────

#[tokio::test]
async fn confirmation_email_rendered_and_sent() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Beeswax Candle", 1, 1000)],
        subscription: None,
    };
    let mailer = RecordingMailer::default();

    ingest_checkout(
        &pool,
        &provider,
        &mailer,
        &test_org(),
        make_checkout("cs_email_1", CheckoutMode::Payment),
    )
    .await
    .unwrap();

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "avery@example.com");
    assert!(sent[0].subject.contains("Harvest Goods"));
    assert!(sent[0].html.contains("Beeswax Candle"));
    assert!(sent[0].html.contains(TAX_DEDUCTIBLE_NOTICE));
    assert!(sent[0].html.contains("12-3456789"));
}

// ── 8. missing_email_skips_confirmation ────────────────────────────────────

#[tokio::test]
async fn missing_email_skips_confirmation() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Honey Jar", 1, 1500)],
        subscription: None,
    };
    let mailer = RecordingMailer::default();

    let mut checkout = make_checkout("cs_no_email_1", CheckoutMode::Payment);
    checkout.contact.email = None;

    let outcome = ingest_checkout(&pool, &provider, &mailer, &test_org(), checkout)
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Created(_)));
    assert!(mailer.sent.lock().unwrap().is_empty());
}

// ── 9. subscription_mode_records_subscription ──────────────────────────────

#[tokio::test]
async fn subscription_mode_records_subscription() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Veggie Box", 1, 3500)],
        subscription: Some(make_subscription("sub_box_1", BillingInterval::EveryTwoWeeks)),
    };
    let mailer = RecordingMailer::default();

    let mut checkout = make_checkout("cs_sub_1", CheckoutMode::Subscription);
    checkout.subscription_ref =
        Some(order_desk::domain::id::SubscriptionRef::new("sub_box_1").unwrap());

    ingest_checkout(&pool, &provider, &mailer, &test_org(), checkout)
        .await
        .unwrap();

    let (status, interval) = get_subscription(&pool, "sub_box_1").await.unwrap();
    assert_eq!(status, "active");
    assert_eq!(interval, "every-2-weeks");

    let order = get_order(&pool, "cs_sub_1").await.unwrap();
    assert!(order.subscription_id.is_some());
}

// ── 10. subscription_fetch_failure_is_fatal ────────────────────────────────
// The provider fetch for a subscription-mode session must bubble out so the
// delivery gets retried.

#[tokio::test]
async fn subscription_fetch_failure_is_fatal() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Veggie Box", 1, 3500)],
        subscription: None, // fake errors on fetch
    };
    let mailer = RecordingMailer::default();

    let mut checkout = make_checkout("cs_sub_fail_1", CheckoutMode::Subscription);
    checkout.subscription_ref =
        Some(order_desk::domain::id::SubscriptionRef::new("sub_missing").unwrap());

    let result = ingest_checkout(&pool, &provider, &mailer, &test_org(), checkout).await;
    assert!(result.is_err());
}

// ── 11. lifecycle_events_mirror_status ─────────────────────────────────────

#[tokio::test]
async fn lifecycle_events_mirror_status() {
    let pool = setup_pool(DB).await;
    let provider = FakeProvider {
        items: vec![line_item(None, "Veggie Box", 1, 3500)],
        subscription: Some(make_subscription("sub_mirror_1", BillingInterval::Monthly)),
    };
    let mailer = RecordingMailer::default();

    let mut checkout = make_checkout("cs_mirror_1", CheckoutMode::Subscription);
    checkout.subscription_ref =
        Some(order_desk::domain::id::SubscriptionRef::new("sub_mirror_1").unwrap());
    ingest_checkout(&pool, &provider, &mailer, &test_org(), checkout)
        .await
        .unwrap();

    mirror_subscription(&pool, "sub_mirror_1", SubscriptionStatus::PastDue, None)
        .await
        .unwrap();
    let (status, _) = get_subscription(&pool, "sub_mirror_1").await.unwrap();
    assert_eq!(status, "past_due");

    mirror_subscription(&pool, "sub_mirror_1", SubscriptionStatus::Cancelled, None)
        .await
        .unwrap();
    let (status, _) = get_subscription(&pool, "sub_mirror_1").await.unwrap();
    assert_eq!(status, "cancelled");

    // Unknown subscriptions are acknowledged, not errors.
    mirror_subscription(&pool, "sub_unknown_1", SubscriptionStatus::Cancelled, None)
        .await
        .unwrap();
}
