use {
    crate::domain::error::PipelineError,
    crate::domain::subscription::SubscriptionStatus,
    crate::infra::postgres::subscription_repo,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
};

/// Mirror a provider-side subscription lifecycle event onto our row.
/// Subscriptions created outside the storefront (no local row) are logged
/// and acknowledged; the provider must not keep retrying them.
pub async fn mirror_subscription(
    pool: &PgPool,
    external_id: &str,
    status: SubscriptionStatus,
    next_billing_at: Option<DateTime<Utc>>,
) -> Result<(), PipelineError> {
    let updated = subscription_repo::mirror_status(pool, external_id, status, next_billing_at).await?;

    if updated {
        tracing::info!(subscription = external_id, status = %status, "subscription mirrored");
    } else {
        tracing::warn!(
            subscription = external_id,
            status = %status,
            "subscription event for unknown subscription, ignored"
        );
    }
    Ok(())
}
