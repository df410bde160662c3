use {
    crate::domain::error::PipelineError,
    crate::domain::subscription::{NewSubscription, SubscriptionStatus},
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

/// Insert a subscription row, deduplicated on the provider id. Returns the
/// row id either way so the order back-link always resolves.
pub async fn insert_subscription(
    pool: &PgPool,
    sub: &NewSubscription,
) -> Result<Uuid, PipelineError> {
    let inserted: Option<Uuid> = sqlx::query_scalar(
        r#"
        INSERT INTO subscriptions
            (id, external_id, status, billing_interval, next_billing_at,
             shipping_name, shipping_line1, shipping_line2, shipping_city,
             shipping_state, shipping_postal_code, shipping_country)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (external_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(sub.id())
    .bind(sub.external_id().as_str())
    .bind(sub.status().as_str())
    .bind(sub.interval().as_str())
    .bind(sub.next_billing_at())
    .bind(sub.shipping().name.as_deref())
    .bind(sub.shipping().line1.as_deref())
    .bind(sub.shipping().line2.as_deref())
    .bind(sub.shipping().city.as_deref())
    .bind(sub.shipping().state.as_deref())
    .bind(sub.shipping().postal_code.as_deref())
    .bind(sub.shipping().country.as_deref())
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(id) => Ok(id),
        None => {
            let existing: Uuid =
                sqlx::query_scalar("SELECT id FROM subscriptions WHERE external_id = $1")
                    .bind(sub.external_id().as_str())
                    .fetch_one(pool)
                    .await?;
            Ok(existing)
        }
    }
}

/// Mirror a provider-side lifecycle change. Returns false when we never saw
/// this subscription (e.g. created outside the storefront).
pub async fn mirror_status(
    pool: &PgPool,
    external_id: &str,
    status: SubscriptionStatus,
    next_billing_at: Option<DateTime<Utc>>,
) -> Result<bool, PipelineError> {
    let result = sqlx::query(
        r#"
        UPDATE subscriptions
        SET status = $1,
            next_billing_at = COALESCE($2, next_billing_at),
            updated_at = now()
        WHERE external_id = $3
        "#,
    )
    .bind(status.as_str())
    .bind(next_billing_at)
    .bind(external_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
