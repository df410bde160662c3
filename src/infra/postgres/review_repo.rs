use {
    crate::domain::admin::{Review, ReviewDraft, ReviewStatus},
    crate::domain::error::PipelineError,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    product_id: Option<String>,
    customer_name: String,
    customer_email: Option<String>,
    rating: i32,
    title: Option<String>,
    body: Option<String>,
    is_verified_buyer: bool,
    status: String,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = PipelineError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: row.id,
            product_id: row.product_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            rating: row.rating,
            title: row.title,
            body: row.body,
            is_verified_buyer: row.is_verified_buyer,
            status: ReviewStatus::try_from(row.status.as_str())?,
            submitted_at: row.submitted_at,
        })
    }
}

const COLUMNS: &str = "id, product_id, customer_name, customer_email, rating, title, body, \
                       is_verified_buyer, status, submitted_at";

pub async fn list_reviews(
    pool: &PgPool,
    product_id: Option<&str>,
    status: Option<ReviewStatus>,
) -> Result<Vec<Review>, PipelineError> {
    let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM reviews
        WHERE ($1::text IS NULL OR product_id = $1)
          AND ($2::text IS NULL OR status = $2)
        ORDER BY submitted_at DESC
        "#,
    ))
    .bind(product_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Review::try_from).collect()
}

pub async fn insert_review(pool: &PgPool, draft: &ReviewDraft) -> Result<Review, PipelineError> {
    let row: ReviewRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO reviews
            (id, product_id, customer_name, customer_email, rating, title,
             body, is_verified_buyer, status, submitted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(Uuid::now_v7())
    .bind(draft.product_id.as_deref())
    .bind(draft.customer_name.trim())
    .bind(draft.customer_email.as_deref())
    .bind(draft.rating)
    .bind(draft.title.as_deref())
    .bind(draft.body.as_deref())
    .bind(draft.is_verified_buyer)
    .bind(ReviewStatus::Pending.as_str())
    .bind(draft.submitted_at.unwrap_or_else(Utc::now))
    .fetch_one(pool)
    .await?;

    Review::try_from(row)
}

/// Moderation: flip the status of an existing review.
pub async fn set_review_status(
    pool: &PgPool,
    id: Uuid,
    status: ReviewStatus,
) -> Result<Option<Review>, PipelineError> {
    let row: Option<ReviewRow> = sqlx::query_as(&format!(
        "UPDATE reviews SET status = $1 WHERE id = $2 RETURNING {COLUMNS}",
    ))
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Review::try_from).transpose()
}

pub async fn delete_review(pool: &PgPool, id: Uuid) -> Result<bool, PipelineError> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
