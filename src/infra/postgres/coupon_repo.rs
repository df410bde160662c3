use {
    crate::domain::admin::{Coupon, CouponDraft, CouponKind},
    crate::domain::error::PipelineError,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: Uuid,
    code: String,
    kind: String,
    value: i64,
    active: bool,
    starts_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = PipelineError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        Ok(Coupon {
            id: row.id,
            code: row.code,
            kind: CouponKind::try_from(row.kind.as_str())?,
            value: row.value,
            active: row.active,
            starts_at: row.starts_at,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str = "id, code, kind, value, active, starts_at, expires_at, created_at";

pub async fn list_coupons(
    pool: &PgPool,
    search: Option<&str>,
    active: Option<bool>,
) -> Result<Vec<Coupon>, PipelineError> {
    let rows: Vec<CouponRow> = sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM coupons
        WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%')
          AND ($2::boolean IS NULL OR active = $2)
        ORDER BY created_at DESC
        "#,
    ))
    .bind(search)
    .bind(active)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Coupon::try_from).collect()
}

pub async fn get_coupon(pool: &PgPool, id: Uuid) -> Result<Option<Coupon>, PipelineError> {
    let row: Option<CouponRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM coupons WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.map(Coupon::try_from).transpose()
}

pub async fn insert_coupon(pool: &PgPool, draft: &CouponDraft) -> Result<Coupon, PipelineError> {
    let row: CouponRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO coupons (id, code, kind, value, active, starts_at, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(Uuid::now_v7())
    .bind(draft.code.trim())
    .bind(draft.kind.as_str())
    .bind(draft.value)
    .bind(draft.active)
    .bind(draft.starts_at)
    .bind(draft.expires_at)
    .fetch_one(pool)
    .await?;

    Coupon::try_from(row)
}

pub async fn update_coupon(
    pool: &PgPool,
    id: Uuid,
    draft: &CouponDraft,
) -> Result<Option<Coupon>, PipelineError> {
    let row: Option<CouponRow> = sqlx::query_as(&format!(
        r#"
        UPDATE coupons
        SET code = $1, kind = $2, value = $3, active = $4,
            starts_at = $5, expires_at = $6, updated_at = now()
        WHERE id = $7
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(draft.code.trim())
    .bind(draft.kind.as_str())
    .bind(draft.value)
    .bind(draft.active)
    .bind(draft.starts_at)
    .bind(draft.expires_at)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Coupon::try_from).transpose()
}

pub async fn delete_coupon(pool: &PgPool, id: Uuid) -> Result<bool, PipelineError> {
    let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
