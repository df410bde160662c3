use {
    crate::domain::admin::{EventStatus, StoreEvent, StoreEventDraft},
    crate::domain::error::PipelineError,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct StoreEventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    capacity: Option<i32>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoreEventRow> for StoreEvent {
    type Error = PipelineError;

    fn try_from(row: StoreEventRow) -> Result<Self, Self::Error> {
        Ok(StoreEvent {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            capacity: row.capacity,
            status: EventStatus::try_from(row.status.as_str())?,
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str =
    "id, title, description, location, starts_at, ends_at, capacity, status, created_at";

pub async fn list_events(
    pool: &PgPool,
    status: Option<EventStatus>,
) -> Result<Vec<StoreEvent>, PipelineError> {
    let rows: Vec<StoreEventRow> = sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM store_events
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY starts_at DESC
        "#,
    ))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StoreEvent::try_from).collect()
}

pub async fn insert_event(
    pool: &PgPool,
    draft: &StoreEventDraft,
) -> Result<StoreEvent, PipelineError> {
    let row: StoreEventRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO store_events
            (id, title, description, location, starts_at, ends_at, capacity, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(Uuid::now_v7())
    .bind(draft.title.trim())
    .bind(draft.description.as_deref())
    .bind(draft.location.as_deref())
    .bind(draft.starts_at)
    .bind(draft.ends_at)
    .bind(draft.capacity)
    .bind(draft.status.as_str())
    .fetch_one(pool)
    .await?;

    StoreEvent::try_from(row)
}

pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    draft: &StoreEventDraft,
) -> Result<Option<StoreEvent>, PipelineError> {
    let row: Option<StoreEventRow> = sqlx::query_as(&format!(
        r#"
        UPDATE store_events
        SET title = $1, description = $2, location = $3, starts_at = $4,
            ends_at = $5, capacity = $6, status = $7, updated_at = now()
        WHERE id = $8
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(draft.title.trim())
    .bind(draft.description.as_deref())
    .bind(draft.location.as_deref())
    .bind(draft.starts_at)
    .bind(draft.ends_at)
    .bind(draft.capacity)
    .bind(draft.status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(StoreEvent::try_from).transpose()
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<bool, PipelineError> {
    let result = sqlx::query("DELETE FROM store_events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
