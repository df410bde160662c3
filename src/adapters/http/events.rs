use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::admin::{EventStatus, StoreEvent, StoreEventDraft},
        domain::error::PipelineError,
        infra::postgres::event_repo,
    },
    axum::{
        Json,
        extract::{Path, Query, State},
    },
    serde::Deserialize,
    uuid::Uuid,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<EventStatus>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StoreEvent>>, ApiError> {
    let events = event_repo::list_events(&state.pool, query.status).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(draft): Json<StoreEventDraft>,
) -> Result<Json<StoreEvent>, ApiError> {
    draft.validate()?;
    let event = event_repo::insert_event(&state.pool, &draft).await?;
    tracing::info!(event_id = %event.id, title = %event.title, "store event created");
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<StoreEventDraft>,
) -> Result<Json<StoreEvent>, ApiError> {
    draft.validate()?;
    let event = event_repo::update_event(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("event {id} not found")))?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !event_repo::delete_event(&state.pool, id).await? {
        return Err(PipelineError::NotFound(format!("event {id} not found")).into());
    }
    tracing::info!(event_id = %id, "store event deleted");
    Ok(Json(serde_json::json!({"deleted": true})))
}
