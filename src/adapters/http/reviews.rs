use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::admin::{Review, ReviewDraft, ReviewStatus},
        domain::error::PipelineError,
        infra::postgres::review_repo,
        services::review_import::{self, ImportSummary},
    },
    axum::{
        Json,
        body::Bytes,
        extract::{Path, Query, State},
    },
    serde::Deserialize,
    uuid::Uuid,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub product_id: Option<String>,
    pub status: Option<ReviewStatus>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews =
        review_repo::list_reviews(&state.pool, query.product_id.as_deref(), query.status).await?;
    Ok(Json(reviews))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(draft): Json<ReviewDraft>,
) -> Result<Json<Review>, ApiError> {
    draft.validate()?;
    let review = review_repo::insert_review(&state.pool, &draft).await?;
    tracing::info!(review_id = %review.id, "review created");
    Ok(Json(review))
}

#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub status: ReviewStatus,
}

pub async fn moderate_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ModerateRequest>,
) -> Result<Json<Review>, ApiError> {
    let review = review_repo::set_review_status(&state.pool, id, req.status)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("review {id} not found")))?;
    tracing::info!(review_id = %id, status = ?req.status, "review moderated");
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !review_repo::delete_review(&state.pool, id).await? {
        return Err(PipelineError::NotFound(format!("review {id} not found")).into());
    }
    tracing::info!(review_id = %id, "review deleted");
    Ok(Json(serde_json::json!({"deleted": true})))
}

/// Bulk import from the legacy spreadsheet export. The body is the raw CSV
/// document; unusable rows are skipped, never fatal.
pub async fn import_reviews(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportSummary>, ApiError> {
    if body.is_empty() {
        return Err(PipelineError::Validation("empty CSV body".into()).into());
    }
    let summary = review_import::import_reviews(&state.pool, &body).await?;
    Ok(Json(summary))
}
