use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::admin::{Coupon, CouponDraft},
        domain::error::PipelineError,
        infra::postgres::coupon_repo,
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
    pub search: Option<String>,
    pub active: Option<bool>,
}

pub async fn list_coupons(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Coupon>>, ApiError> {
    let coupons =
        coupon_repo::list_coupons(&state.pool, query.search.as_deref(), query.active).await?;
    Ok(Json(coupons))
}

pub async fn create_coupon(
    State(state): State<AppState>,
    Json(draft): Json<CouponDraft>,
) -> Result<Json<Coupon>, ApiError> {
    draft.validate()?;
    let coupon = coupon_repo::insert_coupon(&state.pool, &draft).await?;
    tracing::info!(coupon_id = %coupon.id, code = %coupon.code, "coupon created");
    Ok(Json(coupon))
}

pub async fn get_coupon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Coupon>, ApiError> {
    let coupon = coupon_repo::get_coupon(&state.pool, id)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("coupon {id} not found")))?;
    Ok(Json(coupon))
}

pub async fn update_coupon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CouponDraft>,
) -> Result<Json<Coupon>, ApiError> {
    draft.validate()?;
    let coupon = coupon_repo::update_coupon(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("coupon {id} not found")))?;
    Ok(Json(coupon))
}

pub async fn delete_coupon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !coupon_repo::delete_coupon(&state.pool, id).await? {
        return Err(PipelineError::NotFound(format!("coupon {id} not found")).into());
    }
    tracing::info!(coupon_id = %id, "coupon deleted");
    Ok(Json(serde_json::json!({"deleted": true})))
}
