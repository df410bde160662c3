use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::error::PipelineError,
        domain::money::MoneyAmount,
        domain::outbound::OutboundEmail,
        infra::postgres::order_repo,
        services::emails,
    },
    axum::{Json, extract::State},
    serde::Deserialize,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    Shipping,
    Refund,
    Cancellation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub order_id: Option<Uuid>,
    pub email_type: Option<EmailType>,
    pub tracking_number: Option<String>,
    pub tracking_url: Option<String>,
    /// Minor units, like every other monetary value on this API.
    pub refund_amount: Option<i64>,
    pub is_full_refund: Option<bool>,
    pub reason: Option<String>,
}

/// Internal trigger for the type-specific lifecycle emails. The
/// confirmation email is pipeline-only and not reachable from here.
pub async fn send_order_email(
    State(state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let order_id = req
        .order_id
        .ok_or_else(|| PipelineError::Validation("orderId is required".into()))?;
    let email_type = req
        .email_type
        .ok_or_else(|| PipelineError::Validation("emailType is required".into()))?;

    let order = order_repo::find_order(&state.pool, order_id)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("order {order_id} not found")))?;

    let to = order
        .contact
        .email
        .clone()
        .ok_or_else(|| PipelineError::Validation("order has no customer email".into()))?;

    let rendered = match email_type {
        EmailType::Shipping => {
            let tracking_number = req
                .tracking_number
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    PipelineError::Validation("trackingNumber is required for shipping".into())
                })?;
            emails::shipping_email(&order, &state.org, tracking_number, req.tracking_url.as_deref())
        }
        EmailType::Refund => {
            let amount = match req.refund_amount {
                Some(cents) => MoneyAmount::new(cents)
                    .map_err(|_| PipelineError::Validation("refundAmount cannot be negative".into()))?,
                None => order.total,
            };
            let is_full = req.is_full_refund.unwrap_or(amount >= order.total);
            emails::refund_email(&order, &state.org, amount, is_full, req.reason.as_deref())
        }
        EmailType::Cancellation => emails::cancellation_email(&order, &state.org),
    };

    let email_id = state
        .mailer
        .send(&OutboundEmail {
            to,
            subject: rendered.subject,
            html: rendered.html,
        })
        .await?;

    tracing::info!(order_id = %order_id, ?email_type, email_id = %email_id, "order email sent");
    Ok(Json(serde_json::json!({
        "success": true,
        "emailId": email_id,
    })))
}
