use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        adapters::stripe_client::{convert_amount, convert_currency, convert_subscription_status,
            convert_timestamp, expandable_id},
        domain::{
            checkout::{CheckoutMode, CheckoutSummary},
            error::PipelineError,
            id::{SessionId, SubscriptionRef},
            order::{CustomerContact, ShippingAddress},
            subscription::SubscriptionStatus,
        },
        services::{order_pipeline, subscription_sync},
    },
    axum::{Json, extract::State, http::HeaderMap},
};

#[tracing::instrument(
    name = "webhook",
    skip_all,
    fields(event_id = tracing::field::Empty, event_type = tracing::field::Empty)
)]
pub async fn stripe_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(secret) = state.webhook_secret.as_deref() else {
        tracing::error!("webhook secret not configured, rejecting delivery");
        return Err(PipelineError::Config("STRIPE_WEBHOOK_SECRET is not set".into()).into());
    };

    let sig = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PipelineError::WebhookSignature("missing Stripe-Signature header".into()))?;

    let event = stripe::Webhook::construct_event(&body, sig, secret)
        .map_err(|e| PipelineError::WebhookSignature(e.to_string()))?;

    let event_id = event.id.to_string();
    let event_type = event.type_;
    tracing::Span::current()
        .record("event_id", tracing::field::display(&event_id))
        .record("event_type", tracing::field::debug(&event_type));
    tracing::info!("signature verified");

    match event_type {
        stripe::EventType::CheckoutSessionCompleted => {
            if let stripe::EventObject::CheckoutSession(session) = event.data.object {
                let checkout = match summarize_session(&session) {
                    Ok(checkout) => checkout,
                    Err(PipelineError::Validation(msg)) => {
                        // A session we can't interpret will never become
                        // interpretable on redelivery; acknowledge it.
                        tracing::warn!("skipping uninterpretable session: {msg}");
                        return Ok(received());
                    }
                    Err(e) => return Err(e.into()),
                };

                let outcome = order_pipeline::ingest_checkout(
                    &state.pool,
                    &*state.provider,
                    &*state.mailer,
                    &state.org,
                    checkout,
                )
                .await?;
                tracing::info!(order_id = %outcome.order_id(), ?outcome, "checkout processed");
            }
        }
        stripe::EventType::CustomerSubscriptionUpdated => {
            if let stripe::EventObject::Subscription(sub) = event.data.object {
                subscription_sync::mirror_subscription(
                    &state.pool,
                    sub.id.as_str(),
                    convert_subscription_status(sub.status),
                    convert_timestamp(sub.current_period_end),
                )
                .await?;
            }
        }
        stripe::EventType::CustomerSubscriptionDeleted => {
            if let stripe::EventObject::Subscription(sub) = event.data.object {
                subscription_sync::mirror_subscription(
                    &state.pool,
                    sub.id.as_str(),
                    SubscriptionStatus::Cancelled,
                    None,
                )
                .await?;
            }
        }
        stripe::EventType::InvoicePaymentFailed => {
            if let stripe::EventObject::Invoice(invoice) = event.data.object {
                match invoice.subscription.as_ref() {
                    Some(sub) => {
                        subscription_sync::mirror_subscription(
                            &state.pool,
                            &expandable_id(sub),
                            SubscriptionStatus::PastDue,
                            None,
                        )
                        .await?;
                    }
                    None => {
                        tracing::info!("payment-failed invoice without a subscription, ignored");
                    }
                }
            }
        }
        other => {
            // Unknown types are acknowledged so the provider doesn't mark
            // the endpoint unhealthy and retry forever.
            tracing::info!(event_type = ?other, "unhandled event type, acknowledged");
        }
    }

    Ok(received())
}

fn received() -> Json<serde_json::Value> {
    Json(serde_json::json!({"received": true}))
}

/// Pull the order-relevant fields out of the event-embedded session. Line
/// items are not part of the event payload; the pipeline fetches them
/// separately.
fn summarize_session(session: &stripe::CheckoutSession) -> Result<CheckoutSummary, PipelineError> {
    let session_id = SessionId::new(session.id.to_string())?;

    let mode = match session.mode {
        stripe::CheckoutSessionMode::Payment => CheckoutMode::Payment,
        stripe::CheckoutSessionMode::Subscription => CheckoutMode::Subscription,
        other => {
            return Err(PipelineError::Validation(format!(
                "unsupported checkout mode: {other:?}"
            )));
        }
    };

    let currency = match session.currency {
        Some(c) => convert_currency(c)?,
        None => {
            return Err(PipelineError::Validation(
                "completed session without a currency".into(),
            ));
        }
    };

    let contact = session
        .customer_details
        .as_ref()
        .map(|details| CustomerContact {
            name: details.name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
        })
        .unwrap_or_default();

    let shipping = session
        .shipping_details
        .as_ref()
        .map(|details| {
            let address = details.address.as_ref();
            ShippingAddress {
                name: details.name.clone(),
                line1: address.and_then(|a| a.line1.clone()),
                line2: address.and_then(|a| a.line2.clone()),
                city: address.and_then(|a| a.city.clone()),
                state: address.and_then(|a| a.state.clone()),
                postal_code: address.and_then(|a| a.postal_code.clone()),
                country: address.and_then(|a| a.country.clone()),
            }
        })
        .unwrap_or_default();

    let shipping_cost = convert_amount(
        session
            .shipping_cost
            .as_ref()
            .map(|c| c.amount_total)
            .unwrap_or(0),
    )?;
    let discount = convert_amount(
        session
            .total_details
            .as_ref()
            .map(|t| t.amount_discount)
            .unwrap_or(0),
    )?;

    let subscription_ref = session
        .subscription
        .as_ref()
        .map(|e| SubscriptionRef::new(expandable_id(e)))
        .transpose()?;

    Ok(CheckoutSummary {
        session_id,
        payment_intent_id: session.payment_intent.as_ref().map(expandable_id),
        customer_ref: session.customer.as_ref().map(expandable_id),
        mode,
        contact,
        shipping,
        shipping_cost,
        discount,
        currency,
        subscription_ref,
    })
}
