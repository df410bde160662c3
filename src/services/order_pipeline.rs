use {
    crate::config::OrgProfile,
    crate::domain::checkout::{CheckoutMode, CheckoutProvider, CheckoutSummary, FetchedLineItem},
    crate::domain::error::PipelineError,
    crate::domain::order::{NewOrder, NewOrderItem, NewOrderParams},
    crate::domain::outbound::{Mailer, OutboundEmail, SideEffect},
    crate::domain::subscription::NewSubscription,
    crate::infra::postgres::{inventory_repo, order_repo, subscription_repo},
    crate::services::emails,
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Debug)]
pub enum IngestOutcome {
    /// Order + items persisted for the first time.
    Created(Uuid),
    /// This checkout session was already ingested (redelivered webhook).
    /// Treated as success so the provider stops retrying.
    AlreadyProcessed(Uuid),
}

impl IngestOutcome {
    pub fn order_id(&self) -> Uuid {
        match self {
            Self::Created(id) | Self::AlreadyProcessed(id) => *id,
        }
    }
}

fn to_order_item(item: FetchedLineItem) -> NewOrderItem {
    NewOrderItem {
        product_id: item.product_id,
        variant_id: item.variant_id,
        title: item.title,
        sku: item.sku,
        image_url: item.image_url,
        quantity: item.quantity,
        unit_price: item.unit_price,
        total_price: item.total_price,
    }
}

/// Turn a completed checkout session into a persisted order.
///
/// Failure policy: anything up to and including the order insert is fatal
/// and bubbles out, so the provider redelivers the event. Everything after
/// the order row exists is either logged-only (items batch) or an explicit
/// best-effort [`SideEffect`] (inventory, confirmation email); those paths
/// can never undo a money-relevant write.
pub async fn ingest_checkout(
    pool: &PgPool,
    provider: &dyn CheckoutProvider,
    mailer: &dyn Mailer,
    org: &OrgProfile,
    checkout: CheckoutSummary,
) -> Result<IngestOutcome, PipelineError> {
    // Line items are not embedded in the webhook payload; this second
    // provider call is fatal on error.
    let fetched = provider.fetch_line_items(&checkout.session_id).await?;
    tracing::info!(
        session_id = %checkout.session_id,
        item_count = fetched.len(),
        "fetched line items"
    );

    let items: Vec<NewOrderItem> = fetched.into_iter().map(to_order_item).collect();

    let order = NewOrder::new(NewOrderParams {
        checkout_session_id: checkout.session_id.as_str().to_string(),
        payment_intent_id: checkout.payment_intent_id.clone(),
        customer_ref: checkout.customer_ref.clone(),
        contact: checkout.contact.clone(),
        shipping: checkout.shipping.clone(),
        shipping_cost: checkout.shipping_cost,
        discount: checkout.discount,
        currency: checkout.currency,
        items,
    })?;

    let order_id = order.id();
    match order_repo::insert_order(pool, &order).await? {
        order_repo::OrderInsert::Inserted => {}
        order_repo::OrderInsert::AlreadyExists(existing) => {
            tracing::info!(
                session_id = %checkout.session_id,
                order_id = %existing,
                "checkout session already ingested, skipping"
            );
            return Ok(IngestOutcome::AlreadyProcessed(existing));
        }
    }

    // The order row is committed; an item-batch failure leaves an orphan
    // order for reconciliation rather than failing the delivery.
    if let Err(e) = order_repo::insert_items(pool, order_id, order.items()).await {
        tracing::error!(order_id = %order_id, error = %e, "order item insert failed");
    }

    apply_inventory_decrements(pool, order.items()).await;

    if checkout.mode == CheckoutMode::Subscription {
        match &checkout.subscription_ref {
            Some(sub_ref) => {
                let fetched = provider.fetch_subscription(sub_ref).await?;
                let sub = NewSubscription::new(
                    fetched.external_id,
                    fetched.status,
                    fetched.interval,
                    fetched.next_billing_at,
                    checkout.shipping.clone(),
                );
                let sub_row = subscription_repo::insert_subscription(pool, &sub).await?;
                order_repo::link_subscription(pool, order_id, sub_row).await?;
                tracing::info!(
                    order_id = %order_id,
                    subscription = %sub.external_id(),
                    interval = %sub.interval(),
                    "subscription recorded"
                );
            }
            None => {
                tracing::warn!(
                    session_id = %checkout.session_id,
                    "subscription-mode session carried no subscription id"
                );
            }
        }
    }

    let email = send_confirmation(pool, mailer, org, order_id).await;
    tracing::info!(order_id = %order_id, email = ?email, "order created");

    Ok(IngestOutcome::Created(order_id))
}

/// Best-effort: catalog inventory tracking is optional, so a miss or a
/// database error here is logged and swallowed.
async fn apply_inventory_decrements(pool: &PgPool, items: &[NewOrderItem]) {
    for item in items {
        let Some(product_id) = item.product_id.as_deref() else {
            continue;
        };
        let effect =
            match inventory_repo::decrement_inventory(pool, product_id, item.quantity).await {
                Ok(true) => SideEffect::Applied,
                Ok(false) => SideEffect::Skipped,
                Err(e) => {
                    tracing::warn!(product_id, error = %e, "inventory decrement failed");
                    SideEffect::Failed
                }
            };
        tracing::debug!(product_id, ?effect, "inventory decrement");
    }
}

/// Best-effort: the order is considered created even if the confirmation
/// never leaves the building.
async fn send_confirmation(
    pool: &PgPool,
    mailer: &dyn Mailer,
    org: &OrgProfile,
    order_id: Uuid,
) -> SideEffect {
    let order = match order_repo::find_order(pool, order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            tracing::warn!(order_id = %order_id, "order vanished before confirmation email");
            return SideEffect::Skipped;
        }
        Err(e) => {
            tracing::warn!(order_id = %order_id, error = %e, "order reload failed, skipping email");
            return SideEffect::Failed;
        }
    };

    let Some(to) = order.contact.email.clone() else {
        tracing::info!(order_id = %order_id, "no customer email on order, skipping confirmation");
        return SideEffect::Skipped;
    };

    let items = match order_repo::list_items(pool, order_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(order_id = %order_id, error = %e, "item reload failed, skipping email");
            return SideEffect::Failed;
        }
    };

    let rendered = emails::confirmation_email(&order, &items, org);
    match mailer
        .send(&OutboundEmail {
            to,
            subject: rendered.subject,
            html: rendered.html,
        })
        .await
    {
        Ok(email_id) => {
            tracing::info!(order_id = %order_id, email_id = %email_id, "confirmation email sent");
            SideEffect::Applied
        }
        Err(e) => {
            tracing::warn!(order_id = %order_id, error = %e, "confirmation email failed");
            SideEffect::Failed
        }
    }
}
