use {
    crate::domain::{
        checkout::{CheckoutProvider, FetchedLineItem, FetchedSubscription},
        error::PipelineError,
        id::{SessionId, SubscriptionRef},
        money::{Currency, MoneyAmount},
        subscription::{BillingInterval, IntervalUnit, SubscriptionStatus},
    },
    chrono::{DateTime, Utc},
    std::{future::Future, pin::Pin},
};

pub struct StripeCheckout {
    client: stripe::Client,
}

impl StripeCheckout {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: stripe::Client::new(secret_key),
        }
    }
}

impl CheckoutProvider for StripeCheckout {
    fn fetch_line_items(
        &self,
        session: &SessionId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FetchedLineItem>, PipelineError>> + Send + '_>>
    {
        let session = session.clone();
        Box::pin(async move { self.fetch_line_items_inner(&session).await })
    }

    fn fetch_subscription(
        &self,
        id: &SubscriptionRef,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedSubscription, PipelineError>> + Send + '_>>
    {
        let id = id.clone();
        Box::pin(async move { self.fetch_subscription_inner(&id).await })
    }
}

impl StripeCheckout {
    async fn fetch_line_items_inner(
        &self,
        session: &SessionId,
    ) -> Result<Vec<FetchedLineItem>, PipelineError> {
        let session_id = session
            .as_str()
            .parse::<stripe::CheckoutSessionId>()
            .map_err(|e| PipelineError::Provider(format!("invalid CheckoutSession id: {e}")))?;

        let session = stripe::CheckoutSession::retrieve(
            &self.client,
            &session_id,
            &["line_items", "line_items.data.price.product"],
        )
        .await
        .map_err(|e| PipelineError::Provider(format!("Stripe API: {e}")))?;

        session
            .line_items
            .map(|list| list.data)
            .unwrap_or_default()
            .into_iter()
            .map(convert_line_item)
            .collect()
    }

    async fn fetch_subscription_inner(
        &self,
        id: &SubscriptionRef,
    ) -> Result<FetchedSubscription, PipelineError> {
        let sub_id = id
            .as_str()
            .parse::<stripe::SubscriptionId>()
            .map_err(|e| PipelineError::Provider(format!("invalid Subscription id: {e}")))?;

        let sub = stripe::Subscription::retrieve(&self.client, &sub_id, &[])
            .await
            .map_err(|e| PipelineError::Provider(format!("Stripe API: {e}")))?;

        Ok(FetchedSubscription {
            external_id: id.clone(),
            status: convert_subscription_status(sub.status),
            interval: subscription_interval(&sub),
            next_billing_at: convert_timestamp(sub.current_period_end),
        })
    }
}

// ── Conversion helpers ─────────────────────────────────────────────────────

pub fn convert_currency(c: stripe::Currency) -> Result<Currency, PipelineError> {
    match c {
        stripe::Currency::USD => Ok(Currency::Usd),
        stripe::Currency::EUR => Ok(Currency::Eur),
        stripe::Currency::GBP => Ok(Currency::Gbp),
        stripe::Currency::CAD => Ok(Currency::Cad),
        other => Err(PipelineError::Validation(format!(
            "unsupported currency: {other:?}"
        ))),
    }
}

pub fn convert_amount(amount: i64) -> Result<MoneyAmount, PipelineError> {
    MoneyAmount::new(amount)
}

pub fn convert_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

pub fn convert_subscription_status(status: stripe::SubscriptionStatus) -> SubscriptionStatus {
    #[allow(unreachable_patterns)]
    match status {
        stripe::SubscriptionStatus::Active | stripe::SubscriptionStatus::Trialing => {
            SubscriptionStatus::Active
        }
        stripe::SubscriptionStatus::PastDue
        | stripe::SubscriptionStatus::Unpaid
        | stripe::SubscriptionStatus::Incomplete => SubscriptionStatus::PastDue,
        stripe::SubscriptionStatus::Canceled | stripe::SubscriptionStatus::IncompleteExpired => {
            SubscriptionStatus::Cancelled
        }
        stripe::SubscriptionStatus::Paused => SubscriptionStatus::Paused,
        other => {
            tracing::warn!("unknown SubscriptionStatus: {other:?}, treating as past_due");
            SubscriptionStatus::PastDue
        }
    }
}

fn convert_interval_unit(interval: stripe::RecurringInterval) -> IntervalUnit {
    #[allow(unreachable_patterns)]
    match interval {
        stripe::RecurringInterval::Day => IntervalUnit::Day,
        stripe::RecurringInterval::Week => IntervalUnit::Week,
        stripe::RecurringInterval::Month => IntervalUnit::Month,
        stripe::RecurringInterval::Year => IntervalUnit::Year,
        other => {
            tracing::warn!("unknown RecurringInterval: {other:?}, treating as month");
            IntervalUnit::Month
        }
    }
}

/// Billing interval lives on the first item's price. Sessions we sell
/// always carry exactly one recurring price; anything else falls back to
/// the monthly default inside the mapping table.
pub fn subscription_interval(sub: &stripe::Subscription) -> BillingInterval {
    let recurring = sub
        .items
        .data
        .first()
        .and_then(|item| item.price.as_ref())
        .and_then(|price| price.recurring.as_ref());

    match recurring {
        Some(r) => BillingInterval::from_provider(convert_interval_unit(r.interval), r.interval_count),
        None => {
            tracing::warn!(subscription = %sub.id, "no recurring price on subscription, defaulting to monthly");
            BillingInterval::Monthly
        }
    }
}

pub fn expandable_id<T>(e: &stripe::Expandable<T>) -> String
where
    T: stripe::Object,
    T::Id: ToString,
{
    match e {
        stripe::Expandable::Id(id) => id.to_string(),
        stripe::Expandable::Object(obj) => obj.id().to_string(),
    }
}

/// Map one session line item to the domain snapshot. Catalog ids come from
/// price/product metadata (`product_id`, `variant_id`, `sku`) and stay None
/// when absent. Unit price falls back to line total / quantity when the
/// price object was not expanded.
pub fn convert_line_item(item: stripe::CheckoutSessionItem) -> Result<FetchedLineItem, PipelineError> {
    let quantity = u32::try_from(item.quantity.unwrap_or(1))
        .map_err(|_| PipelineError::Validation("line item quantity out of range".into()))?
        .max(1);
    let total_price = convert_amount(item.amount_total)?;

    let price = item.price.as_ref();
    let product = price
        .and_then(|p| p.product.as_ref())
        .and_then(|e| match e {
            stripe::Expandable::Object(product) => Some(&**product),
            stripe::Expandable::Id(_) => None,
        });

    let meta_lookup = |key: &str| -> Option<String> {
        price
            .and_then(|p| p.metadata.as_ref())
            .and_then(|m| m.get(key))
            .or_else(|| {
                product
                    .and_then(|p| p.metadata.as_ref())
                    .and_then(|m| m.get(key))
            })
            .map(|s| s.to_string())
    };

    let unit_price = match price.and_then(|p| p.unit_amount) {
        Some(unit) => convert_amount(unit)?,
        None => MoneyAmount::new(item.amount_total / i64::from(quantity))?,
    };

    let title = product
        .and_then(|p| p.name.clone())
        .unwrap_or_else(|| item.description.clone());
    let image_url = product
        .and_then(|p| p.images.as_ref())
        .and_then(|images| images.first().cloned());

    Ok(FetchedLineItem {
        product_id: meta_lookup("product_id"),
        variant_id: meta_lookup("variant_id"),
        title,
        sku: meta_lookup("sku"),
        image_url,
        quantity,
        unit_price,
        total_price,
    })
}
