use {
    super::error::PipelineError,
    super::id::{SessionId, SubscriptionRef},
    super::money::{Currency, MoneyAmount},
    super::order::{CustomerContact, ShippingAddress},
    super::subscription::{BillingInterval, SubscriptionStatus},
    chrono::{DateTime, Utc},
    std::{future::Future, pin::Pin},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    Payment,
    Subscription,
}

/// What the webhook event payload gives us about a completed session.
/// Line items are NOT embedded in the event; they come from a second
/// provider call through [`CheckoutProvider`].
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    pub session_id: SessionId,
    pub payment_intent_id: Option<String>,
    pub customer_ref: Option<String>,
    pub mode: CheckoutMode,
    pub contact: CustomerContact,
    pub shipping: ShippingAddress,
    pub shipping_cost: MoneyAmount,
    pub discount: MoneyAmount,
    pub currency: Currency,
    pub subscription_ref: Option<SubscriptionRef>,
}

/// One priced line of a checkout session, already converted to domain
/// terms. Catalog ids are resolved from provider metadata and stay None
/// for items sold outside the catalog.
#[derive(Debug, Clone)]
pub struct FetchedLineItem {
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub title: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: MoneyAmount,
    pub total_price: MoneyAmount,
}

/// Provider-side subscription state at creation time.
#[derive(Debug, Clone)]
pub struct FetchedSubscription {
    pub external_id: SubscriptionRef,
    pub status: SubscriptionStatus,
    pub interval: BillingInterval,
    pub next_billing_at: Option<DateTime<Utc>>,
}

pub trait CheckoutProvider: Send + Sync {
    fn fetch_line_items(
        &self,
        session: &SessionId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FetchedLineItem>, PipelineError>> + Send + '_>>;

    fn fetch_subscription(
        &self,
        id: &SubscriptionRef,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedSubscription, PipelineError>> + Send + '_>>;
}
