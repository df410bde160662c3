use {
    super::error::PipelineError,
    super::id::SubscriptionRef,
    super::order::ShippingAddress,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Cancelled => "cancelled",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for SubscriptionStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "active" => Ok(Self::Active),
            "past_due" => Ok(Self::PastDue),
            "cancelled" => Ok(Self::Cancelled),
            "paused" => Ok(Self::Paused),
            other => Err(PipelineError::Validation(format!(
                "unknown subscription status: {other}"
            ))),
        }
    }
}

/// Recurrence unit as reported by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingInterval {
    Monthly,
    EveryTwoWeeks,
    EveryThreeMonths,
}

impl BillingInterval {
    /// Closed mapping from the provider's interval/interval_count pair.
    /// Anything outside the three plans we sell falls back to monthly.
    pub fn from_provider(unit: IntervalUnit, count: u64) -> Self {
        match (unit, count) {
            (IntervalUnit::Week, 2) => Self::EveryTwoWeeks,
            (IntervalUnit::Month, 1) => Self::Monthly,
            (IntervalUnit::Month, 3) => Self::EveryThreeMonths,
            _ => Self::Monthly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::EveryTwoWeeks => "every-2-weeks",
            Self::EveryThreeMonths => "every-3-months",
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for BillingInterval {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "every-2-weeks" => Ok(Self::EveryTwoWeeks),
            "every-3-months" => Ok(Self::EveryThreeMonths),
            other => Err(PipelineError::Validation(format!(
                "unknown billing interval: {other}"
            ))),
        }
    }
}

/// For INSERT, created only when the originating checkout was recurring.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    id: Uuid,
    external_id: SubscriptionRef,
    status: SubscriptionStatus,
    interval: BillingInterval,
    next_billing_at: Option<DateTime<Utc>>,
    shipping: ShippingAddress,
}

impl NewSubscription {
    pub fn new(
        external_id: SubscriptionRef,
        status: SubscriptionStatus,
        interval: BillingInterval,
        next_billing_at: Option<DateTime<Utc>>,
        shipping: ShippingAddress,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            external_id,
            status,
            interval,
            next_billing_at,
            shipping,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn external_id(&self) -> &SubscriptionRef {
        &self.external_id
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn interval(&self) -> BillingInterval {
        self.interval
    }

    pub fn next_billing_at(&self) -> Option<DateTime<Utc>> {
        self.next_billing_at
    }

    pub fn shipping(&self) -> &ShippingAddress {
        &self.shipping
    }
}
