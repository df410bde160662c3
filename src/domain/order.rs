use {
    super::error::PipelineError,
    super::money::{Currency, MoneyAmount},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(PipelineError::Validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Mirror of the provider's payment state on the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(PipelineError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

/// Shipping snapshot captured at purchase time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    pub name: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl ShippingAddress {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.line1.is_none() && self.city.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Full order record from the database (for reads).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub checkout_session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_ref: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub contact: CustomerContact,
    pub shipping: ShippingAddress,
    pub subtotal: MoneyAmount,
    pub shipping_cost: MoneyAmount,
    pub discount: MoneyAmount,
    pub total: MoneyAmount,
    pub currency: Currency,
    pub subscription_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Denormalized line-item snapshot. Historical orders stay stable even if
/// the catalog changes later.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub title: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: MoneyAmount,
    pub total_price: MoneyAmount,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub title: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: MoneyAmount,
    pub total_price: MoneyAmount,
}

pub struct NewOrderParams {
    pub checkout_session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_ref: Option<String>,
    pub contact: CustomerContact,
    pub shipping: ShippingAddress,
    pub shipping_cost: MoneyAmount,
    pub discount: MoneyAmount,
    pub currency: Currency,
    pub items: Vec<NewOrderItem>,
}

/// For INSERT; id generated in Rust via Uuid::now_v7(). The subtotal and
/// total are derived from the line items so the stored row always satisfies
/// total = sum(items) + shipping - discount.
#[derive(Debug, Clone)]
pub struct NewOrder {
    id: Uuid,
    checkout_session_id: String,
    payment_intent_id: Option<String>,
    customer_ref: Option<String>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    contact: CustomerContact,
    shipping: ShippingAddress,
    subtotal: MoneyAmount,
    shipping_cost: MoneyAmount,
    discount: MoneyAmount,
    total: MoneyAmount,
    currency: Currency,
    items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn new(params: NewOrderParams) -> Result<Self, PipelineError> {
        let NewOrderParams {
            checkout_session_id,
            payment_intent_id,
            customer_ref,
            contact,
            shipping,
            shipping_cost,
            discount,
            currency,
            items,
        } = params;

        let subtotal = items
            .iter()
            .try_fold(MoneyAmount::ZERO, |acc, item| {
                acc.checked_add(item.total_price)
            })
            .ok_or_else(|| PipelineError::Validation("order subtotal overflow".into()))?;

        let total = subtotal
            .checked_add(shipping_cost)
            .and_then(|t| t.checked_sub(discount))
            .ok_or_else(|| {
                PipelineError::Validation(format!(
                    "order total out of range: subtotal {subtotal} shipping {shipping_cost} discount {discount}"
                ))
            })?;

        Ok(Self {
            id: Uuid::now_v7(),
            checkout_session_id,
            payment_intent_id,
            customer_ref,
            status: OrderStatus::Processing,
            payment_status: PaymentStatus::Paid,
            contact,
            shipping,
            subtotal,
            shipping_cost,
            discount,
            total,
            currency,
            items,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn checkout_session_id(&self) -> &str {
        &self.checkout_session_id
    }

    pub fn payment_intent_id(&self) -> Option<&str> {
        self.payment_intent_id.as_deref()
    }

    pub fn customer_ref(&self) -> Option<&str> {
        self.customer_ref.as_deref()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn contact(&self) -> &CustomerContact {
        &self.contact
    }

    pub fn shipping(&self) -> &ShippingAddress {
        &self.shipping
    }

    pub fn subtotal(&self) -> MoneyAmount {
        self.subtotal
    }

    pub fn shipping_cost(&self) -> MoneyAmount {
        self.shipping_cost
    }

    pub fn discount(&self) -> MoneyAmount {
        self.discount
    }

    pub fn total(&self) -> MoneyAmount {
        self.total
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn items(&self) -> &[NewOrderItem] {
        &self.items
    }
}
