use {
    super::error::PipelineError,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

// ── Coupons ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` is a percentage, 0..=100.
    Percent,
    /// `value` is an amount in minor units.
    Fixed,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
        }
    }
}

impl TryFrom<&str> for CouponKind {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "percent" => Ok(Self::Percent),
            "fixed" => Ok(Self::Fixed),
            other => Err(PipelineError::Validation(format!(
                "unknown coupon kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub kind: CouponKind,
    pub value: i64,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CouponDraft {
    pub code: String,
    pub kind: CouponKind,
    pub value: i64,
    #[serde(default = "default_true")]
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CouponDraft {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.code.trim().is_empty() {
            return Err(PipelineError::Validation("coupon code is required".into()));
        }
        match self.kind {
            CouponKind::Percent if !(0..=100).contains(&self.value) => Err(
                PipelineError::Validation("percent coupon value must be 0..=100".into()),
            ),
            _ if self.value < 0 => Err(PipelineError::Validation(
                "coupon value cannot be negative".into(),
            )),
            _ => Ok(()),
        }
    }
}

fn default_true() -> bool {
    true
}

// ── Store events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for EventStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(PipelineError::Validation(format!(
                "unknown event status: {other}"
            ))),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreEventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    #[serde(default = "EventStatus::default_draft")]
    pub status: EventStatus,
}

impl EventStatus {
    fn default_draft() -> Self {
        Self::Draft
    }
}

impl StoreEventDraft {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.title.trim().is_empty() {
            return Err(PipelineError::Validation("event title is required".into()));
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(PipelineError::Validation(
                    "event cannot end before it starts".into(),
                ));
            }
        }
        Ok(())
    }
}

// ── Reviews ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for ReviewStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(PipelineError::Validation(format!(
                "unknown review status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    /// None ⇒ a general testimonial, not tied to a catalog product.
    pub product_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub rating: i32,
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_verified_buyer: bool,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDraft {
    pub product_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub rating: i32,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub is_verified_buyer: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ReviewDraft {
    pub fn is_general_testimonial(&self) -> bool {
        self.product_id.is_none()
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.customer_name.trim().is_empty() {
            return Err(PipelineError::Validation(
                "reviewer name is required".into(),
            ));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(PipelineError::Validation(format!(
                "rating must be 1..=5, got {}",
                self.rating
            )));
        }
        Ok(())
    }
}
