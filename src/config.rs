use std::env;

/// Organization identity that appears in receipts and footers. The legal
/// name and tax id feed the donation-receipt block, which a registered
/// non-profit seller must emit verbatim.
#[derive(Debug, Clone)]
pub struct OrgProfile {
    pub name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub support_email: String,
    pub address: String,
}

impl OrgProfile {
    fn from_env() -> Self {
        Self {
            name: env_or("ORG_NAME", "Harvest Goods"),
            legal_name: env_or("ORG_LEGAL_NAME", "Harvest Goods Foundation"),
            tax_id: env_or("ORG_TAX_ID", "00-0000000"),
            support_email: env_or("ORG_SUPPORT_EMAIL", "support@harvestgoods.org"),
            address: env_or("ORG_ADDRESS", "PO Box 100, Portland, OR 97201"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_key: Option<String>,
    pub from_email: String,
    pub from_name: String,
}

impl MailerConfig {
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub stripe_secret_key: String,
    /// Absent secret means the webhook endpoint answers 500 until the
    /// deployment is fixed; it never accepts an unverified event.
    pub stripe_webhook_secret: Option<String>,
    pub mailer: MailerConfig,
    pub org: OrgProfile,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let org = OrgProfile::from_env();
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set"),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").ok(),
            mailer: MailerConfig {
                api_key: env::var("RESEND_API_KEY").ok(),
                from_email: env_or("EMAIL_FROM", "orders@harvestgoods.org"),
                from_name: env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| org.name.clone()),
            },
            org,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
