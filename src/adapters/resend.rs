use {
    crate::config::MailerConfig,
    crate::domain::error::PipelineError,
    crate::domain::outbound::{Mailer, OutboundEmail},
    serde::{Deserialize, Serialize},
    std::{future::Future, pin::Pin},
};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendEmailResponse {
    id: String,
}

/// Transactional email via the Resend HTTP API.
pub struct ResendMailer {
    api_key: Option<String>,
    from_header: String,
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(config: &MailerConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            from_header: config.from_header(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn send_inner(&self, email: &OutboundEmail) -> Result<String, PipelineError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(PipelineError::Config(
                "RESEND_API_KEY is not set, cannot send email".into(),
            ));
        };

        let request = ResendEmailRequest {
            from: &self.from_header,
            to: vec![&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http_client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Email(format!("resend request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Email(format!(
                "resend returned {status}: {body}"
            )));
        }

        let parsed: ResendEmailResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Email(format!("resend response: {e}")))?;

        tracing::info!(to = %email.to, email_id = %parsed.id, "email accepted by provider");
        Ok(parsed.id)
    }
}

impl Mailer for ResendMailer {
    fn send(
        &self,
        email: &OutboundEmail,
    ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + '_>> {
        let email = email.clone();
        Box::pin(async move { self.send_inner(&email).await })
    }
}
