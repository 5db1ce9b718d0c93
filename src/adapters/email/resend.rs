use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::Mailer,
};

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: SecretString,
}

impl ResendMailer {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct ResendReq<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct ResendResp {
    id: String,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, from: &str, to: &str, subject: &str, html: &str) -> AppResult<String> {
        let body = ResendReq {
            from,
            to: [to],
            subject,
            html,
        };
        let resp = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::DependencyUnavailable(format!("email provider unreachable: {e}")))?;

        match resp.status().as_u16() {
            s if (200..300).contains(&s) => {
                let parsed: ResendResp = resp.json().await.map_err(|e| {
                    AppError::Internal(format!("email provider returned malformed response: {e}"))
                })?;
                Ok(parsed.id)
            }
            429 => {
                let retry_after_secs = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(AppError::RateLimited { retry_after_secs })
            }
            401 => Err(AppError::DependencyUnavailable(
                "email provider rejected the configured credential".to_string(),
            )),
            status => {
                let detail = resp.text().await.unwrap_or_default();
                // Includes sender-domain rejections (403); callers with a
                // fallback identity may retry with it.
                Err(AppError::Internal(format!(
                    "email send failed with status {status}: {detail}"
                )))
            }
        }
    }

    fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}
