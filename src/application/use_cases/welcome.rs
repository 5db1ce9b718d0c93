use std::sync::Arc;

use tracing::{instrument, warn};

use crate::app_error::{AppError, AppResult};
use crate::application::email_templates::welcome_email;
use crate::application::use_cases::{Mailer, WaitlistRepo};
use crate::application::validators::WelcomeInput;

#[derive(Debug, Clone)]
pub struct WelcomeReceipt {
    pub message_id: String,
    pub to: String,
}

#[derive(Clone)]
pub struct WelcomeUseCases {
    repo: Arc<dyn WaitlistRepo>,
    mailer: Arc<dyn Mailer>,
    email_from: String,
    email_from_fallback: String,
}

impl WelcomeUseCases {
    pub fn new(
        repo: Arc<dyn WaitlistRepo>,
        mailer: Arc<dyn Mailer>,
        email_from: String,
        email_from_fallback: String,
    ) -> Self {
        Self {
            repo,
            mailer,
            email_from,
            email_from_fallback,
        }
    }

    /// Sends the queue-position email. `input` names the recipient
    /// directly; when absent (the batch/cron variant) the most recently
    /// updated verified-and-quiz-completed user is picked from the store.
    #[instrument(skip(self, input))]
    pub async fn send_welcome(&self, input: Option<WelcomeInput>) -> AppResult<WelcomeReceipt> {
        if !self.mailer.is_configured() {
            return Err(AppError::DependencyUnavailable(
                "email provider credential is not configured".to_string(),
            ));
        }

        let input = match input {
            Some(input) => input,
            None => {
                let user = self
                    .repo
                    .latest_welcome_candidate()
                    .await?
                    .ok_or(AppError::NotFound)?;
                let waitlist_position = user.waitlist_position.ok_or_else(|| {
                    AppError::Internal(format!(
                        "welcome candidate {} has no waitlist position",
                        user.id
                    ))
                })?;
                WelcomeInput {
                    email: user.email,
                    name: user.name,
                    user_type: user.user_type,
                    waitlist_position,
                }
            }
        };

        let (subject, html) = welcome_email(&input.name, input.waitlist_position, input.user_type);

        match self
            .mailer
            .send(&self.email_from, &input.email, &subject, &html)
            .await
        {
            Ok(message_id) => Ok(WelcomeReceipt {
                message_id,
                to: input.email,
            }),
            // A rate limit would hit the fallback identity just the same;
            // surface it to the caller with its backoff hint.
            Err(err @ AppError::RateLimited { .. }) => Err(err),
            // A rejected credential is terminal; a second identity on the
            // same account cannot help.
            Err(err @ AppError::DependencyUnavailable(_)) => Err(err),
            Err(primary_err) => {
                warn!(
                    error = ?primary_err,
                    from = %self.email_from,
                    "primary sender identity failed, trying fallback"
                );
                let message_id = self
                    .mailer
                    .send(&self.email_from_fallback, &input.email, &subject, &html)
                    .await?;
                Ok(WelcomeReceipt {
                    message_id,
                    to: input.email,
                })
            }
        }
    }
}
