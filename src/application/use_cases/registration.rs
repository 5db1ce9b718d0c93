use std::sync::Arc;

use base64::Engine;
use tracing::{instrument, warn};
use url::Url;

use crate::app_error::{AppError, AppResult};
use crate::application::email_templates::verification_email;
use crate::application::use_cases::{Mailer, NewWaitlistUser, WaitlistRepo};
use crate::application::validators::RegistrationInput;
use crate::domain::entities::waitlist_user::WaitlistUser;

/// What happened to the verification email, reported separately from the
/// committed user row so callers can retry delivery on its own.
#[derive(Debug, Clone)]
pub enum EmailDispatchOutcome {
    Delivered { message_id: String },
    Failed { reason: String },
}

#[derive(Debug)]
pub struct RegistrationOutcome {
    pub user: WaitlistUser,
    pub email_dispatch: EmailDispatchOutcome,
}

#[derive(Clone)]
pub struct RegistrationUseCases {
    repo: Arc<dyn WaitlistRepo>,
    mailer: Arc<dyn Mailer>,
    site_url: Url,
    email_from: String,
}

impl RegistrationUseCases {
    pub fn new(
        repo: Arc<dyn WaitlistRepo>,
        mailer: Arc<dyn Mailer>,
        site_url: Url,
        email_from: String,
    ) -> Self {
        Self {
            repo,
            mailer,
            site_url,
            email_from,
        }
    }

    /// Creates an unverified user with a single-use token and dispatches
    /// the verification email. The email send is best-effort: a failure is
    /// reported in the outcome but never rolls back the insert, so the
    /// stored token stays valid for a resend.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegistrationInput) -> AppResult<RegistrationOutcome> {
        if !self.mailer.is_configured() {
            return Err(AppError::DependencyUnavailable(
                "email provider credential is not configured".to_string(),
            ));
        }

        let token = input.token.unwrap_or_else(generate_token);

        let user = self
            .repo
            .create_user(NewWaitlistUser {
                email: input.email,
                name: input.name,
                user_type: input.user_type,
                token: token.clone(),
            })
            .await?;

        let verify_url = format!(
            "{}/verify-email?token={}",
            self.site_url.as_str().trim_end_matches('/'),
            token
        );
        let (subject, html) = verification_email(&user.name, &verify_url);

        let email_dispatch = match self
            .mailer
            .send(&self.email_from, &user.email, &subject, &html)
            .await
        {
            Ok(message_id) => EmailDispatchOutcome::Delivered { message_id },
            Err(err) => {
                warn!(error = ?err, user_id = %user.id, "verification email send failed; user and token remain valid");
                EmailDispatchOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };

        Ok(RegistrationOutcome {
            user,
            email_dispatch,
        })
    }
}

/// 32 bytes from the OS RNG, url-safe base64 without padding; safe to
/// embed in a query string as-is.
pub fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
