use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::WaitlistRepo;
use crate::application::validators::is_plausible_token;
use crate::domain::entities::waitlist_user::{UserType, WaitlistUser};

/// Identity returned to the caller so it can resume its onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: Uuid,
    pub user_type: UserType,
    pub name: String,
    pub email: String,
}

impl From<&WaitlistUser> for VerifiedIdentity {
    fn from(user: &WaitlistUser) -> Self {
        Self {
            user_id: user.id,
            user_type: user.user_type,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// This call performed the PENDING -> CONSUMED transition.
    Verified(VerifiedIdentity),
    /// The token was consumed earlier (or concurrently); safe to repeat.
    AlreadyVerified(VerifiedIdentity),
}

impl VerifyOutcome {
    pub fn identity(&self) -> &VerifiedIdentity {
        match self {
            VerifyOutcome::Verified(id) | VerifyOutcome::AlreadyVerified(id) => id,
        }
    }
}

#[derive(Clone)]
pub struct VerificationUseCases {
    repo: Arc<dyn WaitlistRepo>,
    token_ttl: Duration,
}

impl VerificationUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepo>, token_ttl: Duration) -> Self {
        Self { repo, token_ttl }
    }

    /// Consumes a verification token at most once.
    ///
    /// Unknown and expired tokens produce the same response on purpose:
    /// the endpoint must not reveal which tokens ever existed. A token that
    /// was already consumed resolves to its owner and succeeds
    /// idempotently, so duplicate clicks and client retries are safe.
    #[instrument(skip(self, raw_token))]
    pub async fn verify(&self, raw_token: &str) -> AppResult<VerifyOutcome> {
        let token = raw_token.trim();
        if !is_plausible_token(token) {
            return Err(AppError::InvalidToken);
        }

        let lookup = self
            .repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::NotFoundOrExpired)?;

        if lookup.user.is_verified {
            return Ok(VerifyOutcome::AlreadyVerified((&lookup.user).into()));
        }

        if Utc::now().naive_utc() - lookup.issued_at > self.token_ttl {
            return Err(AppError::NotFoundOrExpired);
        }

        let identity: VerifiedIdentity = (&lookup.user).into();
        match self.repo.consume_token(lookup.user.id).await {
            // Zero affected rows: a concurrent call flipped the user first.
            Ok(0) => Ok(VerifyOutcome::AlreadyVerified(identity)),
            Ok(_) => Ok(VerifyOutcome::Verified(identity)),
            Err(err) => {
                warn!(error = ?err, user_id = %lookup.user.id, "conditional verify update failed, retrying by id");
                self.repo
                    .force_verify(lookup.user.id)
                    .await
                    .map_err(|retry_err| {
                        AppError::DependencyUnavailable(format!(
                            "verification update failed twice: {retry_err}"
                        ))
                    })?;
                Ok(VerifyOutcome::Verified(identity))
            }
        }
    }
}
