pub mod registration;
pub mod verification;
pub mod welcome;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::app_error::AppResult;
use crate::domain::entities::waitlist_user::{UserType, WaitlistUser};

#[derive(Debug, Clone)]
pub struct NewWaitlistUser {
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub token: String,
}

/// A token resolved to its owning user. The row survives consumption so a
/// repeated click can still be answered idempotently.
#[derive(Debug, Clone)]
pub struct TokenLookup {
    pub user: WaitlistUser,
    pub issued_at: NaiveDateTime,
}

#[async_trait]
pub trait WaitlistRepo: Send + Sync {
    /// Inserts the user row and its token row. A duplicate normalized email
    /// must surface as `AppError::AlreadyRegistered`.
    async fn create_user(&self, new: NewWaitlistUser) -> AppResult<WaitlistUser>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<TokenLookup>>;

    /// The PENDING -> CONSUMED transition as one conditional update: set
    /// `is_verified`, clear `verification_token`, mark the token row
    /// consumed, but only where the user is still unverified. Returns the
    /// number of user rows affected; 0 means a concurrent call won the race.
    async fn consume_token(&self, user_id: Uuid) -> AppResult<u64>;

    /// Narrowed retry used when `consume_token` fails at the store: update
    /// by id alone, without the unverified predicate.
    async fn force_verify(&self, user_id: Uuid) -> AppResult<()>;

    /// Batch/cron variant of the welcome flow: the most recently updated
    /// verified user that has completed the quiz.
    async fn latest_welcome_candidate(&self) -> AppResult<Option<WaitlistUser>>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one email and returns the provider message id.
    async fn send(&self, from: &str, to: &str, subject: &str, html: &str) -> AppResult<String>;

    /// False when the provider credential is missing, so handlers can
    /// answer 503 before taking any side effect.
    fn is_configured(&self) -> bool;
}
