//! In-memory mock implementations for the repository and mailer ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{Mailer, NewWaitlistUser, TokenLookup, WaitlistRepo},
    domain::entities::waitlist_user::WaitlistUser,
};

// ============================================================================
// InMemoryWaitlistRepo
// ============================================================================

struct TokenRecord {
    user_id: Uuid,
    created_at: NaiveDateTime,
    consumed_at: Option<NaiveDateTime>,
}

#[derive(Default)]
struct RepoInner {
    users: HashMap<Uuid, WaitlistUser>,
    tokens: HashMap<String, TokenRecord>,
}

/// In-memory implementation of `WaitlistRepo`. Both maps live behind one
/// mutex so the consume path is as atomic as the real conditional UPDATE.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    inner: Mutex<RepoInner>,
    lookups: AtomicUsize,
    fail_next_consume: AtomicBool,
    fail_next_force: AtomicBool,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user; when it carries a pending token, the token record is
    /// wired up too.
    pub fn insert(&self, user: WaitlistUser) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(token) = &user.verification_token {
            inner.tokens.insert(
                token.clone(),
                TokenRecord {
                    user_id: user.id,
                    created_at: user.created_at,
                    consumed_at: None,
                },
            );
        }
        inner.users.insert(user.id, user);
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn get_by_email(&self, email: &str) -> Option<WaitlistUser> {
        self.inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Number of `find_by_token` calls that reached the store.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Backdate a token's issuance, for TTL tests.
    pub fn age_token(&self, token: &str, by: Duration) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(record) = inner.tokens.get_mut(token) {
            record.created_at -= by;
        }
    }

    pub fn fail_next_consume(&self) {
        self.fail_next_consume.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_force_verify(&self) {
        self.fail_next_force.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WaitlistRepo for InMemoryWaitlistRepo {
    async fn create_user(&self, new: NewWaitlistUser) -> AppResult<WaitlistUser> {
        let mut inner = self.inner.lock().unwrap();

        if inner.users.values().any(|u| u.email == new.email) {
            return Err(AppError::AlreadyRegistered);
        }
        if inner.tokens.contains_key(&new.token) {
            return Err(AppError::Database(
                "duplicate verification token".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let user = WaitlistUser {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            user_type: new.user_type,
            is_verified: false,
            verification_token: Some(new.token.clone()),
            quiz_completed: false,
            waitlist_position: None,
            created_at: now,
            updated_at: now,
        };

        inner.tokens.insert(
            new.token,
            TokenRecord {
                user_id: user.id,
                created_at: now,
                consumed_at: None,
            },
        );
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<TokenLookup>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        let Some(record) = inner.tokens.get(token) else {
            return Ok(None);
        };
        let user = inner
            .users
            .get(&record.user_id)
            .cloned()
            .ok_or_else(|| AppError::Database("token points at missing user".to_string()))?;
        Ok(Some(TokenLookup {
            user,
            issued_at: record.created_at,
        }))
    }

    async fn consume_token(&self, user_id: Uuid) -> AppResult<u64> {
        if self.fail_next_consume.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database("injected consume failure".to_string()));
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(0);
        };
        if user.is_verified {
            return Ok(0);
        }

        let now = chrono::Utc::now().naive_utc();
        user.is_verified = true;
        user.verification_token = None;
        user.updated_at = now;
        for record in inner.tokens.values_mut() {
            if record.user_id == user_id && record.consumed_at.is_none() {
                record.consumed_at = Some(now);
            }
        }
        Ok(1)
    }

    async fn force_verify(&self, user_id: Uuid) -> AppResult<()> {
        if self.fail_next_force.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(
                "injected force-verify failure".to_string(),
            ));
        }

        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::Database("no such user".to_string()))?;
        user.is_verified = true;
        user.verification_token = None;
        user.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    async fn latest_welcome_candidate(&self) -> AppResult<Option<WaitlistUser>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .filter(|u| u.is_verified && u.quiz_completed)
            .max_by_key(|u| u.updated_at)
            .cloned())
    }
}

// ============================================================================
// InMemoryMailer
// ============================================================================

#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub enum MailerMode {
    Deliver,
    /// `is_configured()` reports false, like a missing provider key.
    Unconfigured,
    FailAll(String),
    RateLimited {
        retry_after_secs: u64,
    },
    /// Rejects sends from the given identity; others deliver. Exercises
    /// the fallback-sender path.
    RejectFrom(String),
}

pub struct InMemoryMailer {
    sent: Mutex<Vec<CapturedEmail>>,
    mode: Mutex<MailerMode>,
    attempts: AtomicUsize,
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            mode: Mutex::new(MailerMode::Deliver),
            attempts: AtomicUsize::new(0),
        }
    }
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&self, mode: MailerMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn captured_emails(&self) -> Vec<CapturedEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn capture(&self, from: &str, to: &str, subject: &str, html: &str) -> String {
        self.sent.lock().unwrap().push(CapturedEmail {
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        format!("msg_test{}", Uuid::new_v4().simple())
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, from: &str, to: &str, subject: &str, html: &str) -> AppResult<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let mode = self.mode.lock().unwrap().clone();
        match mode {
            MailerMode::Deliver => Ok(self.capture(from, to, subject, html)),
            MailerMode::Unconfigured => Err(AppError::DependencyUnavailable(
                "mailer not configured".to_string(),
            )),
            MailerMode::FailAll(reason) => Err(AppError::Internal(reason)),
            MailerMode::RateLimited { retry_after_secs } => {
                Err(AppError::RateLimited { retry_after_secs })
            }
            MailerMode::RejectFrom(rejected) if rejected == from => Err(AppError::Internal(
                format!("sender identity {from} not verified"),
            )),
            MailerMode::RejectFrom(_) => Ok(self.capture(from, to, subject, html)),
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(*self.mode.lock().unwrap(), MailerMode::Unconfigured)
    }
}
