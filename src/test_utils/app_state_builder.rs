//! Test app state builder for HTTP-level integration testing.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        Mailer, WaitlistRepo, registration::RegistrationUseCases,
        verification::VerificationUseCases, welcome::WelcomeUseCases,
    },
    domain::entities::waitlist_user::WaitlistUser,
    infra::config::AppConfig,
    test_utils::{InMemoryMailer, InMemoryWaitlistRepo, MailerMode},
};

pub const TEST_SITE_URL: &str = "https://purrfectstays.example";
pub const TEST_SERVICE_KEY: &str = "test-service-key";
pub const TEST_EMAIL_FROM: &str = "Purrfect Stays <hello@purrfectstays.example>";
pub const TEST_EMAIL_FROM_FALLBACK: &str = "Purrfect Stays <onboarding@resend.dev>";

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let (app_state, repo, mailer) = TestAppStateBuilder::new()
///     .with_user(create_test_user(|u| u.email = "a@example.com".into()))
///     .build();
/// ```
pub struct TestAppStateBuilder {
    users: Vec<WaitlistUser>,
    mailer_mode: MailerMode,
    token_ttl_hours: i64,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            mailer_mode: MailerMode::Deliver,
            token_ttl_hours: 72,
        }
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: WaitlistUser) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_mailer_mode(mut self, mode: MailerMode) -> Self {
        self.mailer_mode = mode;
        self
    }

    pub fn with_token_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_hours = hours;
        self
    }

    pub fn build(self) -> (AppState, Arc<InMemoryWaitlistRepo>, Arc<InMemoryMailer>) {
        let repo = Arc::new(InMemoryWaitlistRepo::new());
        for user in self.users {
            repo.insert(user);
        }

        let mailer = Arc::new(InMemoryMailer::new());
        mailer.set_mode(self.mailer_mode);

        let config = AppConfig {
            site_url: Url::parse(TEST_SITE_URL).unwrap(),
            allowed_origins: vec![HeaderValue::from_static("http://localhost:3000")],
            resend_api_key: SecretString::from("re_test_key".to_string()),
            service_api_key: SecretString::from(TEST_SERVICE_KEY.to_string()),
            database_url: SecretString::from("postgres://unused".to_string()),
            email_from: TEST_EMAIL_FROM.to_string(),
            email_from_fallback: TEST_EMAIL_FROM_FALLBACK.to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            token_ttl: chrono::Duration::hours(self.token_ttl_hours),
        };

        let repo_dyn = repo.clone() as Arc<dyn WaitlistRepo>;
        let mailer_dyn = mailer.clone() as Arc<dyn Mailer>;

        let registration = RegistrationUseCases::new(
            repo_dyn.clone(),
            mailer_dyn.clone(),
            config.site_url.clone(),
            config.email_from.clone(),
        );
        let verification = VerificationUseCases::new(repo_dyn.clone(), config.token_ttl);
        let welcome = WelcomeUseCases::new(
            repo_dyn,
            mailer_dyn,
            config.email_from.clone(),
            config.email_from_fallback.clone(),
        );

        let app_state = AppState {
            config: Arc::new(config),
            registration: Arc::new(registration),
            verification: Arc::new(verification),
            welcome: Arc::new(welcome),
        };

        (app_state, repo, mailer)
    }
}
