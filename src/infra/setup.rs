use crate::{
    adapters::{email::resend::ResendMailer, http::app_state::AppState},
    application::use_cases::{
        Mailer, WaitlistRepo, registration::RegistrationUseCases,
        verification::VerificationUseCases, welcome::WelcomeUseCases,
    },
    infra::{config::AppConfig, postgres_persistence},
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);
    let repo = postgres_arc as Arc<dyn WaitlistRepo>;

    let mailer = Arc::new(ResendMailer::new(config.resend_api_key.clone())) as Arc<dyn Mailer>;

    let registration = RegistrationUseCases::new(
        repo.clone(),
        mailer.clone(),
        config.site_url.clone(),
        config.email_from.clone(),
    );
    let verification = VerificationUseCases::new(repo.clone(), config.token_ttl);
    let welcome = WelcomeUseCases::new(
        repo,
        mailer,
        config.email_from.clone(),
        config.email_from_fallback.clone(),
    );

    Ok(AppState {
        config: Arc::new(config),
        registration: Arc::new(registration),
        verification: Arc::new(verification),
        welcome: Arc::new(welcome),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "purrfect_waitlist=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
