use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use chrono::Duration;
use secrecy::SecretString;
use url::Url;

pub struct AppConfig {
    /// Public site base; verification links and redirects are built on it.
    pub site_url: Url,
    /// CORS allow-list: `ALLOWED_ORIGINS` (comma-separated) plus the site
    /// origin itself.
    pub allowed_origins: Vec<HeaderValue>,
    /// Left empty when unset; handlers answer 503 rather than the process
    /// refusing to boot, so the rest of the API stays up.
    pub resend_api_key: SecretString,
    /// Bearer credential required to invoke the registration function.
    pub service_api_key: SecretString,
    pub database_url: SecretString,
    pub email_from: String,
    pub email_from_fallback: String,
    pub bind_addr: SocketAddr,
    pub token_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let site_url: Url = env::var("SITE_URL")
            .expect("SITE_URL must be set")
            .parse()
            .expect("SITE_URL must be a valid URL");

        let mut allowed_origins: Vec<HeaderValue> = env::var("ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .expect("ALLOWED_ORIGINS entries must be valid header values")
            })
            .collect();
        let site_origin = site_url.origin().ascii_serialization();
        if !allowed_origins
            .iter()
            .any(|o| o.as_bytes() == site_origin.as_bytes())
        {
            allowed_origins.push(
                site_origin
                    .parse()
                    .expect("SITE_URL origin must be a valid header value"),
            );
        }

        let resend_api_key: SecretString =
            SecretString::from(env::var("RESEND_API_KEY").unwrap_or_default());
        let service_api_key: SecretString =
            SecretString::from(env::var("SERVICE_API_KEY").expect("SERVICE_API_KEY must be set"));
        let database_url: SecretString =
            SecretString::from(env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

        let email_from = env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "Purrfect Stays <hello@purrfectstays.org>".to_string());
        let email_from_fallback = env::var("EMAIL_FROM_FALLBACK")
            .unwrap_or_else(|_| "Purrfect Stays <onboarding@resend.dev>".to_string());

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let token_ttl_hours: i64 = env::var("VERIFICATION_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "72".to_string())
            .parse()
            .expect("VERIFICATION_TOKEN_TTL_HOURS must be a valid number");

        Self {
            site_url,
            allowed_origins,
            resend_api_key,
            service_api_key,
            database_url,
            email_from,
            email_from_fallback,
            bind_addr,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }
}
