use std::sync::Arc;

use crate::{
    application::use_cases::{
        registration::RegistrationUseCases, verification::VerificationUseCases,
        welcome::WelcomeUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registration: Arc<RegistrationUseCases>,
    pub verification: Arc<VerificationUseCases>,
    pub welcome: Arc<WelcomeUseCases>,
}
