use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Invalid verification token")]
    InvalidToken,

    #[error("Invalid or expired verification link")]
    NotFoundOrExpired,

    #[error("Email is already registered")]
    AlreadyRegistered,

    #[error("Not found")]
    NotFound,

    #[error("Missing or invalid credentials")]
    Unauthorized,

    #[error("Email provider rate limit hit")]
    RateLimited { retry_after_secs: u64 },

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    ValidationFailed,
    InvalidToken,
    InvalidOrExpiredToken,
    EmailAlreadyRegistered,
    NotFound,
    Unauthorized,
    RateLimited,
    ServiceUnavailable,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            ErrorCode::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
