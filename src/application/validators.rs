use validator::ValidateEmail;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::waitlist_user::UserType;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NAME_LEN: usize = 100;
/// Issued tokens are 43 chars (32 bytes, base64 url-safe); anything much
/// shorter is rejected before a storage round trip.
pub const MIN_TOKEN_LEN: usize = 16;

/// Validates that the input looks like a valid email address.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.len() <= MAX_EMAIL_LEN && email.validate_email()
}

/// Lowercased, trimmed form used for the uniqueness constraint.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Strips HTML tags and stray angle brackets from a display name. Tag
/// contents are dropped wholesale so `<script>` payloads leave nothing
/// executable behind.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {}
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Shape check applied before any storage lookup. Issued tokens are
/// url-safe base64, so anything outside that alphabet is malformed.
pub fn is_plausible_token(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    /// Caller-supplied token (the resend path); generated when absent.
    pub token: Option<String>,
}

/// Validates and normalizes a registration payload, collecting every field
/// problem before reporting. Runs before any persistence or network call.
pub fn validate_registration(
    email: &str,
    name: &str,
    user_type: &str,
    token: Option<&str>,
) -> AppResult<RegistrationInput> {
    let mut details = Vec::new();

    if !is_valid_email(email) {
        details.push(format!(
            "email must be a valid address of at most {MAX_EMAIL_LEN} characters"
        ));
    }

    let name = sanitize_name(name);
    if name.is_empty() {
        details.push("name must not be empty".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        details.push(format!("name must be at most {MAX_NAME_LEN} characters"));
    }

    let parsed_type = UserType::parse(user_type);
    if parsed_type.is_none() {
        details.push(format!(
            "userType must be one of: {}",
            UserType::ALLOWED.join(", ")
        ));
    }

    if let Some(token) = token
        && !is_plausible_token(token)
    {
        details.push("verificationToken is malformed".to_string());
    }

    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    Ok(RegistrationInput {
        email: normalize_email(email),
        name,
        // Checked non-None above.
        user_type: parsed_type.unwrap(),
        token: token.map(str::to_string),
    })
}

#[derive(Debug, Clone)]
pub struct WelcomeInput {
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub waitlist_position: i64,
}

/// Validates a direct-invocation welcome payload. The position is rejected
/// (not coerced) when non-positive.
pub fn validate_welcome(
    email: &str,
    name: &str,
    user_type: &str,
    waitlist_position: Option<i64>,
) -> AppResult<WelcomeInput> {
    let mut details = Vec::new();

    if !is_valid_email(email) {
        details.push(format!(
            "email must be a valid address of at most {MAX_EMAIL_LEN} characters"
        ));
    }

    let name = sanitize_name(name);
    if name.is_empty() {
        details.push("name must not be empty".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        details.push(format!("name must be at most {MAX_NAME_LEN} characters"));
    }

    let parsed_type = UserType::parse(user_type);
    if parsed_type.is_none() {
        details.push(format!(
            "userType must be one of: {}",
            UserType::ALLOWED.join(", ")
        ));
    }

    match waitlist_position {
        Some(pos) if pos >= 1 => {}
        Some(_) => details.push("waitlistPosition must be a positive integer".to_string()),
        None => details.push("waitlistPosition is required".to_string()),
    }

    if !details.is_empty() {
        return Err(AppError::Validation(details));
    }

    Ok(WelcomeInput {
        email: normalize_email(email),
        name,
        user_type: parsed_type.unwrap(),
        // Guarded by the match above.
        waitlist_position: waitlist_position.unwrap(),
    })
}
