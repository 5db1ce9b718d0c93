//! Test data factories for creating valid test fixtures.
//!
//! Each factory creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::entities::waitlist_user::{UserType, WaitlistUser};

pub fn test_datetime() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Create a test waitlist user with sensible defaults.
pub fn create_test_user(overrides: impl FnOnce(&mut WaitlistUser)) -> WaitlistUser {
    let now = test_datetime();
    let mut user = WaitlistUser {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        name: "Ann".to_string(),
        user_type: UserType::CatParent,
        is_verified: false,
        verification_token: None,
        quiz_completed: false,
        waitlist_position: None,
        created_at: now,
        updated_at: now,
    };
    overrides(&mut user);
    user
}
