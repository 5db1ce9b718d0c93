use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of audiences the waitlist accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    CatParent,
    CatteryOwner,
}

impl UserType {
    /// Wire values accepted in payloads, in the order they are reported
    /// back on validation failure.
    pub const ALLOWED: [&'static str; 2] = ["cat-parent", "cattery-owner"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "cat-parent" => Some(Self::CatParent),
            "cattery-owner" => Some(Self::CatteryOwner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatParent => "cat-parent",
            Self::CatteryOwner => "cattery-owner",
        }
    }
}

/// The token lifecycle made explicit: a user is either waiting on its
/// single-use secret or has consumed it. The pair (verified, token set)
/// is unrepresentable here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    Pending { token: String },
    Verified,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub is_verified: bool,
    // The live secret never rides along when a user is serialized into a
    // response body; callers that may see it get it as a separate field.
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub quiz_completed: bool,
    pub waitlist_position: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WaitlistUser {
    pub fn verification_state(&self) -> VerificationState {
        match (&self.verification_token, self.is_verified) {
            (Some(token), false) => VerificationState::Pending {
                token: token.clone(),
            },
            _ => VerificationState::Verified,
        }
    }
}
