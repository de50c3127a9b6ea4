use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub profile_pic: Option<String>,
    pub about: Option<String>,
    pub full_name: Option<String>,
}

/// The subset of an update request that would actually change the record.
#[derive(Debug, PartialEq)]
pub struct ProfileChanges {
    /// Raw data URI, still to be uploaded.
    pub profile_pic: Option<String>,
    pub about: Option<String>,
    pub full_name: Option<String>,
}

impl UpdateProfileRequest {
    /// Drop fields that would not change anything: an empty `profile_pic`
    /// and a blank `full_name` are ignored; `about` counts even when empty.
    pub fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            profile_pic: self.profile_pic.filter(|p| !p.is_empty()),
            about: self.about,
            full_name: self
                .full_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.profile_pic.is_none() && self.about.is_none() && self.full_name.is_none()
    }
}

/// Body for the mute/unmute toggles.
#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    #[serde(default)]
    pub conversation_user_id: Option<Uuid>,
}

/// Public part of the user returned after signup and login.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub profile_pic: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            profile_pic: user.profile_pic,
        }
    }
}

/// Plain `{message}` success payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for the mute/unmute toggles.
#[derive(Debug, Serialize)]
pub struct MutedConversationsResponse {
    pub success: bool,
    pub muted_conversations: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        profile_pic: Option<&str>,
        about: Option<&str>,
        full_name: Option<&str>,
    ) -> UpdateProfileRequest {
        UpdateProfileRequest {
            profile_pic: profile_pic.map(str::to_string),
            about: about.map(str::to_string),
            full_name: full_name.map(str::to_string),
        }
    }

    #[test]
    fn empty_request_yields_no_changes() {
        assert!(request(None, None, None).into_changes().is_empty());
    }

    #[test]
    fn empty_about_still_counts_as_a_change() {
        let changes = request(None, Some(""), None).into_changes();
        assert!(!changes.is_empty());
        assert_eq!(changes.about.as_deref(), Some(""));
    }

    #[test]
    fn blank_full_name_alone_is_not_a_change() {
        assert!(request(None, None, Some("   ")).into_changes().is_empty());
    }

    #[test]
    fn full_name_is_trimmed() {
        let changes = request(None, None, Some("  Alice Doe  ")).into_changes();
        assert_eq!(changes.full_name.as_deref(), Some("Alice Doe"));
    }

    #[test]
    fn empty_profile_pic_is_ignored() {
        assert!(request(Some(""), None, None).into_changes().is_empty());
    }

    #[test]
    fn public_user_serialization_has_no_password_field() {
        let view = PublicUser {
            id: Uuid::new_v4(),
            full_name: "Alice".into(),
            email: "a@x.com".into(),
            profile_pic: String::new(),
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("a@x.com"));
        assert!(!json.contains("password"));
    }
}
