use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub full_name: String,
    pub profile_pic: String,
    pub about: String,
    pub muted_conversations: Vec<Uuid>, // treated as a set, no duplicates
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            full_name: "Alice".into(),
            profile_pic: String::new(),
            about: "hi there".into(),
            muted_conversations: vec![],
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn serialization_never_emits_the_password_hash() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice@example.com"));
        assert!(json.contains("muted_conversations"));
    }

    #[test]
    fn deserialization_still_reads_the_hash() {
        let raw = r#"{
            "id": "7f1a1e2c-7a90-4b83-9e19-16c7da31f0a1",
            "email": "bob@example.com",
            "password_hash": "$argon2id$v=19$x",
            "full_name": "Bob",
            "profile_pic": "",
            "about": "",
            "muted_conversations": [],
            "created_at": "1970-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.password_hash, "$argon2id$v=19$x");
    }
}
