//! Principal models: users who book and owners who list properties

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// The two kinds of authenticated actors.
///
/// The serialized form doubles as the role tag stored on each principal row
/// and as the `kind` claim inside issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    User,
    PropertyOwner,
}

impl PrincipalKind {
    /// Role tag persisted alongside the principal
    pub fn role(self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::PropertyOwner => "property_owner",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Property owner entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyOwner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New property owner creation payload (password already hashed)
#[derive(Debug, Clone)]
pub struct NewPropertyOwner {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public projection of an owner embedded in property views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
}

/// Signup body shared by users and property owners
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login body shared by users and property owners
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_kind_role_tags() {
        assert_eq!(PrincipalKind::User.role(), "user");
        assert_eq!(PrincipalKind::PropertyOwner.role(), "property_owner");
        assert_eq!(
            serde_json::to_value(PrincipalKind::PropertyOwner).unwrap(),
            serde_json::json!("property_owner")
        );
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: PrincipalKind::User.role().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "alice@x.com");
    }
}
