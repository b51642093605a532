use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{User, UserBrief};
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserLogin {
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AdminUserCreate {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub(crate) name: String,
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) role: UserRole,
    #[serde(default = "default_true")]
    #[serde(alias = "isActive")]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AdminUserUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    pub(crate) is_active: Option<bool>,
    /// Only read to reject it: a user keeps the role it was created with.
    #[serde(default)]
    pub(crate) role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
            updated_at: format_primitive(user.updated_at),
        }
    }
}

/// `{id, name, email}` as embedded in class payloads.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UserRef {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
}

impl From<UserBrief> for UserRef {
    fn from(user: UserBrief) -> Self {
        Self { id: user.id, name: user.name, email: user.email }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn update_surfaces_role_field() {
        let parsed: AdminUserUpdate =
            serde_json::from_str(r#"{"role":"admin","isActive":false}"#).expect("payload");
        assert_eq!(parsed.role, Some(UserRole::Admin));
        assert_eq!(parsed.is_active, Some(false));
    }

    #[test]
    fn create_validates_email() {
        let payload: AdminUserCreate = serde_json::from_value(serde_json::json!({
            "name": "Nadia",
            "email": "not-an-email",
            "password": "long-enough",
            "role": "teacher"
        }))
        .expect("payload");
        assert!(payload.validate().is_err());
        assert!(payload.is_active);
    }
}
