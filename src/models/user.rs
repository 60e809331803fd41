//! User models.

use serde::{Deserialize, Serialize};

use super::SecretString;

fn default_true() -> bool {
    true
}

/// Entry of the user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleUser {
    pub name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    #[serde(default)]
    pub admin: bool,
    #[serde(default = "default_true")]
    pub profile_updatable: bool,
    #[serde(default, rename = "disableUIAccess")]
    pub disable_ui_access: bool,
    #[serde(default)]
    pub internal_password_disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl NewUser {
    /// A non-admin user with default flags.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            admin: false,
            profile_updatable: true,
            disable_ui_access: false,
            internal_password_disabled: false,
            groups: None,
        }
    }
}

/// Payload for updating a user. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default = "default_true")]
    pub profile_updatable: bool,
    #[serde(default, rename = "disableUIAccess")]
    pub disable_ui_access: bool,
    #[serde(default)]
    pub internal_password_disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl User {
    /// An update payload carrying only the name and default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            admin: false,
            profile_updatable: true,
            disable_ui_access: false,
            internal_password_disabled: false,
            groups: None,
        }
    }
}

/// A user as the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default = "default_true")]
    pub profile_updatable: bool,
    #[serde(default, rename = "disableUIAccess")]
    pub disable_ui_access: bool,
    #[serde(default)]
    pub internal_password_disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_logged_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(default)]
    pub offline_mode: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_serializes_password_and_wire_names() {
        let user = NewUser::new("alice", "alice@example.com", "s3cret");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["password"], "s3cret");
        assert_eq!(value["disableUIAccess"], false);
        assert_eq!(value["profileUpdatable"], true);
        assert!(value.get("groups").is_none());
        assert!(!format!("{user:?}").contains("s3cret"));
    }

    #[test]
    fn test_user_response_defaults() {
        let user: UserResponse =
            serde_json::from_str(r#"{"name": "bob", "email": "bob@example.com"}"#).unwrap();
        assert!(!user.admin);
        assert!(user.profile_updatable);
        assert!(!user.offline_mode);
        assert_eq!(user.last_logged_in, None);
    }
}
