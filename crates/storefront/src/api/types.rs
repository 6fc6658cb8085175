//! Wire types for the remote shop API.

use boardhouse_core::UserId;
use serde::{Deserialize, Serialize};

/// Body for `POST /auth/login/`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body for `POST /auth/register/`.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Token pair returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Created-user confirmation returned by registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    #[serde(default)]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_deserializes() {
        let json = r#"{"access": "a.b.c", "refresh": "d.e.f"}"#;
        let tokens: TokenPair = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.access, "a.b.c");
        assert_eq!(tokens.refresh, "d.e.f");
    }

    #[test]
    fn test_registered_user_tolerates_missing_fields() {
        let json = r#"{"username": "demo"}"#;
        let user: RegisteredUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "demo");
        assert!(user.id.is_none());
        assert!(user.email.is_empty());
    }
}
