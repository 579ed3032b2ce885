use bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

use crate::util::account_token::AccountToken;

/// Which collection an authenticated principal lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    User,
    Supervisor,
    Admin,
}

impl AccountKind {
    /// Maps a token role tag onto an account kind. Roles are free text for
    /// users ("student", "user", ...), so anything unknown is a user.
    pub fn from_role(role: &str) -> Self {
        match role {
            "admin" => AccountKind::Admin,
            "supervisor" => AccountKind::Supervisor,
            _ => AccountKind::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::User => "user",
            AccountKind::Supervisor => "supervisor",
            AccountKind::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common surface of the persisted account documents.
///
/// Supervisors keep the capitalized legacy field names in the database, so
/// the storage field used for email lookups is part of the trait.
pub trait AccountRecord: Clone + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const KIND: AccountKind;
    const EMAIL_FIELD: &'static str;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);
    fn name(&self) -> &str;
    fn email(&self) -> &str;
    /// Role tag carried in issued tokens
    fn role(&self) -> &str;
    fn password_hash(&self) -> &str;
    fn set_password_hash(&mut self, hash: String);
    fn set_timestamps(&mut self, created_at: Option<String>, updated_at: String);

    fn is_email_verified(&self) -> bool {
        true
    }
    fn verification_token(&self) -> Option<AccountToken> {
        None
    }
    /// Marks the email verified and forgets the verification token
    fn mark_email_verified(&mut self) {}
    fn reset_token(&self) -> Option<AccountToken> {
        None
    }
    fn set_reset_token(&mut self, _token: Option<AccountToken>) {}

    fn id_hex(&self) -> String {
        self.id().map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Identity of the caller, resolved from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: ObjectId,
    pub kind: AccountKind,
    pub role: String,
    pub email: String,
}

/// Normalizes an email for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn split_token(token: Option<AccountToken>) -> (Option<String>, Option<i64>) {
    match token {
        Some(t) => (Some(t.value), Some(t.expires_at)),
        None => (None, None),
    }
}

pub(crate) fn join_token(value: &Option<String>, expires_at: Option<i64>) -> Option<AccountToken> {
    match (value, expires_at) {
        (Some(value), Some(expires_at)) => Some(AccountToken {
            value: value.clone(),
            expires_at,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_role() {
        assert_eq!(AccountKind::from_role("admin"), AccountKind::Admin);
        assert_eq!(AccountKind::from_role("supervisor"), AccountKind::Supervisor);
        assert_eq!(AccountKind::from_role("student"), AccountKind::User);
        assert_eq!(AccountKind::from_role("user"), AccountKind::User);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_token_split_roundtrip_requires_both_halves() {
        assert!(join_token(&Some("abc".to_string()), None).is_none());
        let (value, expiry) = split_token(Some(AccountToken {
            value: "abc".to_string(),
            expires_at: 42,
        }));
        let joined = join_token(&value, expiry).unwrap();
        assert_eq!(joined.value, "abc");
        assert_eq!(joined.expires_at, 42);
    }
}
