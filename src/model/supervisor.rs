use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::account::{join_token, split_token, AccountKind, AccountRecord};
use crate::util::account_token::AccountToken;

/// Instructor account. Field names match the legacy `supervisors` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supervisor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password_hash: String,
    #[serde(rename = "UserID", default)]
    pub user_id: u32,
    #[serde(default)]
    pub supervisor_id: u32,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    /// Assigned student ids; not checked against `users`
    #[serde(default)]
    pub students: Vec<ObjectId>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub email_verification_token: Option<String>,
    #[serde(default)]
    pub email_verification_expires: Option<i64>,
    #[serde(default)]
    pub reset_token: Option<String>,
    #[serde(default)]
    pub reset_token_expiry: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Supervisor {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Supervisor {
            id: None,
            username,
            email,
            password_hash,
            user_id: 0,
            supervisor_id: 0,
            department: None,
            specialization: None,
            students: Vec::new(),
            is_email_verified: false,
            email_verification_token: None,
            email_verification_expires: None,
            reset_token: None,
            reset_token_expiry: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn set_verification_token(&mut self, token: Option<AccountToken>) {
        let (value, expires) = split_token(token);
        self.email_verification_token = value;
        self.email_verification_expires = expires;
    }
}

impl AccountRecord for Supervisor {
    const KIND: AccountKind = AccountKind::Supervisor;
    const EMAIL_FIELD: &'static str = "Email";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn name(&self) -> &str {
        &self.username
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn role(&self) -> &str {
        "supervisor"
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }

    fn set_timestamps(&mut self, created_at: Option<String>, updated_at: String) {
        if created_at.is_some() {
            self.created_at = created_at;
        }
        self.updated_at = Some(updated_at);
    }

    fn is_email_verified(&self) -> bool {
        self.is_email_verified
    }

    fn verification_token(&self) -> Option<AccountToken> {
        join_token(&self.email_verification_token, self.email_verification_expires)
    }

    fn mark_email_verified(&mut self) {
        self.is_email_verified = true;
        self.set_verification_token(None);
    }

    fn reset_token(&self) -> Option<AccountToken> {
        join_token(&self.reset_token, self.reset_token_expiry)
    }

    fn set_reset_token(&mut self, token: Option<AccountToken>) {
        let (value, expiry) = split_token(token);
        self.reset_token = value;
        self.reset_token_expiry = expiry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_field_names() {
        let supervisor = Supervisor::new(
            "Test Supervisor".to_string(),
            "supervisor@example.com".to_string(),
            "hash".to_string(),
        );
        let doc = bson::to_document(&supervisor).unwrap();
        assert_eq!(doc.get_str("Username").unwrap(), "Test Supervisor");
        assert_eq!(doc.get_str("Email").unwrap(), "supervisor@example.com");
        assert_eq!(doc.get_str("Password").unwrap(), "hash");
        assert!(doc.contains_key("supervisorId"));
        assert!(!doc.contains_key("_id"));
    }
}
