use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::account::{join_token, split_token, AccountKind, AccountRecord};
use crate::util::account_token::AccountToken;

pub const DEFAULT_USER_ROLE: &str = "student";

/// Free-form profile attributes (language, level, interests, ...)
pub type Profile = serde_json::Map<String, serde_json::Value>;

/// Student account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Public six-digit number
    pub user_id: u32,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub soft_skill_score: f64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub profile: Profile,
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

fn default_role() -> String {
    DEFAULT_USER_ROLE.to_string()
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Option<String>) -> Self {
        User {
            id: None,
            user_id: 0,
            name,
            email,
            password_hash,
            role: role.filter(|r| !r.trim().is_empty()).unwrap_or_else(default_role),
            soft_skill_score: 0.0,
            progress: 0.0,
            profile: Profile::new(),
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

impl AccountRecord for User {
    const KIND: AccountKind = AccountKind::User;
    const EMAIL_FIELD: &'static str = "email";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn role(&self) -> &str {
        if self.role.is_empty() {
            DEFAULT_USER_ROLE
        } else {
            &self.role
        }
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
