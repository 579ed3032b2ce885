use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::account::{AccountKind, AccountRecord};

/// Login-only administrator account. Admins have no email verification or
/// password reset flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Admin {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Admin {
            id: None,
            name,
            email,
            password_hash,
            created_at: None,
            updated_at: None,
        }
    }
}

impl AccountRecord for Admin {
    const KIND: AccountKind = AccountKind::Admin;
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
        "admin"
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
}
