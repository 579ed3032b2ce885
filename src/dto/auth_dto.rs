use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{AccountRecord, Supervisor};

// --- Requests ---
//
// Every field is optional so that absent values reach the service, which
// reports them by name instead of failing JSON extraction.

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserSignupRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
    /// Free text; "instructor" creates a supervisor account instead
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SupervisorSignupRequest {
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: Option<String>,
    /// "supervisor" or anything else for students
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
    pub user_type: Option<String>,
}

// --- Responses ---

/// Public view of an account, without credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl AccountSummary {
    pub fn from_account<A: AccountRecord>(account: &A) -> Self {
        AccountSummary {
            id: account.id_hex(),
            name: account.name().to_string(),
            email: account.email().to_string(),
            role: account.role().to_string(),
        }
    }
}

/// Supervisor accounts are presented with `fullName` to the frontend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

impl From<&Supervisor> for SupervisorSummary {
    fn from(supervisor: &Supervisor) -> Self {
        SupervisorSummary {
            id: supervisor.id_hex(),
            full_name: supervisor.username.clone(),
            email: supervisor.email.clone(),
            role: supervisor.role().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSignupResponse {
    pub message: String,
    pub user: AccountSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorSignupResponse {
    pub message: String,
    pub supervisor: SupervisorSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SignupResponse {
    User(UserSignupResponse),
    Supervisor(SupervisorSignupResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedEmail {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmEmailResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ConfirmedEmail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse<U> {
    pub token: String,
    pub refresh_token: String,
    pub user: U,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub details: String,
    /// Only returned in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}
