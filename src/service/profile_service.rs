use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::dto::profile_dto::{ProfileResponse, UpdateProfileRequest};
use crate::model::{AccountKind, AccountRecord, AuthContext, Supervisor, User};
use crate::repository::Repositories;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, ctx: &AuthContext) -> Result<ProfileResponse, ServiceError>;
    async fn update_profile(&self, ctx: &AuthContext, req: UpdateProfileRequest) -> Result<ProfileResponse, ServiceError>;
}

pub struct ProfileServiceImpl {
    pub repos: Repositories,
}

fn user_profile(user: &User) -> ProfileResponse {
    ProfileResponse {
        id: user.id_hex(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role().to_string(),
        profile: Value::Object(user.profile.clone()),
    }
}

/// Supervisors expose their department and specialization as the profile.
fn supervisor_profile(supervisor: &Supervisor) -> ProfileResponse {
    let mut profile = Map::new();
    if let Some(department) = &supervisor.department {
        profile.insert("department".to_string(), Value::String(department.clone()));
    }
    if let Some(specialization) = &supervisor.specialization {
        profile.insert("specialization".to_string(), Value::String(specialization.clone()));
    }
    ProfileResponse {
        id: supervisor.id_hex(),
        name: supervisor.username.clone(),
        email: supervisor.email.clone(),
        role: supervisor.role().to_string(),
        profile: Value::Object(profile),
    }
}

fn new_name(req: &UpdateProfileRequest) -> Option<String> {
    req.name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("User not found".to_string())
}

impl ProfileServiceImpl {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn load_user(&self, ctx: &AuthContext) -> Result<User, ServiceError> {
        self.repos.users.find_by_id(&ctx.account_id).await?.ok_or_else(not_found)
    }

    async fn load_supervisor(&self, ctx: &AuthContext) -> Result<Supervisor, ServiceError> {
        self.repos.supervisors.find_by_id(&ctx.account_id).await?.ok_or_else(not_found)
    }
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    #[instrument(skip(self), fields(account_id = %ctx.account_id, kind = %ctx.kind))]
    async fn get_profile(&self, ctx: &AuthContext) -> Result<ProfileResponse, ServiceError> {
        match ctx.kind {
            AccountKind::User => Ok(user_profile(&self.load_user(ctx).await?)),
            AccountKind::Supervisor => Ok(supervisor_profile(&self.load_supervisor(ctx).await?)),
            AccountKind::Admin => {
                warn!("Profile requested for an admin account");
                Err(not_found())
            }
        }
    }

    #[instrument(skip(self, req), fields(account_id = %ctx.account_id, kind = %ctx.kind))]
    async fn update_profile(&self, ctx: &AuthContext, req: UpdateProfileRequest) -> Result<ProfileResponse, ServiceError> {
        match ctx.kind {
            AccountKind::User => {
                let mut user = self.load_user(ctx).await?;
                if let Some(name) = new_name(&req) {
                    user.name = name;
                }
                if let Some(changes) = req.profile {
                    for (key, value) in changes {
                        user.profile.insert(key, value);
                    }
                }
                let user = self.repos.users.update(user).await?;
                info!("Profile updated for user {}", user.email);
                Ok(user_profile(&user))
            }
            AccountKind::Supervisor => {
                let mut supervisor = self.load_supervisor(ctx).await?;
                if let Some(name) = new_name(&req) {
                    supervisor.username = name;
                }
                if let Some(changes) = req.profile {
                    // Only the two known attributes are stored for supervisors.
                    for (key, value) in changes {
                        let text = match value {
                            Value::String(s) => Some(s),
                            Value::Null => None,
                            other => Some(other.to_string()),
                        };
                        match key.as_str() {
                            "department" => supervisor.department = text,
                            "specialization" => supervisor.specialization = text,
                            _ => warn!("Ignoring unknown supervisor profile attribute {}", key),
                        }
                    }
                }
                let supervisor = self.repos.supervisors.update(supervisor).await?;
                info!("Profile updated for supervisor {}", supervisor.email);
                Ok(supervisor_profile(&supervisor))
            }
            AccountKind::Admin => Err(not_found()),
        }
    }
}
