use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{AccountTokenConfig, AdminUserConfig, Environment};
use crate::dto::auth_dto::{
    AccountSummary, ConfirmEmailResponse, ConfirmedEmail, ForgotPasswordRequest, ForgotPasswordResponse,
    LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest, RefreshTokenResponse, ResetPasswordRequest,
    SignupResponse, SupervisorSignupRequest, SupervisorSignupResponse, SupervisorSummary, UserSignupRequest,
    UserSignupResponse,
};
use crate::model::{normalize_email, AccountKind, AccountRecord, Admin, AuthContext, Supervisor, User};
use crate::repository::{AccountRepository, RepositoryError, Repositories};
use crate::util::account_token::{preview, AccountToken};
use crate::util::email::EmailSender;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordError, PasswordUtils, PasswordUtilsImpl};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const CONFIRMATION_INVALID: &str =
    "This confirmation link is invalid or has already been used. Redirecting to login...";
pub const CONFIRMATION_OK: &str = "Email confirmed successfully! You can now log in.";
const INSTRUCTOR_ROLE: &str = "instructor";

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn signup_user(&self, req: UserSignupRequest) -> Result<SignupResponse, ServiceError>;
    async fn signup_supervisor(&self, req: SupervisorSignupRequest) -> Result<SupervisorSignupResponse, ServiceError>;
    async fn confirm_user_email(&self, token: &str) -> Result<ConfirmEmailResponse, ServiceError>;
    async fn confirm_supervisor_email(&self, token: &str) -> Result<ConfirmEmailResponse, ServiceError>;
    async fn login_user(&self, req: LoginRequest) -> Result<LoginResponse<AccountSummary>, ServiceError>;
    async fn login_supervisor(&self, req: LoginRequest) -> Result<LoginResponse<SupervisorSummary>, ServiceError>;
    async fn login_admin(&self, req: LoginRequest) -> Result<LoginResponse<AccountSummary>, ServiceError>;
    /// Student accounts first, then supervisors
    async fn login(&self, req: LoginRequest) -> Result<LoginResponse<AccountSummary>, ServiceError>;
    async fn refresh_token(&self, req: RefreshTokenRequest) -> Result<RefreshTokenResponse, ServiceError>;
    async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<ForgotPasswordResponse, ServiceError>;
    async fn reset_password(&self, req: ResetPasswordRequest) -> Result<MessageResponse, ServiceError>;
    async fn current_account(&self, ctx: &AuthContext) -> Result<AccountSummary, ServiceError>;
    /// Creates the configured administrator when missing. Returns whether one was created.
    async fn ensure_admin(&self, config: &AdminUserConfig) -> Result<bool, ServiceError>;
}

pub struct AuthServiceImpl {
    pub repos: Repositories,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub email_sender: Arc<dyn EmailSender>,
    pub token_config: AccountTokenConfig,
    pub environment: Environment,
}

/// Fails with `MissingFields` naming every absent or blank value.
fn require_fields(message: &str, fields: &[(&str, &Option<String>, &str)]) -> Result<(), ServiceError> {
    let mut details = Map::new();
    for (name, value, reason) in fields {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            details.insert(name.to_string(), Value::String(reason.to_string()));
        }
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::MissingFields {
            message: message.to_string(),
            details: Value::Object(details),
        })
    }
}

fn check_password_strength(password: &str) -> Result<(), ServiceError> {
    match PasswordUtilsImpl::password_problems(password).into_iter().next() {
        Some(problem) => Err(ServiceError::InvalidInput(problem)),
        None => Ok(()),
    }
}

/// Six-digit public account number
fn random_account_number() -> u32 {
    rand::thread_rng().gen_range(100_000..1_000_000)
}

fn is_supervisor_type(user_type: Option<&str>) -> bool {
    user_type.map_or(false, |t| t.eq_ignore_ascii_case("supervisor"))
}

impl AuthServiceImpl {
    pub fn new(
        repos: Repositories,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        email_sender: Arc<dyn EmailSender>,
        token_config: AccountTokenConfig,
        environment: Environment,
    ) -> Self {
        Self { repos, jwt_utils, email_sender, token_config, environment }
    }

    fn credentials(req: LoginRequest) -> Result<(String, String), ServiceError> {
        require_fields(
            "Email and password are required",
            &[
                ("email", &req.email, "Email is required"),
                ("password", &req.password, "Password is required"),
            ],
        )?;
        match (req.email, req.password) {
            (Some(email), Some(password)) => Ok((normalize_email(&email), password)),
            _ => Err(ServiceError::InvalidInput("Email and password are required".to_string())),
        }
    }

    /// Password check first, then the verification gate, so an unverified
    /// account is only disclosed to someone holding its password.
    async fn authenticate<A: AccountRecord>(
        &self,
        repo: &dyn AccountRepository<A>,
        email: &str,
        password: &str,
    ) -> Result<A, ServiceError> {
        let account = match repo.find_by_email(email).await? {
            Some(account) => account,
            None => {
                warn!("No {} account for login email {}", A::KIND, email);
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };
        let verified = match PasswordUtilsImpl::verify_password(password, account.password_hash()) {
            Ok(verified) => verified,
            Err(PasswordError::InvalidHashFormat) => {
                warn!("Unreadable password hash stored for {} {}", A::KIND, email);
                false
            }
            Err(e) => return Err(e.into()),
        };
        if !verified {
            warn!("Password mismatch for {} {}", A::KIND, email);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        let account = if PasswordUtilsImpl::needs_rehash(account.password_hash()) {
            self.upgrade_password_hash(repo, account, password).await
        } else {
            account
        };
        if !account.is_email_verified() {
            info!("Login refused, {} {} has not verified their email", A::KIND, email);
            return Err(ServiceError::EmailNotVerified { email: account.email().to_string() });
        }
        Ok(account)
    }

    /// Replaces a legacy bcrypt hash once the password has been checked.
    /// Failures are logged and the login goes on with the old record.
    async fn upgrade_password_hash<A: AccountRecord>(
        &self,
        repo: &dyn AccountRepository<A>,
        account: A,
        password: &str,
    ) -> A {
        let mut upgraded = account.clone();
        match PasswordUtilsImpl::hash_password(password) {
            Ok(hash) => upgraded.set_password_hash(hash),
            Err(e) => {
                error!("Could not rehash legacy password of {} {}: {}", A::KIND, account.email(), e);
                return account;
            }
        }
        match repo.update(upgraded).await {
            Ok(updated) => {
                info!("Upgraded legacy password hash of {} {} to argon2id", A::KIND, updated.email());
                updated
            }
            Err(e) => {
                error!("Could not store upgraded password hash for {} {}: {}", A::KIND, account.email(), e);
                account
            }
        }
    }

    fn issue_tokens<A: AccountRecord>(&self, account: &A) -> Result<(String, String), ServiceError> {
        let pair = self
            .jwt_utils
            .generate_token_pair(&account.id_hex(), account.email(), account.role())?;
        Ok((pair.access_token, pair.refresh_token))
    }

    async fn send_confirmation<A: AccountRecord>(&self, account: &A, token: &AccountToken) {
        let url = self.token_config.confirmation_url(&token.value);
        match self.email_sender.send_confirmation_email(account.email(), account.name(), &url).await {
            Ok(()) => info!("Confirmation email sent to {}", account.email()),
            // Signup still succeeds; the account can ask for a new link later.
            Err(e) => error!("Error sending confirmation email to {}: {}", account.email(), e),
        }
    }

    async fn confirm_email<A: AccountRecord>(
        &self,
        repo: &dyn AccountRepository<A>,
        token: &str,
    ) -> Result<ConfirmEmailResponse, ServiceError> {
        let invalid = || ConfirmEmailResponse {
            message: CONFIRMATION_INVALID.to_string(),
            already_verified: Some(false),
            user: None,
        };

        let mut account = match repo.find_by_verification_token(token).await? {
            Some(account) => account,
            None => {
                info!("Unknown {} confirmation token {}...", A::KIND, preview(token));
                return Ok(invalid());
            }
        };
        if account.verification_token().map_or(true, |t| t.is_expired()) {
            info!("Expired confirmation token for {} {}", A::KIND, account.email());
            return Ok(invalid());
        }

        account.mark_email_verified();
        let account = repo.update(account).await?;
        info!("{} {} confirmed their email", A::KIND, account.email());
        Ok(ConfirmEmailResponse {
            message: CONFIRMATION_OK.to_string(),
            already_verified: None,
            user: Some(ConfirmedEmail { email: account.email().to_string() }),
        })
    }

    async fn issue_reset_token<A: AccountRecord>(
        &self,
        repo: &dyn AccountRepository<A>,
        email: &str,
        user_type: &str,
    ) -> Result<ForgotPasswordResponse, ServiceError> {
        let mut account = repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let token = AccountToken::generate(self.token_config.token_bytes, self.token_config.reset_expiration_secs);
        account.set_reset_token(Some(token.clone()));
        let account = repo.update(account).await?;
        debug!("Reset token {}... stored for {} {}", preview(&token.value), A::KIND, email);

        let reset_url = self.token_config.reset_url(&token.value, user_type);
        let mut response = ForgotPasswordResponse {
            message: "Password reset email sent".to_string(),
            details: "Please check your email for password reset instructions".to_string(),
            reset_url: None,
        };

        if self.environment.is_development() {
            info!("Development mode, returning reset link for {} instead of mailing it", email);
            response.reset_url = Some(reset_url);
            return Ok(response);
        }

        self.email_sender
            .send_password_reset_email(account.email(), account.name(), &reset_url)
            .await
            .map_err(|e| {
                error!("Error sending reset email to {}: {}", email, e);
                ServiceError::InternalError(format!("Error sending reset email: {}", e))
            })?;
        Ok(response)
    }

    async fn reset_with_token<A: AccountRecord>(
        &self,
        repo: &dyn AccountRepository<A>,
        token: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        let mut account = repo
            .find_by_reset_token(token)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput("Invalid reset token".to_string()))?;

        if account.reset_token().map_or(true, |t| t.is_expired()) {
            info!("Expired reset token presented for {} {}", A::KIND, account.email());
            return Err(ServiceError::InvalidInput(
                "Reset token has expired. Please request a new one.".to_string(),
            ));
        }

        account.set_password_hash(PasswordUtilsImpl::hash_password(password)?);
        account.set_reset_token(None);
        let account = repo.update(account).await?;
        info!("Password reset for {} {}", A::KIND, account.email());
        Ok(())
    }

    async fn find_summary<A: AccountRecord>(
        &self,
        repo: &dyn AccountRepository<A>,
        ctx: &AuthContext,
    ) -> Result<AccountSummary, ServiceError> {
        repo.find_by_id(&ctx.account_id)
            .await?
            .map(|account| AccountSummary::from_account(&account))
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    #[instrument(skip(self, req), fields(email = ?req.email))]
    async fn signup_user(&self, req: UserSignupRequest) -> Result<SignupResponse, ServiceError> {
        require_fields(
            "Missing required fields",
            &[
                ("name", &req.name, "Name is required"),
                ("email", &req.email, "Email is required"),
                ("password", &req.password, "Password is required"),
            ],
        )?;

        let role = req.role.as_deref().map(str::trim).filter(|r| !r.is_empty());
        if role == Some(INSTRUCTOR_ROLE) {
            info!("Instructor signup routed to supervisor accounts");
            let supervisor = self
                .signup_supervisor(SupervisorSignupRequest {
                    full_name: req.name,
                    email: req.email,
                    password: req.password,
                })
                .await?;
            return Ok(SignupResponse::Supervisor(supervisor));
        }
        if let Some(role) = role {
            if AccountKind::from_role(role) != AccountKind::User {
                warn!("Rejected self-assigned role {}", role);
                return Err(ServiceError::InvalidInput("Invalid role".to_string()));
            }
        }

        let (Some(name), Some(email), Some(password)) = (req.name, req.email, req.password) else {
            return Err(ServiceError::InvalidInput("Missing required fields".to_string()));
        };
        check_password_strength(&password)?;
        let email = normalize_email(&email);

        if self.repos.users.find_by_email(&email).await?.is_some() {
            warn!("User already exists: {}", email);
            return Err(ServiceError::AlreadyExists("User already exists".to_string()));
        }

        let hash = PasswordUtilsImpl::hash_password(&password)?;
        let mut user = User::new(name.trim().to_string(), email, hash, role.map(str::to_string));
        user.user_id = random_account_number();
        let token = AccountToken::generate(self.token_config.token_bytes, self.token_config.verification_expiration_secs);
        user.set_verification_token(Some(token.clone()));

        let user = self.repos.users.insert(user).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => ServiceError::AlreadyExists("User already exists".to_string()),
            other => other.into(),
        })?;
        info!("New user created: {}", user.email);

        self.send_confirmation(&user, &token).await;

        Ok(SignupResponse::User(UserSignupResponse {
            message: "User created successfully. Please check your email to verify your account.".to_string(),
            user: AccountSummary::from_account(&user),
        }))
    }

    #[instrument(skip(self, req), fields(email = ?req.email))]
    async fn signup_supervisor(&self, req: SupervisorSignupRequest) -> Result<SupervisorSignupResponse, ServiceError> {
        require_fields(
            "Missing required fields",
            &[
                ("fullName", &req.full_name, "Full name is required"),
                ("email", &req.email, "Email is required"),
                ("password", &req.password, "Password is required"),
            ],
        )?;
        let (Some(full_name), Some(email), Some(password)) = (req.full_name, req.email, req.password) else {
            return Err(ServiceError::InvalidInput("Missing required fields".to_string()));
        };
        check_password_strength(&password)?;
        let email = normalize_email(&email);

        if self.repos.supervisors.find_by_email(&email).await?.is_some() {
            warn!("Supervisor already exists: {}", email);
            return Err(ServiceError::AlreadyExists("Supervisor already exists".to_string()));
        }

        let hash = PasswordUtilsImpl::hash_password(&password)?;
        let mut supervisor = Supervisor::new(full_name.trim().to_string(), email, hash);
        supervisor.user_id = random_account_number();
        supervisor.supervisor_id = random_account_number();
        let token = AccountToken::generate(self.token_config.token_bytes, self.token_config.verification_expiration_secs);
        supervisor.set_verification_token(Some(token.clone()));

        let supervisor = self.repos.supervisors.insert(supervisor).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => ServiceError::AlreadyExists("Supervisor already exists".to_string()),
            other => other.into(),
        })?;
        info!("New supervisor created: {}", supervisor.email);

        self.send_confirmation(&supervisor, &token).await;

        Ok(SupervisorSignupResponse {
            message: "Supervisor created successfully. Please check your email to verify your account.".to_string(),
            supervisor: SupervisorSummary::from(&supervisor),
        })
    }

    #[instrument(skip_all)]
    async fn confirm_user_email(&self, token: &str) -> Result<ConfirmEmailResponse, ServiceError> {
        self.confirm_email(self.repos.users.as_ref(), token).await
    }

    #[instrument(skip_all)]
    async fn confirm_supervisor_email(&self, token: &str) -> Result<ConfirmEmailResponse, ServiceError> {
        self.confirm_email(self.repos.supervisors.as_ref(), token).await
    }

    #[instrument(skip(self, req), fields(email = ?req.email))]
    async fn login_user(&self, req: LoginRequest) -> Result<LoginResponse<AccountSummary>, ServiceError> {
        let (email, password) = Self::credentials(req)?;
        let user = self.authenticate(self.repos.users.as_ref(), &email, &password).await?;
        let (token, refresh_token) = self.issue_tokens(&user)?;
        info!("Login successful for user {}", user.email);
        Ok(LoginResponse {
            token,
            refresh_token,
            user: AccountSummary::from_account(&user),
            message: None,
        })
    }

    #[instrument(skip(self, req), fields(email = ?req.email))]
    async fn login_supervisor(&self, req: LoginRequest) -> Result<LoginResponse<SupervisorSummary>, ServiceError> {
        let (email, password) = Self::credentials(req)?;
        let supervisor = self.authenticate(self.repos.supervisors.as_ref(), &email, &password).await?;
        let (token, refresh_token) = self.issue_tokens(&supervisor)?;
        info!("Login successful for supervisor {}", supervisor.email);
        Ok(LoginResponse {
            token,
            refresh_token,
            user: SupervisorSummary::from(&supervisor),
            message: None,
        })
    }

    #[instrument(skip(self, req), fields(email = ?req.email))]
    async fn login_admin(&self, req: LoginRequest) -> Result<LoginResponse<AccountSummary>, ServiceError> {
        let (email, password) = Self::credentials(req)?;
        let admin = self.authenticate(self.repos.admins.as_ref(), &email, &password).await?;
        let (token, refresh_token) = self.issue_tokens(&admin)?;
        info!("Login successful for admin {}", admin.email);
        Ok(LoginResponse {
            token,
            refresh_token,
            user: AccountSummary::from_account(&admin),
            message: Some("Login successful".to_string()),
        })
    }

    #[instrument(skip(self, req), fields(email = ?req.email))]
    async fn login(&self, req: LoginRequest) -> Result<LoginResponse<AccountSummary>, ServiceError> {
        let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
        if email.is_empty() || self.repos.users.find_by_email(&email).await?.is_some() {
            return self.login_user(req).await;
        }
        debug!("No student account for {}, trying supervisors", email);
        let res = self.login_supervisor(req).await?;
        Ok(LoginResponse {
            token: res.token,
            refresh_token: res.refresh_token,
            user: AccountSummary {
                id: res.user.id,
                name: res.user.full_name,
                email: res.user.email,
                role: res.user.role,
            },
            message: None,
        })
    }

    #[instrument(skip_all)]
    async fn refresh_token(&self, req: RefreshTokenRequest) -> Result<RefreshTokenResponse, ServiceError> {
        let refresh_token = req
            .refresh_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Refresh token is required".to_string()))?;
        let claims = self.jwt_utils.validate_refresh_token(&refresh_token).map_err(|e| {
            warn!("Refresh token rejected: {}", e);
            ServiceError::Unauthorized("Invalid refresh token".to_string())
        })?;
        let token = self.jwt_utils.generate_access_token(&claims.sub, &claims.email, &claims.role)?;
        info!("Access token refreshed for {}", claims.email);
        Ok(RefreshTokenResponse { token })
    }

    #[instrument(skip(self, req), fields(email = ?req.email, user_type = ?req.user_type))]
    async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<ForgotPasswordResponse, ServiceError> {
        require_fields("Email is required", &[("email", &req.email, "Email is required")])?;
        let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
        if is_supervisor_type(req.user_type.as_deref()) {
            self.issue_reset_token(self.repos.supervisors.as_ref(), &email, "supervisor").await
        } else {
            self.issue_reset_token(self.repos.users.as_ref(), &email, "user").await
        }
    }

    #[instrument(skip(self, req), fields(user_type = ?req.user_type))]
    async fn reset_password(&self, req: ResetPasswordRequest) -> Result<MessageResponse, ServiceError> {
        require_fields(
            "Token and password are required",
            &[
                ("token", &req.token, "Token is required"),
                ("password", &req.password, "Password is required"),
            ],
        )?;
        let (Some(token), Some(password)) = (req.token, req.password) else {
            return Err(ServiceError::InvalidInput("Token and password are required".to_string()));
        };
        check_password_strength(&password)?;

        if is_supervisor_type(req.user_type.as_deref()) {
            self.reset_with_token(self.repos.supervisors.as_ref(), &token, &password).await?;
        } else {
            self.reset_with_token(self.repos.users.as_ref(), &token, &password).await?;
        }
        Ok(MessageResponse::new("Password reset successful"))
    }

    #[instrument(skip(self), fields(account_id = %ctx.account_id, kind = %ctx.kind))]
    async fn current_account(&self, ctx: &AuthContext) -> Result<AccountSummary, ServiceError> {
        match ctx.kind {
            AccountKind::User => self.find_summary(self.repos.users.as_ref(), ctx).await,
            AccountKind::Supervisor => self.find_summary(self.repos.supervisors.as_ref(), ctx).await,
            AccountKind::Admin => self.find_summary(self.repos.admins.as_ref(), ctx).await,
        }
    }

    #[instrument(skip(self, config), fields(email = %config.email))]
    async fn ensure_admin(&self, config: &AdminUserConfig) -> Result<bool, ServiceError> {
        let email = normalize_email(&config.email);
        if self.repos.admins.find_by_email(&email).await?.is_some() {
            debug!("Administrator {} already present", email);
            return Ok(false);
        }
        let hash = PasswordUtilsImpl::hash_password(&config.password)?;
        let admin = Admin::new(config.name.clone(), email, hash);
        let admin = self.repos.admins.insert(admin).await?;
        info!("Administrator {} created", admin.email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_lists_each_missing_value() {
        let err = require_fields(
            "Missing required fields",
            &[
                ("name", &None, "Name is required"),
                ("email", &Some("  ".to_string()), "Email is required"),
                ("password", &Some("secret".to_string()), "Password is required"),
            ],
        )
        .unwrap_err();
        match err {
            ServiceError::MissingFields { details, .. } => {
                assert_eq!(details["name"], "Name is required");
                assert_eq!(details["email"], "Email is required");
                assert!(details.get("password").is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_account_number_has_six_digits() {
        for _ in 0..100 {
            let n = random_account_number();
            assert!((100_000..1_000_000).contains(&n));
        }
    }

    #[test]
    fn test_supervisor_user_type() {
        assert!(is_supervisor_type(Some("supervisor")));
        assert!(is_supervisor_type(Some("Supervisor")));
        assert!(!is_supervisor_type(Some("user")));
        assert!(!is_supervisor_type(None));
    }
}
