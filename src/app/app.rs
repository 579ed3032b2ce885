use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::config::{
    AccountTokenConfig, AdminUserConfig, AppConfig, ConfigError, EmailConfig, Environment, JwtConfig, MongoConfig,
    StorageBackend,
};
use crate::handler::system_handler::{fallback_handler, health_handler};
use crate::repository::{seed::seed_demo_data, Repositories, RepositoryError};
use crate::router::{
    auth_router::auth_router, catalog_router::catalog_router, supervisor_router::supervisor_router,
    user_router::user_router,
};
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::service::profile_service::{ProfileService, ProfileServiceImpl};
use crate::service::supervisor_service::{SupervisorService, SupervisorServiceImpl};
use crate::util::email::{EmailError, EmailSender, LogEmailSender, SmtpEmailService};
use crate::util::jwt::JwtTokenUtilsImpl;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Email error: {0}")]
    Email(#[from] EmailError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
}

/// Everything the routers need, shared behind `Arc`s.
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<dyn AuthService>,
    pub profile: Arc<dyn ProfileService>,
    pub supervisor: Arc<dyn SupervisorService>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl AppServices {
    pub fn new(
        repos: Repositories,
        jwt_config: JwtConfig,
        email_sender: Arc<dyn EmailSender>,
        token_config: AccountTokenConfig,
        environment: Environment,
    ) -> Self {
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        AppServices {
            auth: Arc::new(AuthServiceImpl::new(
                repos.clone(),
                jwt_utils.clone(),
                email_sender,
                token_config,
                environment,
            )),
            profile: Arc::new(ProfileServiceImpl::new(repos.clone())),
            supervisor: Arc::new(SupervisorServiceImpl::new(repos)),
            jwt_utils,
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Full HTTP surface: `/api/health`, the four API groups, CORS and request tracing.
pub fn create_router(services: &AppServices) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .nest("/api/auth", auth_router(services.auth.clone(), services.jwt_utils.clone()))
        .nest("/api/users", user_router(services.profile.clone(), services.jwt_utils.clone()))
        .nest("/api/supervisors", supervisor_router(services.supervisor.clone(), services.jwt_utils.clone()))
        .nest("/api/catalog", catalog_router())
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let jwt_config = match JwtConfig::from_env() {
            Ok(c) => c,
            Err(e) if config.environment.is_development() => {
                warn!("JWT config not loaded ({e}), falling back to a development secret");
                JwtConfig::development()
            }
            Err(e) => return Err(e.into()),
        };
        let token_config = AccountTokenConfig::from_env(&config.frontend_url)?;

        let repos = match config.storage {
            StorageBackend::Mongo => {
                let mongo_config = MongoConfig::from_env()?;
                mongo_config.validate()?;
                Repositories::mongo(&mongo_config).await?
            }
            StorageBackend::Memory => {
                info!("Using the in-memory account store");
                let repos = Repositories::in_memory();
                if config.seed_demo_data {
                    seed_demo_data(repos.users.as_ref(), repos.supervisors.as_ref()).await?;
                }
                repos
            }
        };

        let email_sender: Arc<dyn EmailSender> = match EmailConfig::from_env()? {
            Some(email_config) => Arc::new(SmtpEmailService::new(email_config)?),
            None => Arc::new(LogEmailSender {
                reveal_links: config.environment.is_development(),
            }),
        };

        let services = AppServices::new(repos, jwt_config, email_sender, token_config, config.environment);

        match AdminUserConfig::from_env() {
            Ok(admin_conf) => {
                if let Err(e) = services.auth.ensure_admin(&admin_conf).await {
                    error!("Failed to create admin user: {e}");
                }
            }
            Err(e) => warn!("Admin user config not loaded: {e}"),
        }

        let router = create_router(&services);
        Ok(App { config, router })
    }

    pub async fn start(self) -> Result<(), AppError> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Server running at http://{} ({})", addr, self.config.environment);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
