use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tracing::{error, info};

use crate::config::{AppConfig, ConfigError, JwtConfig, MongoConfig, RateLimitConfig};
use crate::repository::course_repo::MongoCourseRepository;
use crate::repository::database::Database;
use crate::repository::enrollment_repo::MongoEnrollmentRepository;
use crate::repository::repository_error::RepositoryError;
use crate::repository::student_repo::MongoStudentRepository;
use crate::router::create_router;
use crate::service::Services;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::rate_limiter::FixedWindowRateLimiter;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct App {
    config: AppConfig,
    router: Router,
    database: Database,
}

impl App {
    /// Loads configuration, connects to MongoDB, ensures indexes and wires
    /// repositories, services and routes.
    pub async fn new() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;
        let rate_limit_config = RateLimitConfig::from_env()?;

        let database = Database::connect(&mongo_config).await?;
        database.ensure_indexes().await?;

        let services = Services::new(
            Arc::new(MongoStudentRepository::new(&database)),
            Arc::new(MongoCourseRepository::new(&database)),
            Arc::new(MongoEnrollmentRepository::new(&database)),
            Arc::new(JwtTokenUtilsImpl::new(jwt_config)),
        );
        let auth_limiter = Arc::new(FixedWindowRateLimiter::from_config(&rate_limit_config));
        let router = create_router(services, auth_limiter);

        Ok(App { config, router, database })
    }

    /// Serves until Ctrl-C or SIGTERM, drains in-flight requests, then
    /// closes the database client.
    pub async fn start(self) -> Result<(), AppError> {
        let host: IpAddr = self
            .config
            .host
            .parse()
            .map_err(|_| AppError::InvalidAddress(self.config.host.clone()))?;
        let addr = SocketAddr::new(host, self.config.port);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);

        let served = axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        if let Err(e) = &served {
            error!("Server error: {}", e);
        }
        self.database.shutdown().await;
        info!("Server stopped");
        served.map_err(AppError::from)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
