//! Matcha Accounts
//!
//! User registration service for a dating platform:
//! - Field validation that reports every violation in one pass
//! - Duplicate email/login detection
//! - Salted password derivation (HMAC-SHA512 or Argon2)
//! - In-memory or PostgreSQL user storage
//! - A uniform `{success, msg, error}` envelope for every outcome

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::user::UserRepository;
use domain::DomainError;
use infrastructure::storage::{PostgresConfig, StorageConfig, StorageFactory, StorageType};
use infrastructure::user::{CredentialDeriver, DeriverAlgorithm, RegistrationService};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = storage_config(config)?;
    info!(backend = %storage_config.storage_type(), "Storage backend selected");

    let repository: Arc<dyn UserRepository> =
        StorageFactory::create_user_repository(&storage_config).await?;

    let algorithm = DeriverAlgorithm::from_config(&config.credentials.algorithm);
    info!("Credential algorithm: {:?}", algorithm);
    let deriver: Arc<dyn CredentialDeriver> = Arc::from(algorithm.build());

    if !config.registration.always_ok_status {
        info!("Registration responses mirror the envelope status");
    }

    let service = RegistrationService::new(repository.clone(), deriver);

    Ok(AppState::new(Arc::new(service), repository)
        .with_always_ok_status(config.registration.always_ok_status))
}

fn storage_config(config: &AppConfig) -> Result<StorageConfig, DomainError> {
    let backend = config
        .storage
        .backend
        .parse::<StorageType>()
        .unwrap_or_else(|e| {
            warn!("{}, using in-memory storage", e);
            StorageType::InMemory
        });

    match backend {
        StorageType::InMemory => Ok(StorageConfig::in_memory()),
        StorageType::Postgres => postgres_config(config)
            .map(StorageConfig::postgres)
            .ok_or_else(|| {
                DomainError::configuration("PostgreSQL storage requires storage.url or DATABASE_URL")
            }),
    }
}

/// PostgreSQL settings, when a connection URL is configured
pub fn postgres_config(config: &AppConfig) -> Option<PostgresConfig> {
    let settings = &config.storage;

    settings.url.as_ref().map(|url| {
        PostgresConfig::new(url)
            .with_max_connections(settings.max_connections)
            .with_min_connections(settings.min_connections)
            .with_connect_timeout(settings.connect_timeout_secs)
            .with_idle_timeout(settings.idle_timeout_secs)
    })
}
