//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CredentialSettings, LogFormat, LoggingConfig, RegistrationSettings, ServerConfig,
    StorageSettings,
};
