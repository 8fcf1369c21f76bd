use axum_extra::extract::cookie::Key;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use serde::Deserialize;

use crate::error::AppError;

/// Runtime configuration, read from environment variables layered over
/// built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub s3_bucket: String,
    /// Custom endpoint for MinIO / LocalStack.
    #[serde(default)]
    pub s3_endpoint: Option<String>,
    /// Path of the official recipe catalog XML file.
    pub catalog_path: String,
    /// Directory served for everything outside `/api`.
    pub site_root: String,
    /// Run against the in-memory store and storage with seeded demo data,
    /// and accept the built-in demo accounts.
    pub demo_mode: bool,
    /// Secret the session cookie is signed with; at least 64 bytes.
    #[serde(default)]
    pub session_secret: Option<String>,
}

impl AppConfig {
    /// Load the configuration from the process environment.
    pub fn load() -> Result<Self, AppError> {
        let builder = Self::defaults()?.add_source(Environment::default().try_parsing(true));
        Self::from_builder(builder)
    }

    /// Builder pre-populated with the default value of every key.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Ok(config::Config::builder()
            .set_default("listen_addr", "127.0.0.1:3000")?
            .set_default("mongodb_uri", "mongodb://localhost:27017")?
            .set_default("mongodb_database", "potluck")?
            .set_default("s3_bucket", "potluck-images")?
            .set_default("catalog_path", "public/data/siterecipe.xml")?
            .set_default("site_root", "public")?
            .set_default("demo_mode", false)?)
    }

    /// Key for signing session cookies. Without a configured secret a random
    /// key is used, so sessions do not survive a restart.
    pub fn session_key(&self) -> Result<Key, AppError> {
        match &self.session_secret {
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|e| AppError::Internal(format!("Invalid SESSION_SECRET: {e}"))),
            None => {
                tracing::warn!("SESSION_SECRET is not set, using a random session key");
                Ok(Key::generate())
            }
        }
    }

    /// Finish a builder into an `AppConfig`.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        Ok(builder.build()?.try_deserialize()?)
    }
}
