use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Token signing configuration. Access and refresh tokens use distinct
/// secrets so a leaked access secret cannot mint refresh tokens.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_token_lifetime")]
    pub access_token_lifetime: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_token_lifetime")]
    pub refresh_token_lifetime: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets never appear in logs, so no derived Debug here.
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
}

fn default_access_token_lifetime() -> i64 {
    60 // 1 minute
}

fn default_refresh_token_lifetime() -> i64 {
    86400 * 7 // 7 days
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variable override convention: any var matching the key path
/// separated by double underscores (e.g. `AUTH__ACCESS_TOKEN_SECRET`) will
/// override the file value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how
/// to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    validate(&app)?;

    Ok(app)
}

fn validate(app: &AppConfig) -> Result<(), ConfigError> {
    if app.auth.access_token_secret.len() < 32 {
        return Err(ConfigError::Validation(
            "auth.access_token_secret must be at least 32 characters".into(),
        ));
    }
    if app.auth.refresh_token_secret.len() < 32 {
        return Err(ConfigError::Validation(
            "auth.refresh_token_secret must be at least 32 characters".into(),
        ));
    }
    if app.auth.access_token_secret == app.auth.refresh_token_secret {
        return Err(ConfigError::Validation(
            "auth token secrets must differ".into(),
        ));
    }
    if app.auth.access_token_lifetime <= 0 || app.auth.refresh_token_lifetime <= 0 {
        return Err(ConfigError::Validation(
            "auth token lifetimes must be positive".into(),
        ));
    }
    Ok(())
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            auth: AuthConfig {
                access_token_secret: "a".repeat(32),
                refresh_token_secret: "r".repeat(32),
                access_token_lifetime: 60,
                refresh_token_lifetime: 86400 * 7,
            },
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn rejects_short_secrets() {
        let mut cfg = base_config();
        cfg.auth.access_token_secret = "short".into();
        assert!(validate(&cfg).is_err());

        let mut cfg = base_config();
        cfg.auth.refresh_token_secret = "short".into();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_identical_secrets() {
        let mut cfg = base_config();
        cfg.auth.refresh_token_secret = cfg.auth.access_token_secret.clone();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_nonpositive_lifetimes() {
        let mut cfg = base_config();
        cfg.auth.access_token_lifetime = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = base_config();
        let rendered = format!("{:?}", cfg.auth);
        assert!(!rendered.contains(&"a".repeat(32)));
        assert!(rendered.contains("<redacted>"));
    }
}
