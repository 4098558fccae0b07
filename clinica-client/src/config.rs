use clinica_core::AuthMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Client configuration loaded from YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub services: ServicesSettings,
    pub http: HttpSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesSettings {
    pub pacientes: ServiceSettings,
    pub consultas: ServiceSettings,
    pub orquestador: ServiceSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub base_url: String,
    /// Retry a write rejected with 405 once using the alternate verb
    /// (POST→PUT, PUT→PATCH). Only for backends whose routing differs per
    /// deployment.
    pub verb_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub mode: AuthMode,
    /// Where tokens persist between runs; in-memory when unset.
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl ServiceSettings {
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            verb_fallback: false,
        }
    }
}

impl Default for ServicesSettings {
    fn default() -> Self {
        Self {
            pacientes: ServiceSettings::with_base_url("http://localhost:8000/api"),
            consultas: ServiceSettings::with_base_url("http://localhost:8001/api"),
            orquestador: ServiceSettings::with_base_url("http://localhost:8002/api"),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_ms: 15_000 }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CLINICA_PACIENTES_URL") {
            self.services.pacientes.base_url = url;
        }

        if let Some(url) = lookup("CLINICA_CONSULTAS_URL") {
            self.services.consultas.base_url = url;
        }

        if let Some(url) = lookup("CLINICA_ORQUESTADOR_URL") {
            self.services.orquestador.base_url = url;
        }

        if let Some(mode) = lookup("CLINICA_AUTH_MODE") {
            self.auth.mode = mode.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "CLINICA_AUTH_MODE",
                value: mode.clone(),
            })?;
        }

        if let Some(timeout) = lookup("CLINICA_TIMEOUT_MS") {
            self.http.timeout_ms = timeout.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "CLINICA_TIMEOUT_MS",
                value: timeout.clone(),
            })?;
        }

        if let Some(token_file) = lookup("CLINICA_TOKEN_FILE") {
            self.auth.token_file = Some(PathBuf::from(token_file));
        }

        if let Some(level) = lookup("CLINICA_LOG_LEVEL") {
            self.log.level = level;
        }

        Ok(())
    }
}
