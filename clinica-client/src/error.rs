use serde_json::Value;
use thiserror::Error;

use crate::http::Service;

/// Coarse failure class of an HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server answered with a non-2xx status.
    Status,
    /// Nothing came back: connection refused, reset, or timed out.
    NoResponse,
    /// The request could not be built.
    Setup,
    /// A 2xx body that is not the expected JSON.
    Decode,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{service} responded {status}: {message}")]
    Status {
        service: Service,
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("No response from {service}: {source}")]
    Transport {
        service: Service,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request setup error: {0}")]
    Request(String),

    #[error("Invalid response body from {service}: {message}")]
    Decode { service: Service, message: String },

    #[error("Response is missing the entity id")]
    MissingId,

    #[error("{service} does not support {operation}")]
    Unsupported {
        service: Service,
        operation: &'static str,
    },

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Token storage error: {0}")]
    TokenStorage(#[from] TokenError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Status { .. } => ErrorKind::Status,
            ApiError::Transport { .. } => ErrorKind::NoResponse,
            ApiError::Decode { .. } | ApiError::MissingId => ErrorKind::Decode,
            ApiError::Request(_)
            | ApiError::Unsupported { .. }
            | ApiError::MissingRefreshToken
            | ApiError::TokenStorage(_) => ErrorKind::Setup,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Short Spanish description for banners.
    pub fn detalle(&self) -> String {
        match self {
            ApiError::Status { status, message, .. } => format!("{} {}", status, message),
            ApiError::Transport { timed_out: true, .. } => {
                "Tiempo de espera agotado, no se recibió respuesta del servidor".to_string()
            }
            ApiError::Transport { .. } => "No se recibió respuesta del servidor".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a store operation: the fixed user-facing message plus the
/// underlying cause.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
    pub message: &'static str,
    #[source]
    pub source: ApiError,
}

impl StoreError {
    pub fn new(message: &'static str, source: ApiError) -> Self {
        Self { message, source }
    }

    /// Message plus cause, for the single banner shown above a form.
    pub fn banner(&self) -> String {
        let mut text = format!("{}: {}", self.message, self.source.detalle());
        if self.source.status() == Some(405) {
            text.push_str(" - Método no permitido. El servidor no acepta este tipo de solicitud.");
        }
        text
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> ApiError {
        ApiError::Status {
            service: Service::Pacientes,
            status,
            message: "Method Not Allowed".into(),
            body: None,
        }
    }

    #[test]
    fn test_kind_and_status() {
        let err = status_error(404);
        assert_eq!(err.kind(), ErrorKind::Status);
        assert!(err.is_not_found());
        assert_eq!(ApiError::MissingRefreshToken.kind(), ErrorKind::Setup);
    }

    #[test]
    fn test_banner_for_405() {
        let err = StoreError::new("Error al crear el paciente", status_error(405));
        let banner = err.banner();
        assert!(banner.starts_with("Error al crear el paciente: 405 Method Not Allowed"));
        assert!(banner.contains("Método no permitido"));
        assert_eq!(err.to_string(), "Error al crear el paciente");
    }
}
