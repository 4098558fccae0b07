//! JSON-over-HTTP client bound to one backend service.

use clinica_core::AuthMode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{HttpSettings, ServiceSettings};
use crate::error::{ApiError, ErrorKind, Result};
use crate::token::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Pacientes,
    Consultas,
    Orquestador,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Pacientes => "pacientes",
            Service::Consultas => "consultas",
            Service::Orquestador => "orquestador",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`HttpClient::check_connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub success: bool,
    pub kind: Option<ErrorKind>,
    pub message: String,
}

/// Percent-encode one path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[derive(Clone)]
pub struct HttpClient {
    service: Service,
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    auth_mode: AuthMode,
    verb_fallback: bool,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("auth_mode", &self.auth_mode)
            .field("verb_fallback", &self.verb_fallback)
            .finish()
    }
}

impl HttpClient {
    pub fn new(
        service: Service,
        settings: &ServiceSettings,
        http: &HttpSettings,
        auth_mode: AuthMode,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(http.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            service,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
            auth_mode,
            verb_fallback: settings.verb_fallback,
        })
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let bytes = self.send(Method::GET, path, &[], None).await?;
        self.decode(&bytes)
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let bytes = self.send(Method::GET, path, query, None).await?;
        self.decode(&bytes)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.write(Method::POST, path, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.write(Method::PUT, path, body).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.write(Method::PATCH, path, body).await
    }

    /// POST whose response body is ignored.
    pub async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Request(e.to_string()))?;
        self.send(Method::POST, path, &[], Some(&body)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// Send a JSON body; with `verb_fallback` on, a 405 is retried once
    /// with the alternate verb.
    async fn write<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Request(e.to_string()))?;

        let first = self.send(method.clone(), path, &[], Some(&body)).await;
        let bytes = match (first, alternate_verb(&method)) {
            (Err(ApiError::Status { status: 405, .. }), Some(alternate)) if self.verb_fallback => {
                tracing::info!(
                    service = %self.service,
                    path,
                    rejected = %method,
                    retry = %alternate,
                    "Method not allowed, retrying with alternate verb"
                );
                self.send(alternate, path, &[], Some(&body)).await?
            }
            (other, _) => other?,
        };

        self.decode(&bytes)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Vec<u8>> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if self.auth_mode.is_enforced()
            && let Some(token) = self.tokens.auth_token()
        {
            request = request.bearer_auth(token);
        }

        tracing::debug!(service = %self.service, method = %method, url = %url, "API request");

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?.to_vec();

        tracing::debug!(
            service = %self.service,
            url = %url,
            status = status.as_u16(),
            body = %String::from_utf8_lossy(&bytes),
            "API response"
        );

        if status.is_success() {
            return Ok(bytes);
        }

        self.log_status(status, &method, &url);
        Err(self.status_error(status, &bytes))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| ApiError::Decode {
            service: self.service,
            message: e.to_string(),
        })
    }

    fn classify(&self, e: reqwest::Error) -> ApiError {
        if e.is_builder() {
            return ApiError::Request(e.to_string());
        }
        if e.is_decode() {
            return ApiError::Decode {
                service: self.service,
                message: e.to_string(),
            };
        }

        let timed_out = e.is_timeout();
        tracing::error!(
            service = %self.service,
            timed_out,
            error = %e,
            "No response received from server"
        );
        ApiError::Transport {
            service: self.service,
            timed_out,
            source: e,
        }
    }

    fn log_status(&self, status: StatusCode, method: &Method, url: &str) {
        match status.as_u16() {
            401 => tracing::warn!(
                service = %self.service,
                method = %method,
                url,
                "Unauthorized access. Please log in again."
            ),
            403 => tracing::warn!(
                service = %self.service,
                method = %method,
                url,
                "Forbidden access. You don't have permission for this resource."
            ),
            s if s >= 500 => tracing::error!(
                service = %self.service,
                method = %method,
                url,
                status = s,
                "Server error"
            ),
            s => tracing::debug!(
                service = %self.service,
                method = %method,
                url,
                status = s,
                "Request rejected"
            ),
        }
    }

    fn status_error(&self, status: StatusCode, bytes: &[u8]) -> ApiError {
        let body: Option<Value> = serde_json::from_slice(bytes).ok();
        let message = body
            .as_ref()
            .and_then(|b| {
                ["message", "detail", "error"]
                    .iter()
                    .find_map(|key| b.get(*key).and_then(Value::as_str))
            })
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string());

        ApiError::Status {
            service: self.service,
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// Probe the backend with a cheap list call.
    pub async fn check_connection(&self) -> ConnectionReport {
        match self.send(Method::GET, "/pacientes", &[], None).await {
            Ok(_) => {
                tracing::info!(service = %self.service, url = %self.base_url, "API connection test successful");
                ConnectionReport {
                    success: true,
                    kind: None,
                    message: "API connection successful".to_string(),
                }
            }
            Err(e) => {
                let detail = match &e {
                    ApiError::Status { status, .. } => format!(
                        "{} {}",
                        status,
                        StatusCode::from_u16(*status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("")
                    ),
                    ApiError::Transport { .. } => "No response received from server".to_string(),
                    other => other.to_string(),
                };
                tracing::error!(service = %self.service, error = %e, "API connection test failed");
                ConnectionReport {
                    success: false,
                    kind: Some(e.kind()),
                    message: format!("API connection failed: {}", detail.trim_end()),
                }
            }
        }
    }
}

fn alternate_verb(method: &Method) -> Option<Method> {
    if *method == Method::POST {
        Some(Method::PUT)
    } else if *method == Method::PUT {
        Some(Method::PATCH)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;

    fn client(base_url: &str) -> HttpClient {
        let settings = ServiceSettings {
            base_url: base_url.to_string(),
            verb_fallback: false,
        };
        HttpClient::new(
            Service::Consultas,
            &settings,
            &HttpSettings::default(),
            AuthMode::Enforced,
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = client("http://localhost:8001/api/");
        assert_eq!(client.url("/consultas"), "http://localhost:8001/api/consultas");
    }

    #[test]
    fn test_alternate_verbs() {
        assert_eq!(alternate_verb(&Method::POST), Some(Method::PUT));
        assert_eq!(alternate_verb(&Method::PUT), Some(Method::PATCH));
        assert_eq!(alternate_verb(&Method::PATCH), None);
        assert_eq!(alternate_verb(&Method::DELETE), None);
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
        assert_eq!(segment("42"), "42");
    }

    #[test]
    fn test_status_error_prefers_body_message() {
        let client = client("http://localhost:8001/api");
        let err = client.status_error(StatusCode::CONFLICT, br#"{"message":"Documento duplicado"}"#);
        match err {
            ApiError::Status { status, message, body, .. } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Documento duplicado");
                assert!(body.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = client.status_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(err.to_string(), "consultas responded 404: Not Found");
    }
}
