use clinica_core::model::{AuthResponse, Credenciales, Registro, TokenRefresh, Usuario};
use serde_json::json;
use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::token::{TokenStore, AUTH_TOKEN, REFRESH_TOKEN};

/// Account endpoints, hosted by the patients backend.
#[derive(Clone)]
pub struct AuthService {
    client: HttpClient,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(client: HttpClient) -> Self {
        let tokens = client.tokens().clone();
        Self { client, tokens }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn has_token(&self) -> bool {
        self.tokens.auth_token().is_some()
    }

    fn store_session(&self, response: &AuthResponse) -> Result<()> {
        self.tokens.set(AUTH_TOKEN, &response.token)?;
        match response.refresh_token.as_deref() {
            Some(refresh) => self.tokens.set(REFRESH_TOKEN, refresh)?,
            None => self.tokens.remove(REFRESH_TOKEN)?,
        }
        Ok(())
    }

    pub async fn login(&self, credenciales: &Credenciales) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post("/auth/login", credenciales)
            .await
            .inspect_err(|e| tracing::error!(email = %credenciales.email, error = %e, "Login error"))?;

        self.store_session(&response)?;
        tracing::info!(user = %response.user.id, "User logged in");
        Ok(response)
    }

    /// Register an account; the returned session is stored like a login.
    pub async fn register(&self, registro: &Registro) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post("/auth/register", registro)
            .await
            .inspect_err(|e| tracing::error!(email = %registro.email, error = %e, "Registration error"))?;

        self.store_session(&response)?;
        tracing::info!(user = %response.user.id, "User registered");
        Ok(response)
    }

    pub async fn refresh_token(&self) -> Result<TokenRefresh> {
        let refresh = self.tokens.refresh_token().ok_or(ApiError::MissingRefreshToken)?;

        let response: TokenRefresh = self
            .client
            .post("/auth/refresh-token", &json!({ "refreshToken": refresh }))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Token refresh error"))?;

        self.tokens.set(AUTH_TOKEN, &response.token)?;
        Ok(response)
    }

    /// Stored tokens are cleared even when the backend call fails.
    pub async fn logout(&self) -> Result<()> {
        let outcome = match self.tokens.refresh_token() {
            Some(refresh) => self
                .client
                .post_no_content("/auth/logout", &json!({ "refreshToken": refresh }))
                .await,
            None => Ok(()),
        };

        self.tokens.clear()?;

        outcome.inspect_err(|e| tracing::error!(error = %e, "Logout error"))
    }

    pub async fn profile(&self) -> Result<Usuario> {
        self.client
            .get("/auth/profile")
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching user profile"))
    }
}
