//! Signed-in user state.

use clinica_core::model::{Credenciales, Registro, Usuario};
use clinica_core::{AuthMode, SessionView};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::services::AuthService;

pub const MSG_VERIFICAR: &str = "Error al verificar la autenticación";
pub const MSG_CREDENCIALES: &str = "Credenciales inválidas";
pub const MSG_REGISTRO: &str = "Error al registrar el usuario";
pub const MSG_LOGOUT: &str = "Error al cerrar la sesión";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<Usuario>,
    pub authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// Loading until the first status check resolves.
    fn default() -> Self {
        Self {
            user: None,
            authenticated: false,
            loading: true,
            error: None,
        }
    }
}

pub struct AuthSession {
    service: Arc<AuthService>,
    mode: AuthMode,
    state: Mutex<SessionState>,
}

impl AuthSession {
    pub fn new(service: Arc<AuthService>, mode: AuthMode) -> Self {
        Self {
            service,
            mode,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Snapshot for the route guard.
    pub async fn view(&self) -> SessionView {
        let state = self.state.lock().await;
        SessionView {
            loading: state.loading,
            authenticated: state.authenticated,
            role: state.user.as_ref().map(|u| u.role.clone()),
        }
    }

    async fn begin(&self) {
        let mut state = self.state.lock().await;
        state.loading = true;
        state.error = None;
    }

    /// Resolve the session from the stored token. In disabled mode every
    /// caller counts as signed in and no request is made.
    pub async fn check_status(&self) -> Result<Option<Usuario>, StoreError> {
        if !self.mode.is_enforced() {
            let mut state = self.state.lock().await;
            state.authenticated = true;
            state.loading = false;
            return Ok(None);
        }

        if !self.service.has_token() {
            let mut state = self.state.lock().await;
            state.user = None;
            state.authenticated = false;
            state.loading = false;
            return Ok(None);
        }

        self.begin().await;
        let result = self.service.profile().await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                state.authenticated = true;
                Ok(Some(user))
            }
            Err(source) => {
                tracing::warn!(error = %source, "Stored session could not be verified");
                state.user = None;
                state.authenticated = false;
                state.error = Some(MSG_VERIFICAR.to_string());
                if source.is_unauthorized()
                    && let Err(e) = self.service.tokens().clear()
                {
                    tracing::error!(error = %e, "Failed to clear stale tokens");
                }
                Err(StoreError::new(MSG_VERIFICAR, source))
            }
        }
    }

    pub async fn login(&self, credenciales: &Credenciales) -> Result<Usuario, StoreError> {
        self.begin().await;
        let result = self.service.login(credenciales).await;
        self.finish_sign_in(result.map(|r| r.user), MSG_CREDENCIALES).await
    }

    pub async fn register(&self, registro: &Registro) -> Result<Usuario, StoreError> {
        self.begin().await;
        let result = self.service.register(registro).await;
        self.finish_sign_in(result.map(|r| r.user), MSG_REGISTRO).await
    }

    async fn finish_sign_in(
        &self,
        result: crate::error::Result<Usuario>,
        message: &'static str,
    ) -> Result<Usuario, StoreError> {
        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                state.authenticated = true;
                Ok(user)
            }
            Err(source) => {
                state.error = Some(message.to_string());
                Err(StoreError::new(message, source))
            }
        }
    }

    /// Signs out locally even when the backend call fails.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.begin().await;
        let result = self.service.logout().await;

        let mut state = self.state.lock().await;
        state.loading = false;
        state.user = None;
        state.authenticated = !self.mode.is_enforced();
        result.map_err(|source| {
            state.error = Some(MSG_LOGOUT.to_string());
            StoreError::new(MSG_LOGOUT, source)
        })
    }
}
