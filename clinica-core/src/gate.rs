//! Route guard.
//!
//! Whether auth is enforced is a deployment setting, read at startup; the
//! guard itself only looks at the session snapshot it is handed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClinicaError;
use crate::routes::Route;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    #[default]
    Enforced,
    /// Every route is open and no bearer token is attached. Development only.
    Disabled,
}

impl AuthMode {
    pub fn is_enforced(&self) -> bool {
        matches!(self, AuthMode::Enforced)
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMode::Enforced => "enforced",
            AuthMode::Disabled => "disabled",
        })
    }
}

impl FromStr for AuthMode {
    type Err = ClinicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enforced" | "on" | "true" => Ok(AuthMode::Enforced),
            "disabled" | "off" | "false" => Ok(AuthMode::Disabled),
            _ => Err(ClinicaError::InvalidEnum {
                kind: "auth mode",
                value: s.to_string(),
            }),
        }
    }
}

/// What the guard needs to know about the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionView {
    pub loading: bool,
    pub authenticated: bool,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Session status not known yet; show a spinner.
    Loading,
    /// Go to login, remembering where the user was headed.
    RedirectToLogin { from: String },
    /// Signed in but lacking every required role.
    RedirectHome,
}

impl GateDecision {
    /// Target route for redirects.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            GateDecision::RedirectToLogin { .. } => Some(Route::Login),
            GateDecision::RedirectHome => Some(Route::Home),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate {
    mode: AuthMode,
}

impl AuthGate {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Decide access to `route`; empty `required_roles` means any signed-in user.
    pub fn check(&self, route: &Route, session: &SessionView, required_roles: &[&str]) -> GateDecision {
        self.decide(route, session, required_roles, || route.path())
    }

    /// Like [`AuthGate::check`] for a raw location; a login redirect keeps it
    /// verbatim, query string included.
    pub fn check_path(&self, requested: &str, session: &SessionView, required_roles: &[&str]) -> GateDecision {
        let route = Route::parse(requested);
        self.decide(&route, session, required_roles, || requested.to_string())
    }

    fn decide(
        &self,
        route: &Route,
        session: &SessionView,
        required_roles: &[&str],
        from: impl FnOnce() -> String,
    ) -> GateDecision {
        if !self.mode.is_enforced() || route.is_public() {
            return GateDecision::Allow;
        }
        if session.loading {
            return GateDecision::Loading;
        }
        if !session.authenticated {
            let from = from();
            tracing::debug!(from = %from, "Redirecting unauthenticated user to login");
            return GateDecision::RedirectToLogin { from };
        }
        if !required_roles.is_empty() {
            let allowed = session
                .role
                .as_deref()
                .is_some_and(|role| required_roles.contains(&role));
            if !allowed {
                return GateDecision::RedirectHome;
            }
        }
        GateDecision::Allow
    }

    /// Where login should send the user back to.
    pub fn return_route(decision: &GateDecision) -> Route {
        match decision {
            GateDecision::RedirectToLogin { from } => Route::parse(from),
            _ => Route::Home,
        }
    }

    /// The location to restore after login, as it was requested.
    pub fn return_path(decision: &GateDecision) -> String {
        match decision {
            GateDecision::RedirectToLogin { from } => from.clone(),
            _ => Route::Home.path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in(role: &str) -> SessionView {
        SessionView {
            loading: false,
            authenticated: true,
            role: Some(role.to_string()),
        }
    }

    #[test]
    fn test_disabled_mode_allows_everything() {
        let gate = AuthGate::new(AuthMode::Disabled);
        let decision = gate.check(&Route::Pacientes, &SessionView::default(), &["admin"]);
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn test_redirect_threads_original_path() {
        let gate = AuthGate::new(AuthMode::Enforced);
        let route = Route::ConsultaEditar("c7".into());
        let decision = gate.check(&route, &SessionView::default(), &[]);

        assert_eq!(
            decision,
            GateDecision::RedirectToLogin {
                from: "/consultas/c7/editar".into()
            }
        );
        assert_eq!(decision.redirect(), Some(Route::Login));
        assert_eq!(AuthGate::return_route(&decision), route);
    }

    #[test]
    fn test_redirect_keeps_query_string() {
        let gate = AuthGate::new(AuthMode::Enforced);
        let decision = gate.check_path("/pacientes?q=ana&page=2", &SessionView::default(), &[]);

        assert_eq!(
            decision,
            GateDecision::RedirectToLogin {
                from: "/pacientes?q=ana&page=2".into()
            }
        );
        assert_eq!(AuthGate::return_path(&decision), "/pacientes?q=ana&page=2");
        assert_eq!(AuthGate::return_route(&decision), Route::Pacientes);

        assert_eq!(
            gate.check_path("/login?next=x", &SessionView::default(), &[]),
            GateDecision::Allow
        );
        assert_eq!(AuthGate::return_path(&GateDecision::Allow), "/");
    }

    #[test]
    fn test_loading_session() {
        let gate = AuthGate::default();
        let session = SessionView {
            loading: true,
            ..Default::default()
        };
        assert_eq!(gate.check(&Route::Home, &session, &[]), GateDecision::Loading);
    }

    #[test]
    fn test_roles() {
        let gate = AuthGate::default();
        assert_eq!(
            gate.check(&Route::Settings, &signed_in("medico"), &["admin"]),
            GateDecision::RedirectHome
        );
        assert_eq!(
            gate.check(&Route::Settings, &signed_in("admin"), &["admin"]),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_public_route_open_when_enforced() {
        let gate = AuthGate::default();
        assert_eq!(
            gate.check(&Route::Login, &SessionView::default(), &[]),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("disabled".parse::<AuthMode>().unwrap(), AuthMode::Disabled);
        assert_eq!("Enforced".parse::<AuthMode>().unwrap(), AuthMode::Enforced);
        assert!("maybe".parse::<AuthMode>().is_err());
    }
}
