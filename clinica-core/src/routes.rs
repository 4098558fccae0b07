//! Client-visible web routes.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,

    Pacientes,
    PacienteDetalle(String),
    PacienteCrear,
    PacienteEditar(String),
    ContactoEditar(String),

    Consultas,
    ConsultaDetalle(String),
    ConsultaCrear,
    ConsultaEditar(String),

    Examenes,
    ExamenDetalle(String),
    ExamenCrear,
    ExamenEditar(String),

    Historias,
    HistoriaDetalle(String),
    HistoriaCrear,
    HistoriaEditar(String),

    Login,
    Register,
    ForgotPassword,
    ResetPassword,

    Profile,
    Settings,

    NotFound,
    ServerError,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Pacientes => "/pacientes".to_string(),
            Route::PacienteDetalle(id) => format!("/pacientes/{}", encode(id)),
            Route::PacienteCrear => "/pacientes/crear".to_string(),
            Route::PacienteEditar(id) => format!("/pacientes/{}/editar", encode(id)),
            Route::ContactoEditar(id) => format!("/pacientes/{}/contacto/editar", encode(id)),
            Route::Consultas => "/consultas".to_string(),
            Route::ConsultaDetalle(id) => format!("/consultas/{}", encode(id)),
            Route::ConsultaCrear => "/consultas/crear".to_string(),
            Route::ConsultaEditar(id) => format!("/consultas/{}/editar", encode(id)),
            Route::Examenes => "/examenes".to_string(),
            Route::ExamenDetalle(id) => format!("/examenes/{}", encode(id)),
            Route::ExamenCrear => "/examenes/crear".to_string(),
            Route::ExamenEditar(id) => format!("/examenes/{}/editar", encode(id)),
            Route::Historias => "/historias".to_string(),
            Route::HistoriaDetalle(id) => format!("/historias/{}", encode(id)),
            Route::HistoriaCrear => "/historias/crear".to_string(),
            Route::HistoriaEditar(id) => format!("/historias/{}/editar", encode(id)),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::NotFound => "/404".to_string(),
            Route::ServerError => "/500".to_string(),
        }
    }

    /// Resolve a path; anything unrecognized maps to [`Route::NotFound`].
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["pacientes"] => Route::Pacientes,
            ["pacientes", "crear"] => Route::PacienteCrear,
            ["pacientes", id] => Route::PacienteDetalle(id.to_string()),
            ["pacientes", id, "editar"] => Route::PacienteEditar(id.to_string()),
            ["pacientes", id, "contacto", "editar"] => Route::ContactoEditar(id.to_string()),
            ["consultas"] => Route::Consultas,
            ["consultas", "crear"] => Route::ConsultaCrear,
            ["consultas", id] => Route::ConsultaDetalle(id.to_string()),
            ["consultas", id, "editar"] => Route::ConsultaEditar(id.to_string()),
            ["examenes"] => Route::Examenes,
            ["examenes", "crear"] => Route::ExamenCrear,
            ["examenes", id] => Route::ExamenDetalle(id.to_string()),
            ["examenes", id, "editar"] => Route::ExamenEditar(id.to_string()),
            ["historias"] => Route::Historias,
            ["historias", "crear"] => Route::HistoriaCrear,
            ["historias", id] => Route::HistoriaDetalle(id.to_string()),
            ["historias", id, "editar"] => Route::HistoriaEditar(id.to_string()),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword,
            ["profile"] => Route::Profile,
            ["settings"] => Route::Settings,
            ["500"] => Route::ServerError,
            _ => Route::NotFound,
        }
    }

    /// Routes reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login
                | Route::Register
                | Route::ForgotPassword
                | Route::ResetPassword
                | Route::NotFound
                | Route::ServerError
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        let routes = [
            Route::Home,
            Route::Pacientes,
            Route::PacienteCrear,
            Route::PacienteEditar("42".into()),
            Route::ContactoEditar("42".into()),
            Route::ConsultaDetalle("c 1".into()),
            Route::ExamenEditar("e/9".into()),
            Route::HistoriaCrear,
            Route::Login,
            Route::ServerError,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_crear_is_not_an_id() {
        assert_eq!(Route::parse("/consultas/crear"), Route::ConsultaCrear);
        assert_eq!(Route::parse("/consultas/crear/"), Route::ConsultaCrear);
    }

    #[test]
    fn test_unknown_and_query() {
        assert_eq!(Route::parse("/nada/aqui"), Route::NotFound);
        assert_eq!(Route::parse("/404"), Route::NotFound);
        assert_eq!(Route::parse("/pacientes?page=2"), Route::Pacientes);
    }

    #[test]
    fn test_public_routes() {
        assert!(Route::Login.is_public());
        assert!(!Route::Pacientes.is_public());
        assert!(!Route::Home.is_public());
    }
}
