//! Canonical entity schemas.
//!
//! Backends in the field still emit several historical shapes (numeric ids,
//! `dni` instead of `documento`, `sexo` instead of `genero`, ...). Those are
//! absorbed here, at the deserialization boundary, so the rest of the client
//! only ever sees one schema per entity.

pub mod auth;
pub mod consulta;
pub mod examen;
pub mod expediente;
pub mod orquestador;
pub mod paciente;

pub use auth::{AuthResponse, Credenciales, Registro, TokenRefresh, Usuario};
pub use consulta::{Consulta, ConsultaFormData, EstadoConsulta};
pub use examen::{EstadoExamen, Examen, ExamenFormData};
pub use expediente::{Expediente, ExpedienteFormData, TipoRegistro};
pub use orquestador::{
    ApiResponse, BusquedaGlobal, ConfirmacionLectura, DashboardData, Disponibilidad, EstadoServicio, EstadoSistema,
    FiltroReporte, Notificacion, Notificaciones, PacienteCompleto, ReporteConsultas,
    SaludGeneral,
};
pub use paciente::{ContactoFormData, ContactoInfo, Paciente, PacienteFormData};

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Debug;

/// A server-owned record identified by a string id.
///
/// Identity is plain string equality; there is no client-side identity map.
pub trait Entity: Clone + Debug + PartialEq + Send + Sync + DeserializeOwned + 'static {
    fn id(&self) -> &str;
}

/// Accept ids sent either as JSON strings or numbers.
pub(crate) fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid id: {}", other))),
    }
}

pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("invalid id: {}", other))),
    }
}

/// First value that is present and not blank.
pub(crate) fn first_filled(primary: Option<String>, legacy: Option<String>) -> Option<String> {
    primary
        .filter(|s| !s.trim().is_empty())
        .or_else(|| legacy.filter(|s| !s.trim().is_empty()))
}

/// Blank strings become `None`.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
