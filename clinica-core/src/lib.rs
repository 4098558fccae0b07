//! clinica-core - domain model and client-side rules for the clinic client
//!
//! Canonical entity schemas with adapters for legacy payloads, form
//! validation, date/time composition, display formatting, the web route
//! table and the auth gate.

pub mod datetime;
pub mod error;
pub mod format;
pub mod forms;
pub mod gate;
pub mod model;
pub mod routes;

pub use error::{ClinicaError, Result};
pub use forms::{FieldErrors, FormInput, FormKind};
pub use gate::{AuthGate, AuthMode, GateDecision, SessionView};
pub use model::{
    ContactoFormData, ContactoInfo, Consulta, ConsultaFormData, Entity, EstadoConsulta,
    EstadoExamen, Examen, ExamenFormData, Expediente, ExpedienteFormData, Paciente,
    PacienteFormData, TipoRegistro,
};
pub use routes::Route;
