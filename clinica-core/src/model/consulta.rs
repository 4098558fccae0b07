use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{id_string, Entity, Paciente};
use crate::error::ClinicaError;

/// Lifecycle of a consultation.
///
/// Feminine forms; lab tests use the masculine [`super::EstadoExamen`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoConsulta {
    #[default]
    Pendiente,
    Completada,
    Cancelada,
}

impl EstadoConsulta {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoConsulta::Pendiente => "pendiente",
            EstadoConsulta::Completada => "completada",
            EstadoConsulta::Cancelada => "cancelada",
        }
    }
}

impl fmt::Display for EstadoConsulta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoConsulta {
    type Err = ClinicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(EstadoConsulta::Pendiente),
            "completada" => Ok(EstadoConsulta::Completada),
            "cancelada" => Ok(EstadoConsulta::Cancelada),
            _ => Err(ClinicaError::InvalidEnum {
                kind: "estado de consulta",
                value: s.to_string(),
            }),
        }
    }
}

/// A scheduled or completed visit with a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consulta {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub paciente_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paciente: Option<Box<Paciente>>,
    #[serde(default)]
    pub doctor: String,
    #[serde(default)]
    pub especialidad: String,
    /// ISO-8601 timestamp carrying both date and time.
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub motivo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostico: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tratamiento: Option<String>,
    #[serde(default)]
    pub estado: EstadoConsulta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Consulta {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultaFormData {
    pub paciente_id: String,
    pub doctor: String,
    pub especialidad: String,
    pub fecha: String,
    pub motivo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostico: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tratamiento: Option<String>,
    pub estado: EstadoConsulta,
}
