use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{id_string, Entity, Paciente};
use crate::error::ClinicaError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoExamen {
    #[default]
    Pendiente,
    Completado,
    Cancelado,
}

impl EstadoExamen {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoExamen::Pendiente => "pendiente",
            EstadoExamen::Completado => "completado",
            EstadoExamen::Cancelado => "cancelado",
        }
    }
}

impl fmt::Display for EstadoExamen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoExamen {
    type Err = ClinicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(EstadoExamen::Pendiente),
            "completado" => Ok(EstadoExamen::Completado),
            "cancelado" => Ok(EstadoExamen::Cancelado),
            _ => Err(ClinicaError::InvalidEnum {
                kind: "estado de examen",
                value: s.to_string(),
            }),
        }
    }
}

/// Laboratory or diagnostic test ordered for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examen {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub paciente_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paciente: Option<Box<Paciente>>,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub laboratorio: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultado_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultados: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub estado: EstadoExamen,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Examen {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamenFormData {
    pub paciente_id: String,
    pub tipo: String,
    pub laboratorio: String,
    pub fecha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resultado_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resultados: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    pub estado: EstadoExamen,
}
