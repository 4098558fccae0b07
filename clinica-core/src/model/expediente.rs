use serde::{Deserialize, Serialize};
use std::fmt;

use super::{id_string, Entity, Paciente};

/// Kind of clinical record entry.
///
/// Open-ended: values outside the known set are kept verbatim in
/// [`TipoRegistro::Personalizado`] so they survive a read/update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TipoRegistro {
    Consulta,
    Examen,
    Cirugia,
    Hospitalizacion,
    Emergencia,
    Vacuna,
    Otro,
    Personalizado(String),
}

impl TipoRegistro {
    pub const CONOCIDOS: [TipoRegistro; 7] = [
        TipoRegistro::Consulta,
        TipoRegistro::Examen,
        TipoRegistro::Cirugia,
        TipoRegistro::Hospitalizacion,
        TipoRegistro::Emergencia,
        TipoRegistro::Vacuna,
        TipoRegistro::Otro,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TipoRegistro::Consulta => "consulta",
            TipoRegistro::Examen => "examen",
            TipoRegistro::Cirugia => "cirugia",
            TipoRegistro::Hospitalizacion => "hospitalizacion",
            TipoRegistro::Emergencia => "emergencia",
            TipoRegistro::Vacuna => "vacuna",
            TipoRegistro::Otro => "otro",
            TipoRegistro::Personalizado(s) => s,
        }
    }

    /// Human label shown in selects.
    pub fn etiqueta(&self) -> &str {
        match self {
            TipoRegistro::Consulta => "Consulta Médica",
            TipoRegistro::Examen => "Examen de Laboratorio",
            TipoRegistro::Cirugia => "Cirugía",
            TipoRegistro::Hospitalizacion => "Hospitalización",
            TipoRegistro::Emergencia => "Emergencia",
            TipoRegistro::Vacuna => "Vacuna",
            TipoRegistro::Otro => "Otro",
            TipoRegistro::Personalizado(s) => s,
        }
    }
}

impl From<String> for TipoRegistro {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "consulta" => TipoRegistro::Consulta,
            "examen" => TipoRegistro::Examen,
            "cirugia" | "cirugía" => TipoRegistro::Cirugia,
            "hospitalizacion" | "hospitalización" => TipoRegistro::Hospitalizacion,
            "emergencia" => TipoRegistro::Emergencia,
            "vacuna" => TipoRegistro::Vacuna,
            "otro" => TipoRegistro::Otro,
            _ => TipoRegistro::Personalizado(value),
        }
    }
}

impl From<TipoRegistro> for String {
    fn from(value: TipoRegistro) -> Self {
        match value {
            TipoRegistro::Personalizado(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TipoRegistro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic clinical record entry (historia clínica).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expediente {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub paciente_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paciente: Option<Box<Paciente>>,
    pub tipo: TipoRegistro,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especialidad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostico: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tratamiento: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archivos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Expediente {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpedienteFormData {
    pub paciente_id: String,
    pub tipo: TipoRegistro,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    pub fecha: String,
    pub descripcion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub especialidad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostico: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tratamiento: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub archivos: Vec<String>,
}
