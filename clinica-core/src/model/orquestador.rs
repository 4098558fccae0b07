//! Cross-entity views served by the orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{id_string, Consulta, EstadoConsulta, Examen, Expediente, Paciente};

/// Envelope every orchestrator endpoint wraps its payload in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardData {
    pub total_pacientes: u64,
    pub total_consultas: u64,
    pub examenes_completados: u64,
    pub examenes_en_proceso: u64,
    pub consultas_por_estado: BTreeMap<String, u64>,
    pub consultas_recientes: Vec<Consulta>,
    pub pacientes_recientes: Vec<Paciente>,
}

/// A patient together with everything recorded against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacienteCompleto {
    pub paciente: Paciente,
    #[serde(default)]
    pub consultas: Vec<Consulta>,
    #[serde(default)]
    pub lab_tests: Vec<Examen>,
    #[serde(default)]
    pub medical_records: Vec<Expediente>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusquedaGlobal {
    pub pacientes: Vec<Paciente>,
    pub consultas: Vec<Consulta>,
    pub lab_tests: Vec<Examen>,
}

impl BusquedaGlobal {
    pub fn total(&self) -> usize {
        self.pacientes.len() + self.consultas.len() + self.lab_tests.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disponibilidad {
    Up,
    Down,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaludGeneral {
    Healthy,
    Degraded,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstadoServicio {
    pub status: Disponibilidad,
    #[serde(default)]
    pub latencia: f64,
    #[serde(default)]
    pub ultima_actualizacion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstadoSistema {
    #[serde(default)]
    pub servicios: BTreeMap<String, EstadoServicio>,
    pub general: SaludGeneral,
}

impl EstadoSistema {
    /// Names of services not reporting `up`.
    pub fn servicios_afectados(&self) -> Vec<&str> {
        self.servicios
            .iter()
            .filter(|(_, s)| s.status != Disponibilidad::Up)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReporteConsultas {
    pub total_consultas: u64,
    pub consultas_por_especialidad: BTreeMap<String, u64>,
    pub consultas_por_estado: BTreeMap<String, u64>,
    pub consultas_por_dia: BTreeMap<String, u64>,
}

/// Optional narrowing for the consultation report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltroReporte {
    pub especialidad: Option<String>,
    pub estado: Option<EstadoConsulta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notificacion {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub mensaje: String,
    #[serde(default)]
    pub leida: bool,
    #[serde(default)]
    pub fecha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entidad_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entidad_tipo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notificaciones {
    pub notificaciones: Vec<Notificacion>,
    pub no_leidas: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmacionLectura {
    #[serde(default)]
    pub success: bool,
}
