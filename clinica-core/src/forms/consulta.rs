use chrono::{Local, TimeZone};

use super::{
    FieldErrors, FormInput, FormKind, MSG_FECHA_HORA_INVALIDA, check_required, is_blank,
};
use crate::datetime::{combinar_fecha_hora, separar_fecha_hora, to_iso};
use crate::model::{non_blank, Consulta, ConsultaFormData, EstadoConsulta};

pub const MSG_ESTADO_INVALIDO: &str = "El estado no es válido";

/// Consultation form; `fecha` and `hora` are edited apart and submitted as
/// one UTC timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultaForm {
    pub paciente_id: String,
    pub doctor: String,
    pub especialidad: String,
    pub fecha: String,
    pub hora: String,
    pub motivo: String,
    pub diagnostico: String,
    pub tratamiento: String,
    pub estado: String,
}

impl Default for ConsultaForm {
    fn default() -> Self {
        Self {
            paciente_id: String::new(),
            doctor: String::new(),
            especialidad: String::new(),
            fecha: String::new(),
            hora: String::new(),
            motivo: String::new(),
            diagnostico: String::new(),
            tratamiento: String::new(),
            estado: EstadoConsulta::Pendiente.to_string(),
        }
    }
}

impl ConsultaForm {
    /// New consultation form pre-filled with the patient it belongs to.
    pub fn para_paciente(paciente_id: impl Into<String>) -> Self {
        Self {
            paciente_id: paciente_id.into(),
            ..Self::default()
        }
    }

    pub fn from_entity(consulta: &Consulta) -> Self {
        Self::from_entity_in(consulta, &Local)
    }

    pub fn from_entity_in<Tz: TimeZone>(consulta: &Consulta, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let (fecha, hora) = separar_fecha_hora(&consulta.fecha, tz).unwrap_or_default();
        let paciente_id = if consulta.paciente_id.is_empty() {
            consulta
                .paciente
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_default()
        } else {
            consulta.paciente_id.clone()
        };
        Self {
            paciente_id,
            doctor: consulta.doctor.clone(),
            especialidad: consulta.especialidad.clone(),
            fecha,
            hora,
            motivo: consulta.motivo.clone(),
            diagnostico: consulta.diagnostico.clone().unwrap_or_default(),
            tratamiento: consulta.tratamiento.clone().unwrap_or_default(),
            estado: consulta.estado.to_string(),
        }
    }

    /// Validate with `fecha`/`hora` read as wall-clock time in `tz`.
    pub fn validate_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<ConsultaFormData, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(self, &mut errors);
        self.check(&mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.build_in(tz)
    }

    fn build_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<ConsultaFormData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let fecha = match combinar_fecha_hora(&self.fecha, &self.hora, tz) {
            Ok(dt) => to_iso(&dt),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected consultation date/time");
                errors.insert("fecha", MSG_FECHA_HORA_INVALIDA);
                return Err(errors);
            }
        };
        let estado = match self.estado.parse::<EstadoConsulta>() {
            Ok(estado) => estado,
            Err(_) => {
                errors.insert("estado", MSG_ESTADO_INVALIDO);
                return Err(errors);
            }
        };

        Ok(ConsultaFormData {
            paciente_id: self.paciente_id.trim().to_string(),
            doctor: self.doctor.trim().to_string(),
            especialidad: self.especialidad.trim().to_string(),
            fecha,
            motivo: self.motivo.trim().to_string(),
            diagnostico: non_blank(&self.diagnostico),
            tratamiento: non_blank(&self.tratamiento),
            estado,
        })
    }
}

impl FormInput for ConsultaForm {
    type Output = ConsultaFormData;

    const KIND: FormKind = FormKind::Consulta;

    fn value(&self, field: &str) -> Option<&str> {
        let v = match field {
            "pacienteId" => &self.paciente_id,
            "doctor" => &self.doctor,
            "especialidad" => &self.especialidad,
            "fecha" => &self.fecha,
            "hora" => &self.hora,
            "motivo" => &self.motivo,
            "diagnostico" => &self.diagnostico,
            "tratamiento" => &self.tratamiento,
            "estado" => &self.estado,
            _ => return None,
        };
        Some(v)
    }

    fn check(&self, errors: &mut FieldErrors) {
        if !is_blank(&self.estado) && self.estado.parse::<EstadoConsulta>().is_err() {
            errors.insert("estado", MSG_ESTADO_INVALIDO);
        }
    }

    fn build(&self) -> Result<ConsultaFormData, FieldErrors> {
        self.build_in(&Local)
    }
}
