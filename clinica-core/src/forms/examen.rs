use chrono::{Local, TimeZone};

use super::{
    FieldErrors, FormInput, FormKind, MSG_FECHA_HORA_INVALIDA, check_required, is_blank,
};
use crate::datetime::{combinar_fecha_hora, separar_fecha_hora, to_iso};
use crate::model::{non_blank, EstadoExamen, Examen, ExamenFormData};

pub const MSG_ESTADO_INVALIDO: &str = "El estado no es válido";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamenForm {
    pub paciente_id: String,
    pub tipo: String,
    pub laboratorio: String,
    pub fecha: String,
    pub hora: String,
    pub resultado_url: String,
    pub resultados: String,
    pub observaciones: String,
    pub estado: String,
}

impl Default for ExamenForm {
    fn default() -> Self {
        Self {
            paciente_id: String::new(),
            tipo: String::new(),
            laboratorio: String::new(),
            fecha: String::new(),
            hora: String::new(),
            resultado_url: String::new(),
            resultados: String::new(),
            observaciones: String::new(),
            estado: EstadoExamen::Pendiente.to_string(),
        }
    }
}

impl ExamenForm {
    pub fn from_entity(examen: &Examen) -> Self {
        Self::from_entity_in(examen, &Local)
    }

    pub fn from_entity_in<Tz: TimeZone>(examen: &Examen, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let (fecha, hora) = separar_fecha_hora(&examen.fecha, tz).unwrap_or_default();
        Self {
            paciente_id: examen.paciente_id.clone(),
            tipo: examen.tipo.clone(),
            laboratorio: examen.laboratorio.clone(),
            fecha,
            hora,
            resultado_url: examen.resultado_url.clone().unwrap_or_default(),
            resultados: examen.resultados.clone().unwrap_or_default(),
            observaciones: examen.observaciones.clone().unwrap_or_default(),
            estado: examen.estado.to_string(),
        }
    }

    pub fn validate_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<ExamenFormData, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(self, &mut errors);
        self.check(&mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.build_in(tz)
    }

    fn build_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<ExamenFormData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let Ok(fecha) = combinar_fecha_hora(&self.fecha, &self.hora, tz) else {
            errors.insert("fecha", MSG_FECHA_HORA_INVALIDA);
            return Err(errors);
        };
        let Ok(estado) = self.estado.parse::<EstadoExamen>() else {
            errors.insert("estado", MSG_ESTADO_INVALIDO);
            return Err(errors);
        };

        Ok(ExamenFormData {
            paciente_id: self.paciente_id.trim().to_string(),
            tipo: self.tipo.trim().to_string(),
            laboratorio: self.laboratorio.trim().to_string(),
            fecha: to_iso(&fecha),
            resultado_url: non_blank(&self.resultado_url),
            resultados: non_blank(&self.resultados),
            observaciones: non_blank(&self.observaciones),
            estado,
        })
    }
}

impl FormInput for ExamenForm {
    type Output = ExamenFormData;

    const KIND: FormKind = FormKind::Examen;

    fn value(&self, field: &str) -> Option<&str> {
        let v = match field {
            "pacienteId" => &self.paciente_id,
            "tipo" => &self.tipo,
            "laboratorio" => &self.laboratorio,
            "fecha" => &self.fecha,
            "hora" => &self.hora,
            "resultadoUrl" => &self.resultado_url,
            "resultados" => &self.resultados,
            "observaciones" => &self.observaciones,
            "estado" => &self.estado,
            _ => return None,
        };
        Some(v)
    }

    fn check(&self, errors: &mut FieldErrors) {
        if !is_blank(&self.estado) && self.estado.parse::<EstadoExamen>().is_err() {
            errors.insert("estado", MSG_ESTADO_INVALIDO);
        }
    }

    fn build(&self) -> Result<ExamenFormData, FieldErrors> {
        self.build_in(&Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_required_fields() {
        let errors = ExamenForm::default().validate_in(&Utc).unwrap_err();
        assert_eq!(errors.get("laboratorio"), Some("El laboratorio es requerido"));
        assert_eq!(errors.get("tipo"), Some("El tipo de examen es requerido"));
        assert!(errors.contains("hora"));
    }

    #[test]
    fn test_valid_lab_test() {
        let form = ExamenForm {
            paciente_id: "p1".into(),
            tipo: "hemograma".into(),
            laboratorio: "Central".into(),
            fecha: "2025-01-02".into(),
            hora: "08:00".into(),
            estado: "completado".into(),
            resultados: "normal".into(),
            ..Default::default()
        };
        let data = form.validate_in(&Utc).unwrap();
        assert_eq!(data.fecha, "2025-01-02T08:00:00.000Z");
        assert_eq!(data.estado, EstadoExamen::Completado);
        assert_eq!(data.observaciones, None);
    }

    #[test]
    fn test_consulta_vocabulary_rejected() {
        let form = ExamenForm {
            estado: "completada".into(),
            ..Default::default()
        };
        assert!(form.validate_in(&Utc).unwrap_err().contains("estado"));
    }
}
