use super::{FieldErrors, FormInput, FormKind, MSG_FECHA_INVALIDA};
use crate::datetime::fecha_a_iso;
use crate::model::{non_blank, Expediente, ExpedienteFormData, TipoRegistro};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpedienteForm {
    pub paciente_id: String,
    pub tipo: String,
    pub titulo: String,
    pub fecha: String,
    pub descripcion: String,
    pub doctor: String,
    pub especialidad: String,
    pub diagnostico: String,
    pub tratamiento: String,
    pub archivos: Vec<String>,
}

impl ExpedienteForm {
    pub fn from_entity(expediente: &Expediente) -> Self {
        // the date input only edits the day part
        let fecha = expediente.fecha.get(..10).unwrap_or(&expediente.fecha).to_string();
        Self {
            paciente_id: expediente.paciente_id.clone(),
            tipo: expediente.tipo.to_string(),
            titulo: expediente.titulo.clone().unwrap_or_default(),
            fecha,
            descripcion: expediente.descripcion.clone(),
            doctor: expediente.doctor.clone().unwrap_or_default(),
            especialidad: expediente.especialidad.clone().unwrap_or_default(),
            diagnostico: expediente.diagnostico.clone().unwrap_or_default(),
            tratamiento: expediente.tratamiento.clone().unwrap_or_default(),
            archivos: expediente.archivos.clone(),
        }
    }
}

impl FormInput for ExpedienteForm {
    type Output = ExpedienteFormData;

    const KIND: FormKind = FormKind::Expediente;

    fn value(&self, field: &str) -> Option<&str> {
        let v = match field {
            "pacienteId" => &self.paciente_id,
            "tipo" => &self.tipo,
            "titulo" => &self.titulo,
            "fecha" => &self.fecha,
            "descripcion" => &self.descripcion,
            "doctor" => &self.doctor,
            "especialidad" => &self.especialidad,
            "diagnostico" => &self.diagnostico,
            "tratamiento" => &self.tratamiento,
            _ => return None,
        };
        Some(v)
    }

    fn check(&self, _errors: &mut FieldErrors) {}

    fn build(&self) -> Result<ExpedienteFormData, FieldErrors> {
        let fecha = fecha_a_iso(&self.fecha).map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.insert("fecha", MSG_FECHA_INVALIDA);
            errors
        })?;

        Ok(ExpedienteFormData {
            paciente_id: self.paciente_id.trim().to_string(),
            tipo: TipoRegistro::from(self.tipo.trim().to_string()),
            titulo: non_blank(&self.titulo),
            fecha,
            descripcion: self.descripcion.trim().to_string(),
            doctor: non_blank(&self.doctor),
            especialidad: non_blank(&self.especialidad),
            diagnostico: non_blank(&self.diagnostico),
            tratamiento: non_blank(&self.tratamiento),
            archivos: self
                .archivos
                .iter()
                .filter_map(|a| non_blank(a))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_required() {
        let form = ExpedienteForm {
            paciente_id: "p1".into(),
            tipo: "vacuna".into(),
            fecha: "2025-04-01".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("descripcion"), Some("La descripción es requerida"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_bad_date_is_field_error() {
        let form = ExpedienteForm {
            paciente_id: "p1".into(),
            tipo: "otro".into(),
            fecha: "01/04/2025".into(),
            descripcion: "nota".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap_err().get("fecha"), Some(MSG_FECHA_INVALIDA));
    }

    #[test]
    fn test_valid_record() {
        let form = ExpedienteForm {
            paciente_id: "p1".into(),
            tipo: "Cirugía".into(),
            fecha: "2025-04-01".into(),
            descripcion: "apendicectomía".into(),
            archivos: vec!["informe.pdf".into(), " ".into()],
            ..Default::default()
        };
        let data = form.validate().unwrap();
        assert_eq!(data.tipo, TipoRegistro::Cirugia);
        assert_eq!(data.fecha, "2025-04-01T00:00:00.000Z");
        assert_eq!(data.archivos, vec!["informe.pdf".to_string()]);
    }
}
