use super::{FieldErrors, FormInput, FormKind, check_contact_formats, is_blank};
use crate::model::paciente::TIPO_DOCUMENTO_DEFAULT;
use crate::model::{non_blank, Paciente, PacienteFormData};

pub const GENERO_DEFAULT: &str = "masculino";
pub const MSG_EDAD_INVALIDA: &str = "La edad debe ser un número entero";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacienteForm {
    pub nombre: String,
    pub apellido: String,
    pub tipo_documento: String,
    pub documento: String,
    pub fecha_nacimiento: String,
    pub edad: String,
    pub genero: String,
    pub telefono: String,
    pub email: String,
    pub direccion: String,
}

impl Default for PacienteForm {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            apellido: String::new(),
            tipo_documento: TIPO_DOCUMENTO_DEFAULT.to_string(),
            documento: String::new(),
            fecha_nacimiento: String::new(),
            edad: String::new(),
            genero: GENERO_DEFAULT.to_string(),
            telefono: String::new(),
            email: String::new(),
            direccion: String::new(),
        }
    }
}

impl PacienteForm {
    /// Seed the form for editing an existing patient.
    pub fn from_entity(paciente: &Paciente) -> Self {
        Self {
            nombre: paciente.nombre.clone(),
            apellido: paciente.apellido.clone().unwrap_or_default(),
            tipo_documento: paciente.tipo_documento.clone(),
            documento: paciente.documento.clone(),
            fecha_nacimiento: paciente.fecha_nacimiento.clone().unwrap_or_default(),
            edad: paciente.edad.map(|e| e.to_string()).unwrap_or_default(),
            genero: paciente
                .genero
                .clone()
                .unwrap_or_else(|| GENERO_DEFAULT.to_string()),
            telefono: paciente.telefono.clone().unwrap_or_default(),
            email: paciente.email.clone().unwrap_or_default(),
            direccion: paciente.direccion.clone().unwrap_or_default(),
        }
    }
}

impl FormInput for PacienteForm {
    type Output = PacienteFormData;

    const KIND: FormKind = FormKind::Paciente;

    fn value(&self, field: &str) -> Option<&str> {
        let v = match field {
            "nombre" => &self.nombre,
            "apellido" => &self.apellido,
            "tipoDocumento" => &self.tipo_documento,
            "documento" => &self.documento,
            "fechaNacimiento" => &self.fecha_nacimiento,
            "edad" => &self.edad,
            "genero" => &self.genero,
            "telefono" => &self.telefono,
            "email" => &self.email,
            "direccion" => &self.direccion,
            _ => return None,
        };
        Some(v)
    }

    fn check(&self, errors: &mut FieldErrors) {
        check_contact_formats(&self.email, &self.telefono, errors);
        if !is_blank(&self.edad) && self.edad.trim().parse::<u32>().is_err() {
            errors.insert("edad", MSG_EDAD_INVALIDA);
        }
    }

    fn build(&self) -> Result<PacienteFormData, FieldErrors> {
        Ok(PacienteFormData {
            nombre: self.nombre.trim().to_string(),
            apellido: non_blank(&self.apellido),
            tipo_documento: non_blank(&self.tipo_documento)
                .unwrap_or_else(|| TIPO_DOCUMENTO_DEFAULT.to_string()),
            documento: self.documento.trim().to_string(),
            fecha_nacimiento: non_blank(&self.fecha_nacimiento),
            edad: self.edad.trim().parse().ok(),
            genero: non_blank(&self.genero),
            telefono: non_blank(&self.telefono),
            email: non_blank(&self.email),
            direccion: non_blank(&self.direccion),
        })
    }
}
