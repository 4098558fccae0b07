use super::{FieldErrors, FormInput, FormKind, check_contact_formats};
use crate::model::{non_blank, ContactoFormData, ContactoInfo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactoForm {
    pub telefono: String,
    pub email: String,
    pub direccion: String,
}

impl ContactoForm {
    pub fn from_entity(contacto: &ContactoInfo) -> Self {
        Self {
            telefono: contacto.telefono.clone(),
            email: contacto.email.clone().unwrap_or_default(),
            direccion: contacto.direccion.clone().unwrap_or_default(),
        }
    }
}

impl FormInput for ContactoForm {
    type Output = ContactoFormData;

    const KIND: FormKind = FormKind::Contacto;

    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "telefono" => Some(&self.telefono),
            "email" => Some(&self.email),
            "direccion" => Some(&self.direccion),
            _ => None,
        }
    }

    fn check(&self, errors: &mut FieldErrors) {
        check_contact_formats(&self.email, &self.telefono, errors);
    }

    fn build(&self) -> Result<ContactoFormData, FieldErrors> {
        Ok(ContactoFormData {
            telefono: self.telefono.trim().to_string(),
            email: non_blank(&self.email),
            direccion: non_blank(&self.direccion),
        })
    }
}
