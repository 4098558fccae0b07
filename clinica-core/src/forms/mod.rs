//! Client-side form validation.
//!
//! Each form holds raw field text. `validate` runs synchronously: required
//! fields from the registry, then the form's own format checks. A failing
//! form yields one message per field and no payload, so nothing reaches the
//! network.

pub mod consulta;
pub mod contacto;
pub mod examen;
pub mod expediente;
pub mod paciente;

pub use consulta::ConsultaForm;
pub use contacto::ContactoForm;
pub use examen::ExamenForm;
pub use expediente::ExpedienteForm;
pub use paciente::PacienteForm;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Paciente,
    Contacto,
    Consulta,
    Examen,
    Expediente,
}

/// Required fields per form with the message shown when one is blank.
static REQUIRED_FIELDS: LazyLock<HashMap<FormKind, &[(&str, &str)]>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(
        FormKind::Paciente,
        [
            ("nombre", "El nombre es requerido"),
            ("documento", "El documento es requerido"),
        ]
        .as_slice(),
    );
    m.insert(
        FormKind::Contacto,
        [("telefono", "El teléfono es requerido")].as_slice(),
    );
    m.insert(
        FormKind::Consulta,
        [
            ("pacienteId", "El ID del paciente es requerido"),
            ("doctor", "El nombre del doctor es requerido"),
            ("especialidad", "La especialidad es requerida"),
            ("fecha", "La fecha es requerida"),
            ("hora", "La hora es requerida"),
            ("motivo", "El motivo de la consulta es requerido"),
        ]
        .as_slice(),
    );
    m.insert(
        FormKind::Examen,
        [
            ("pacienteId", "El ID del paciente es requerido"),
            ("tipo", "El tipo de examen es requerido"),
            ("laboratorio", "El laboratorio es requerido"),
            ("fecha", "La fecha es requerida"),
            ("hora", "La hora es requerida"),
        ]
        .as_slice(),
    );
    m.insert(
        FormKind::Expediente,
        [
            ("pacienteId", "El ID del paciente es requerido"),
            ("tipo", "El tipo de registro es requerido"),
            ("fecha", "La fecha es requerida"),
            ("descripcion", "La descripción es requerida"),
        ]
        .as_slice(),
    );
    m
});

pub const MSG_EMAIL_INVALIDO: &str = "El correo electrónico no es válido";
pub const MSG_TELEFONO_INVALIDO: &str = "El teléfono no es válido";
pub const MSG_FECHA_HORA_INVALIDA: &str =
    "Error al procesar la fecha y hora. Por favor verifique el formato.";
pub const MSG_FECHA_INVALIDA: &str = "Error al procesar la fecha. Por favor verifique el formato.";

/// Per-field validation messages, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field is kept.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Drop a field's message, as when the user edits that field.
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when no message was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

/// A form whose raw text validates into a request payload.
pub trait FormInput {
    type Output;

    const KIND: FormKind;

    /// Raw text of a field by wire name; `None` for unknown names.
    fn value(&self, field: &str) -> Option<&str>;

    /// Form-specific checks beyond required presence.
    fn check(&self, errors: &mut FieldErrors);

    /// Build the payload; only called once every check passed.
    fn build(&self) -> Result<Self::Output, FieldErrors>;

    fn validate(&self) -> Result<Self::Output, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(self, &mut errors);
        self.check(&mut errors);
        if !errors.is_empty() {
            tracing::debug!(form = ?Self::KIND, errors = %errors, "Form validation failed");
            return Err(errors);
        }
        self.build()
    }
}

/// Apply the registry's required-field rules to a form.
pub fn check_required<F: FormInput + ?Sized>(form: &F, errors: &mut FieldErrors) {
    if let Some(fields) = REQUIRED_FIELDS.get(&F::KIND) {
        for (field, message) in *fields {
            if form.value(field).is_none_or(is_blank) {
                errors.insert(*field, *message);
            }
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot after it.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Optional leading `+`, then 8 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Shared optional email/phone checks for forms that carry them.
pub(crate) fn check_contact_formats(
    email: &str,
    telefono: &str,
    errors: &mut FieldErrors,
) {
    if !is_blank(email) && !is_valid_email(email.trim()) {
        errors.insert("email", MSG_EMAIL_INVALIDO);
    }
    if !is_blank(telefono) && !is_valid_phone(telefono.trim()) {
        errors.insert("telefono", MSG_TELEFONO_INVALIDO);
    }
}
