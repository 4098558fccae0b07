use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{first_filled, id_string, opt_id_string, Entity};

pub const TIPO_DOCUMENTO_DEFAULT: &str = "DNI";

/// Patient, the root entity every other record points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PacienteWire")]
pub struct Paciente {
    pub id: String,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    pub tipo_documento: String,
    pub documento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edad: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_registro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Paciente {
    /// "Nombre Apellido", or just the name when there is no surname.
    pub fn nombre_completo(&self) -> String {
        match self.apellido.as_deref().map(str::trim) {
            Some(apellido) if !apellido.is_empty() => format!("{} {}", self.nombre, apellido),
            _ => self.nombre.clone(),
        }
    }
}

impl Entity for Paciente {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Every patient shape the backends have ever produced.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PacienteWire {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    nombre: String,
    apellido: Option<String>,
    tipo_documento: Option<String>,
    documento: Option<String>,
    dni: Option<String>,
    fecha_nacimiento: Option<String>,
    #[serde(rename = "fecha_nac")]
    fecha_nac: Option<String>,
    edad: Option<Value>,
    genero: Option<String>,
    sexo: Option<String>,
    telefono: Option<String>,
    email: Option<String>,
    direccion: Option<String>,
    fecha_registro: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<PacienteWire> for Paciente {
    fn from(wire: PacienteWire) -> Self {
        Self {
            id: wire.id,
            nombre: wire.nombre,
            apellido: wire.apellido,
            tipo_documento: first_filled(wire.tipo_documento, None)
                .unwrap_or_else(|| TIPO_DOCUMENTO_DEFAULT.to_string()),
            documento: first_filled(wire.documento, wire.dni).unwrap_or_default(),
            fecha_nacimiento: first_filled(wire.fecha_nacimiento, wire.fecha_nac),
            edad: wire.edad.as_ref().and_then(parse_edad),
            genero: first_filled(wire.genero, wire.sexo),
            telefono: wire.telefono,
            email: wire.email,
            direccion: wire.direccion,
            fecha_registro: wire.fecha_registro,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

/// Legacy forms sent the age as a string.
fn parse_edad(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Payload for patient create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacienteFormData {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    pub tipo_documento: String,
    pub documento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edad: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

/// Contact details, one-to-one with a patient and created lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ContactoWire")]
pub struct ContactoInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paciente_id: Option<String>,
    pub telefono: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactoWire {
    #[serde(default, deserialize_with = "opt_id_string")]
    paciente_id: Option<String>,
    #[serde(default, rename = "id_paciente", deserialize_with = "opt_id_string")]
    id_paciente: Option<String>,
    #[serde(default)]
    telefono: String,
    email: Option<String>,
    direccion: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<ContactoWire> for ContactoInfo {
    fn from(wire: ContactoWire) -> Self {
        Self {
            paciente_id: first_filled(wire.paciente_id, wire.id_paciente),
            telefono: wire.telefono,
            email: wire.email,
            direccion: wire.direccion,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactoFormData {
    pub telefono: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_patient() {
        let p: Paciente = serde_json::from_value(json!({
            "id": "p1",
            "nombre": "Ana",
            "apellido": "Gómez",
            "tipoDocumento": "CE",
            "documento": "001234",
            "fechaNacimiento": "1990-05-01",
            "genero": "femenino",
            "email": "ana@example.com"
        }))
        .unwrap();

        assert_eq!(p.id, "p1");
        assert_eq!(p.tipo_documento, "CE");
        assert_eq!(p.documento, "001234");
        assert_eq!(p.genero.as_deref(), Some("femenino"));
        assert_eq!(p.nombre_completo(), "Ana Gómez");
    }

    #[test]
    fn test_legacy_patient_fields() {
        let p: Paciente = serde_json::from_value(json!({
            "id": 7,
            "nombre": "Luis",
            "dni": "44556677",
            "fecha_nac": "1985-01-30",
            "sexo": "masculino",
            "edad": "39"
        }))
        .unwrap();

        assert_eq!(p.id, "7");
        assert_eq!(p.tipo_documento, "DNI");
        assert_eq!(p.documento, "44556677");
        assert_eq!(p.fecha_nacimiento.as_deref(), Some("1985-01-30"));
        assert_eq!(p.genero.as_deref(), Some("masculino"));
        assert_eq!(p.edad, Some(39));
    }

    #[test]
    fn test_canonical_field_wins_over_legacy() {
        let p: Paciente = serde_json::from_value(json!({
            "id": "1",
            "nombre": "X",
            "documento": "111",
            "dni": "222"
        }))
        .unwrap();
        assert_eq!(p.documento, "111");
    }

    #[test]
    fn test_serializes_canonical_names_only() {
        let p: Paciente = serde_json::from_value(json!({
            "id": "1", "nombre": "X", "dni": "222", "sexo": "f"
        }))
        .unwrap();
        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["documento"], "222");
        assert_eq!(out["genero"], "f");
        assert!(out.get("dni").is_none());
        assert!(out.get("sexo").is_none());
    }

    #[test]
    fn test_patient_without_id_is_rejected() {
        assert!(serde_json::from_value::<Paciente>(json!({"nombre": "X"})).is_err());
    }

    #[test]
    fn test_contact_legacy_patient_id() {
        let c: ContactoInfo = serde_json::from_value(json!({
            "id_paciente": 12,
            "telefono": "+51987654321"
        }))
        .unwrap();
        assert_eq!(c.paciente_id.as_deref(), Some("12"));
        assert_eq!(c.email, None);
    }
}
