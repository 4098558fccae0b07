use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClinicaError {
    #[error("Invalid date/time: {0}")]
    InvalidDate(String),

    #[error("Unknown {kind} value: {value}")]
    InvalidEnum { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ClinicaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EstadoConsulta;

    #[test]
    fn test_parse_failures_surface_as_core_errors() {
        let err = crate::datetime::combinar_fecha_hora("2025-13-40", "14:30", &chrono::Utc).unwrap_err();
        assert!(matches!(err, ClinicaError::InvalidDate(_)));

        let err = "archivada".parse::<EstadoConsulta>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown estado de consulta value: archivada"
        );
    }
}
