//! Date/time handling for forms.
//!
//! Forms edit a date and a wall-clock time separately; the backends store a
//! single ISO-8601 UTC timestamp. Composition interprets the pair in a given
//! time zone (normally [`chrono::Local`]).

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};

use crate::error::{ClinicaError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

pub fn parse_fecha(fecha: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(fecha.trim(), DATE_FORMAT)
        .map_err(|_| ClinicaError::InvalidDate(format!("fecha inválida: '{}'", fecha)))
}

pub fn parse_hora(hora: &str) -> Result<NaiveTime> {
    let hora = hora.trim();
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(hora, f).ok())
        .ok_or_else(|| ClinicaError::InvalidDate(format!("hora inválida: '{}'", hora)))
}

/// Combine a `YYYY-MM-DD` date and `HH:MM` time, read as local time in `tz`.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// nonexistent ones (DST spring-forward gap) are an error.
pub fn combinar_fecha_hora<Tz: TimeZone>(fecha: &str, hora: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::new(parse_fecha(fecha)?, parse_hora(hora)?);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(ClinicaError::InvalidDate(format!(
            "{} {} no existe en la zona horaria local",
            fecha, hora
        ))),
    }
}

/// Millisecond-precision, `Z`-suffixed ISO-8601, the format the backends store.
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse whatever a backend sent as `fecha`.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) or a bare
/// date (UTC midnight).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ClinicaError::InvalidDate(format!("marca de tiempo inválida: '{}'", value)))
}

/// Split a stored timestamp into the form's local `(fecha, hora)` pair.
pub fn separar_fecha_hora<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<(String, String)>
where
    Tz::Offset: std::fmt::Display,
{
    if value.trim().is_empty() {
        return None;
    }
    let local = parse_timestamp(value).ok()?.with_timezone(tz);
    Some((
        local.format(DATE_FORMAT).to_string(),
        local.format("%H:%M").to_string(),
    ))
}

/// Normalize a date-only field to the stored ISO form.
pub fn fecha_a_iso(fecha: &str) -> Result<String> {
    parse_timestamp(fecha).map(|dt| to_iso(&dt))
}
