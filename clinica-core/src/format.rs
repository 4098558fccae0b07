//! Display helpers for list and detail views.

use chrono::{Datelike, Local, NaiveDate, TimeZone};

use crate::datetime::parse_timestamp;

/// `dd/mm/yyyy`; unparseable input is returned unchanged.
pub fn formatear_fecha(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match parse_timestamp(value) {
        Ok(dt) => dt.with_timezone(&Local).format("%d/%m/%Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// `dd/mm/yyyy HH:MM` in the given zone.
pub fn formatear_fecha_hora_en<Tz: TimeZone>(value: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if value.is_empty() {
        return String::new();
    }
    match parse_timestamp(value) {
        Ok(dt) => dt.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn formatear_fecha_hora(value: &str) -> String {
    formatear_fecha_hora_en(value, &Local)
}

/// Whole years between `nacimiento` and `hoy`.
pub fn edad_en(nacimiento: NaiveDate, hoy: NaiveDate) -> Option<u32> {
    let mut years = hoy.year() - nacimiento.year();
    if (hoy.month(), hoy.day()) < (nacimiento.month(), nacimiento.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Age today from a stored birth date.
pub fn edad(fecha_nacimiento: &str) -> Option<u32> {
    let nacimiento = parse_timestamp(fecha_nacimiento).ok()?.date_naive();
    edad_en(nacimiento, Local::now().date_naive())
}

/// `(XXX) XXX-XXXX` for ten-digit numbers, otherwise unchanged.
pub fn formatear_telefono(telefono: &str) -> String {
    let digits: String = telefono.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        telefono.to_string()
    }
}

/// `XX-XXXXX-X` for eight-digit DNIs, otherwise unchanged.
pub fn formatear_dni(dni: &str) -> String {
    let digits: String = dni.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        format!("{}-{}-{}", &digits[..2], &digits[2..7], &digits[7..])
    } else {
        dni.to_string()
    }
}

pub fn capitalizar(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
