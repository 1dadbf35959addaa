//! Ordering of slot and member listings.
//!
//! Weekly slots have no calendar date, only a Spanish weekday label, so lists
//! are ordered Lunes..Domingo and then by time of day. Labels are compared
//! without case or accents ("miercoles" and "Miércoles" are the same day).
//! All sorts are stable.

use shared::{Turno, User};

use crate::domain::models::record::{parse_calendar_date, parse_time_of_day};
use chrono::{NaiveDate, Timelike};

const WEEKDAYS: [&str; 7] = ["lunes", "martes", "miercoles", "jueves", "viernes", "sabado", "domingo"];

/// Position of a Spanish weekday label in a Monday-first week
pub fn weekday_index(label: &str) -> Option<usize> {
    let normalized: String = label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect();
    WEEKDAYS.iter().position(|day| *day == normalized)
}

/// (hour, minute); unparseable times sort after every valid one
fn time_key(hora: &str) -> (u32, u32) {
    parse_time_of_day(hora)
        .map(|t| (t.hour(), t.minute()))
        .unwrap_or((u32::MAX, u32::MAX))
}

/// Lunes..Domingo, then time of day. Unknown weekdays go last.
pub fn sort_by_weekday_and_time(mut turnos: Vec<Turno>) -> Vec<Turno> {
    turnos.sort_by_key(|t| (weekday_index(&t.dia).unwrap_or(WEEKDAYS.len()), time_key(&t.hora)));
    turnos
}

/// Calendar date, then time of day. Undated slots go last.
pub fn sort_by_date_and_time(mut turnos: Vec<Turno>) -> Vec<Turno> {
    turnos.sort_by_key(|t| {
        let date = t.fecha.as_deref().and_then(parse_calendar_date).unwrap_or(NaiveDate::MAX);
        (date, time_key(&t.hora))
    });
    turnos
}

/// Full name, ignoring case
pub fn sort_by_full_name(users: &mut [User]) {
    users.sort_by_cached_key(|u| u.full_name().to_lowercase());
}
