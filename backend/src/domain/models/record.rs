//! Calendar records and their ingestion from remote slot payloads.
//!
//! A [`Record`] is a slot that is known to have a valid id, calendar date and
//! time of day. Remote payloads are converted with [`Record::try_from`]; any
//! payload that cannot be converted produces a [`MalformedRecordError`] naming
//! the offending record and field, and never reaches the calendar builder.

use chrono::{NaiveDate, NaiveTime, Timelike};
use log::warn;
use shared::Turno;
use std::fmt;

/// A booking/slot instance that can be plotted on the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue: String,
    pub level: String,
    pub weekday_label: String,
    pub available_seats: u32,
    pub occupied_by: Vec<String>,
}

impl Record {
    /// Sort key used inside a calendar cell
    pub fn time_key(&self) -> (u32, u32) {
        (self.time.hour(), self.time.minute())
    }

    /// "HH:MM"
    pub fn formatted_time(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    pub fn is_occupied_by(&self, user_id: &str) -> bool {
        self.occupied_by.iter().any(|id| id == user_id)
    }
}

/// The record field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Id,
    Date,
    Time,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordField::Id => f.write_str("id"),
            RecordField::Date => f.write_str("date"),
            RecordField::Time => f.write_str("time"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("record '{record_id}' has a malformed {field} ({value:?}): {reason}")]
pub struct MalformedRecordError {
    pub record_id: String,
    pub field: RecordField,
    pub value: String,
    pub reason: &'static str,
}

impl MalformedRecordError {
    fn new(turno: &Turno, field: RecordField, value: &str, reason: &'static str) -> Self {
        Self {
            record_id: turno.id.clone(),
            field,
            value: value.to_string(),
            reason,
        }
    }
}

impl TryFrom<&Turno> for Record {
    type Error = MalformedRecordError;

    fn try_from(turno: &Turno) -> Result<Self, Self::Error> {
        if turno.id.trim().is_empty() {
            return Err(MalformedRecordError::new(turno, RecordField::Id, &turno.id, "id is empty"));
        }

        let raw_date = turno.fecha.as_deref().unwrap_or_default();
        if raw_date.trim().is_empty() {
            return Err(MalformedRecordError::new(turno, RecordField::Date, raw_date, "date is missing"));
        }
        let date = parse_calendar_date(raw_date).ok_or_else(|| {
            MalformedRecordError::new(turno, RecordField::Date, raw_date, "expected YYYY-MM-DD")
        })?;

        let time = parse_time_of_day(&turno.hora).ok_or_else(|| {
            MalformedRecordError::new(turno, RecordField::Time, &turno.hora, "expected HH:MM within 00:00-23:59")
        })?;

        Ok(Record {
            id: turno.id.clone(),
            date,
            time,
            venue: turno.sede.clone(),
            level: turno.nivel.clone(),
            weekday_label: turno.dia.clone(),
            available_seats: turno.cupos_disponibles,
            occupied_by: turno.ocupado_por.clone(),
        })
    }
}

/// Records accepted from a batch of remote slots, plus the ones that were not
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub rejected: Vec<MalformedRecordError>,
}

/// Validate every slot independently; one bad slot never spoils the batch.
pub fn ingest_turnos(turnos: &[Turno]) -> RecordBatch {
    let mut batch = RecordBatch::default();
    for turno in turnos {
        match Record::try_from(turno) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!("Skipping slot: {}", e);
                batch.rejected.push(e);
            }
        }
    }
    batch
}

/// Calendar day of an ISO 8601 date or date-time.
///
/// Only the literal `YYYY-MM-DD` prefix is used, so "2024-02-15T00:00:00.000Z"
/// is the 15th regardless of the local offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10)?;
    match raw.as_bytes().get(10) {
        None | Some(b'T') | Some(b' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse "H:MM" / "HH:MM" into a time of day with zero seconds
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let (hour, minute) = raw.trim().split_once(':')?;
    let is_number = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(hour) || minute.len() != 2 || !is_number(minute) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
pub(crate) fn test_record(id: &str, date: &str, time: &str) -> Record {
    Record {
        id: id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: parse_time_of_day(time).unwrap(),
        venue: "Palermo".to_string(),
        level: "Azul".to_string(),
        weekday_label: String::new(),
        available_seats: 10,
        occupied_by: Vec::new(),
    }
}
