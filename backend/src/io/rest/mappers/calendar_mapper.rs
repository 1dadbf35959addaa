use shared::{CalendarCell as CellDto, CalendarEntry, CalendarGridResponse, RejectedRecord};

use crate::domain::calendar::{CalendarCell, CalendarGrid};
use crate::domain::models::{MalformedRecordError, Record};

/// Mapper from calendar domain models to the DTOs served to the UI.
pub struct CalendarMapper;

impl CalendarMapper {
    pub fn to_entry_dto(record: &Record) -> CalendarEntry {
        CalendarEntry {
            id: record.id.clone(),
            time: record.formatted_time(),
            venue: record.venue.clone(),
            level: record.level.clone(),
            weekday_label: record.weekday_label.clone(),
            available_seats: record.available_seats,
            occupied_seats: record.occupied_by.len() as u32,
        }
    }

    pub fn to_cell_dto(cell: &CalendarCell) -> CellDto {
        CellDto {
            date: cell.date,
            in_target_month: cell.in_target_month,
            is_today: cell.is_today,
            entries: cell.entries.iter().map(Self::to_entry_dto).collect(),
        }
    }

    pub fn to_rejected_dto(error: &MalformedRecordError) -> RejectedRecord {
        RejectedRecord {
            record_id: error.record_id.clone(),
            field: error.field.to_string(),
            reason: format!("{} ({:?})", error.reason, error.value),
        }
    }

    /// Grid plus the records that could not be placed on it
    pub fn to_grid_dto(grid: &CalendarGrid, title: String, rejected: &[MalformedRecordError]) -> CalendarGridResponse {
        CalendarGridResponse {
            year: grid.year,
            month: grid.month,
            title,
            week_start: grid.week_start,
            cells: grid.cells.iter().map(Self::to_cell_dto).collect(),
            rejected: rejected.iter().map(Self::to_rejected_dto).collect(),
        }
    }
}
