//! Calendar domain logic for the booking UI.
//!
//! Every calendar surface (all slots, the logged-in user's slots) renders the
//! same month grid: complete weeks covering the target month, one cell per
//! day, each cell holding the records dated on that day sorted by time of day.
//! The grid is a pure function of the target month, the week-start convention,
//! the records and the injected "today"; nothing is cached between calls.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use log::debug;
use shared::{CurrentDateResponse, WeekStart};
use std::collections::HashMap;

use crate::domain::error::ServiceError;
use crate::domain::models::Record;

/// A single day of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_target_month: bool,
    pub is_today: bool,
    /// Sorted by (hour, minute), ties in input order
    pub entries: Vec<Record>,
}

/// A month grid made of complete weeks
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub week_start: WeekStart,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Rows of seven cells
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.cells.first().map(|cell| cell.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.cells.last().map(|cell| cell.date)
    }
}

fn first_weekday(week_start: WeekStart) -> Weekday {
    match week_start {
        WeekStart::Monday => Weekday::Mon,
        WeekStart::Sunday => Weekday::Sun,
    }
}

/// Position of `date` inside its week, 0 being the configured first weekday
fn days_into_week(date: NaiveDate, week_start: WeekStart) -> u64 {
    let offset = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    u64::from(offset)
}

fn out_of_range(target_month: NaiveDate) -> ServiceError {
    ServiceError::Validation(format!(
        "Month {}/{} is outside the supported calendar range",
        target_month.month(),
        target_month.year()
    ))
}

/// First and last day of the month containing `target_month`
pub fn month_bounds(target_month: NaiveDate) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let month_start = target_month.with_day(1).ok_or_else(|| out_of_range(target_month))?;
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .ok_or_else(|| out_of_range(target_month))?;
    Ok((month_start, month_end))
}

/// First and last displayed date for the month containing `target_month`
pub fn grid_bounds(
    target_month: NaiveDate,
    week_start: WeekStart,
) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let (month_start, month_end) = month_bounds(target_month)?;
    let grid_start = month_start
        .checked_sub_days(Days::new(days_into_week(month_start, week_start)))
        .ok_or_else(|| out_of_range(target_month))?;
    let grid_end = month_end
        .checked_add_days(Days::new(6 - days_into_week(month_end, week_start)))
        .ok_or_else(|| out_of_range(target_month))?;
    debug_assert_eq!(grid_start.weekday(), first_weekday(week_start));
    Ok((grid_start, grid_end))
}

/// Build the month grid.
///
/// Only the year and month of `target_month` are significant. Records dated
/// outside the displayed weeks are dropped; the input slice is left untouched.
/// Fails only for months whose padding weeks fall outside chrono's date range.
pub fn build_calendar_grid(
    target_month: NaiveDate,
    week_start: WeekStart,
    records: &[Record],
    reference_today: NaiveDate,
) -> Result<Vec<CalendarCell>, ServiceError> {
    let (month_start, month_end) = month_bounds(target_month)?;
    let (grid_start, grid_end) = grid_bounds(target_month, week_start)?;

    let mut by_date: HashMap<NaiveDate, Vec<Record>> = HashMap::new();
    for record in records {
        if record.date < grid_start || record.date > grid_end {
            continue;
        }
        by_date.entry(record.date).or_default().push(record.clone());
    }

    let cells = grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .map(|date| {
            let mut entries = by_date.remove(&date).unwrap_or_default();
            // sort_by_key is stable: equal times keep their input order
            entries.sort_by_key(Record::time_key);
            CalendarCell {
                date,
                in_target_month: month_start <= date && date <= month_end,
                is_today: date == reference_today,
                entries,
            }
        })
        .collect();
    Ok(cells)
}

/// Calendar service holding the configured week-start convention
#[derive(Debug, Clone)]
pub struct CalendarService {
    week_start: WeekStart,
}

impl CalendarService {
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    /// Resolve a (year, month) pair to the first day of that month
    pub fn target_month(&self, year: i32, month: u32) -> Result<NaiveDate, ServiceError> {
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ServiceError::Validation(format!(
                "Invalid month: {}/{}. Month must be between 1 and 12",
                month, year
            ))
        })
    }

    /// Generate the grid for a month with the configured week start
    pub fn generate_calendar_grid(
        &self,
        year: i32,
        month: u32,
        records: &[Record],
        reference_today: NaiveDate,
    ) -> Result<CalendarGrid, ServiceError> {
        let target_month = self.target_month(year, month)?;
        let cells = build_calendar_grid(target_month, self.week_start, records, reference_today)?;

        debug!(
            "Generated calendar {}/{}: {} cells, {} records placed",
            month,
            year,
            cells.len(),
            cells.iter().map(|c| c.entries.len()).sum::<usize>()
        );

        Ok(CalendarGrid {
            year,
            month,
            week_start: self.week_start,
            cells,
        })
    }

    /// Spanish month name, as shown in the grid header
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "enero",
            2 => "febrero",
            3 => "marzo",
            4 => "abril",
            5 => "mayo",
            6 => "junio",
            7 => "julio",
            8 => "agosto",
            9 => "septiembre",
            10 => "octubre",
            11 => "noviembre",
            12 => "diciembre",
            _ => "mes inválido",
        }
    }

    /// Grid header, e.g. "febrero 2024"
    pub fn title(&self, year: i32, month: u32) -> String {
        format!("{} {}", self.month_name(month), year)
    }

    /// Month before a valid (month, year), rolling over the year
    pub fn previous_month(&self, month: u32, year: i32) -> Result<(u32, i32), ServiceError> {
        self.target_month(year, month)?;
        if month == 1 {
            let year = year.checked_sub(1).ok_or_else(|| no_adjacent_month(month, year))?;
            Ok((12, year))
        } else {
            Ok((month - 1, year))
        }
    }

    /// Month after a valid (month, year), rolling over the year
    pub fn next_month(&self, month: u32, year: i32) -> Result<(u32, i32), ServiceError> {
        self.target_month(year, month)?;
        if month == 12 {
            let year = year.checked_add(1).ok_or_else(|| no_adjacent_month(month, year))?;
            Ok((1, year))
        } else {
            Ok((month + 1, year))
        }
    }

    pub fn current_date(&self, today: NaiveDate) -> CurrentDateResponse {
        CurrentDateResponse {
            year: today.year(),
            month: today.month(),
            day: today.day(),
            iso_date: today.format("%Y-%m-%d").to_string(),
        }
    }
}

fn no_adjacent_month(month: u32, year: i32) -> ServiceError {
    ServiceError::Validation(format!("No month to navigate to from {}/{}", month, year))
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new(WeekStart::default())
    }
}
