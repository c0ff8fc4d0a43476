//! Read-only views of a room's schedule: console text, CSV and a polars frame.
//!
//! Every view is built from [`Classroom::sorted_bookings`], so they always
//! agree on row order.

use crate::booking::Booking;
use crate::classroom::Classroom;
use crate::time_slot::format_time;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

pub const SCHEDULE_COLUMNS: [&str; 5] = [
    "Date",
    "Day of Week",
    "Start Time",
    "End Time",
    "Booked By",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataframe conversion error: {0}")]
    Frame(#[from] PolarsError),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Day of Week")]
    pub day_of_week: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Booked By")]
    pub booked_by: String,
}

impl From<&Booking> for ScheduleRow {
    fn from(booking: &Booking) -> Self {
        Self {
            date: booking.date.format("%Y-%m-%d").to_string(),
            day_of_week: booking.time_slot.day_of_week().to_string(),
            start_time: format_time(booking.time_slot.start_time()),
            end_time: format_time(booking.time_slot.end_time()),
            booked_by: booking.teacher.name.clone(),
        }
    }
}

impl ScheduleRow {
    fn cells(&self) -> [&str; 5] {
        [
            self.date.as_str(),
            self.day_of_week.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
            self.booked_by.as_str(),
        ]
    }
}

pub fn schedule_rows(classroom: &Classroom) -> Vec<ScheduleRow> {
    classroom
        .sorted_bookings()
        .iter()
        .map(ScheduleRow::from)
        .collect()
}

/// One line per booking, or a `No bookings` marker.
pub fn render_schedule(classroom: &Classroom) -> String {
    let heading = format!("--- Schedule for room {} ---", classroom.name());
    let mut out = String::new();
    out.push_str(&heading);
    out.push('\n');
    let bookings = classroom.sorted_bookings();
    if bookings.is_empty() {
        out.push_str("No bookings\n");
    } else {
        for booking in &bookings {
            out.push_str(&booking.to_string());
            out.push('\n');
        }
    }
    out.push_str(&"-".repeat(heading.len()));
    out.push('\n');
    out
}

/// Text table with one column per schedule field, each sized to its widest cell.
pub fn render_schedule_table(classroom: &Classroom) -> String {
    let rows = schedule_rows(classroom);

    let mut widths: Vec<usize> = SCHEDULE_COLUMNS.iter().map(|name| name.len()).collect();
    for row in &rows {
        for (ci, cell) in row.cells().iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_table_line(&mut out, &SCHEDULE_COLUMNS, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        push_table_line(&mut out, &row.cells(), &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_table_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}

pub fn write_schedule_csv<W: Write>(classroom: &Classroom, writer: W) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let rows = schedule_rows(classroom);
    if rows.is_empty() {
        writer.write_record(SCHEDULE_COLUMNS)?;
    }
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the room's schedule to `path`. Booking state is never touched,
/// whether or not the write succeeds.
pub fn export_schedule_to_csv<P: AsRef<Path>>(classroom: &Classroom, path: P) -> ExportResult<()> {
    let path = path.as_ref();
    let result = File::create(path)
        .map_err(ExportError::from)
        .and_then(|file| write_schedule_csv(classroom, file));
    match &result {
        Ok(()) => info!(
            room = %classroom.name(),
            path = %path.display(),
            rows = classroom.len(),
            "exported schedule"
        ),
        Err(err) => error!(
            room = %classroom.name(),
            path = %path.display(),
            error = %err,
            "failed to export schedule"
        ),
    }
    result
}

/// The sorted schedule as a frame; `Date` is a polars date column.
pub fn schedule_frame(classroom: &Classroom) -> ExportResult<DataFrame> {
    let bookings = classroom.sorted_bookings();

    let dates: Vec<i32> = bookings.iter().map(|b| date_to_i32(b.date)).collect();
    let days: Vec<String> = bookings
        .iter()
        .map(|b| b.time_slot.day_of_week().to_string())
        .collect();
    let starts: Vec<String> = bookings
        .iter()
        .map(|b| format_time(b.time_slot.start_time()))
        .collect();
    let ends: Vec<String> = bookings
        .iter()
        .map(|b| format_time(b.time_slot.end_time()))
        .collect();
    let teachers: Vec<String> = bookings.iter().map(|b| b.teacher.name.clone()).collect();

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("Date"), dates)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("Day of Week"), days).into_column(),
        Series::new(PlSmallStr::from_static("Start Time"), starts).into_column(),
        Series::new(PlSmallStr::from_static("End Time"), ends).into_column(),
        Series::new(PlSmallStr::from_static("Booked By"), teachers).into_column(),
    ];
    Ok(DataFrame::new(columns)?)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::default();
    (date - epoch).num_days() as i32
}
