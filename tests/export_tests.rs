use chrono::{NaiveDate, NaiveTime, Weekday};
use classroom_booking::{
    Booking, Classroom, ExportError, Teacher, TimeSlot, export_schedule_to_csv, render_schedule,
    render_schedule_table, schedule_frame, write_schedule_csv,
};
use polars::prelude::DataType;
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot(day: Weekday, start: u32, end: u32) -> TimeSlot {
    TimeSlot::new(
        day,
        NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
    )
    .unwrap()
}

fn sample_room() -> Classroom {
    let mut room = Classroom::new("A101", "Mathematics");
    room.reserve(Booking::new(
        d(2024, 3, 8),
        slot(Weekday::Fri, 13, 14),
        Teacher::new("Jones"),
    ))
    .unwrap();
    room.reserve(Booking::new(
        d(2024, 3, 1),
        slot(Weekday::Mon, 9, 10),
        Teacher::new("Smith"),
    ))
    .unwrap();
    room
}

#[test]
fn csv_export_writes_header_and_sorted_rows() {
    let room = sample_room();
    let file = NamedTempFile::new().unwrap();

    export_schedule_to_csv(&room, file.path()).unwrap();

    let contents = fs::read_to_string(file.path()).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(
        lines,
        [
            "Date,Day of Week,Start Time,End Time,Booked By",
            "2024-03-01,Mon,09:00,10:00,Smith",
            "2024-03-08,Fri,13:00,14:00,Jones",
        ]
    );
}

#[test]
fn csv_export_of_empty_room_still_has_header() {
    let room = Classroom::new("B202", "History");
    let mut buffer = Vec::new();
    write_schedule_csv(&room, &mut buffer).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap().trim_end(),
        "Date,Day of Week,Start Time,End Time,Booked By"
    );
}

#[test]
fn export_to_unwritable_path_is_an_io_error_and_keeps_state() {
    let room = sample_room();
    let before = room.clone();
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("schedule.csv");

    let err = export_schedule_to_csv(&room, &missing).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
    assert_eq!(room, before);
}

#[test]
fn console_rendering_lists_bookings_in_date_order() {
    let text = render_schedule(&sample_room());
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "--- Schedule for room A101 ---");
    assert_eq!(lines[1], "2024-03-01, Mon, 09:00-10:00, Smith");
    assert_eq!(lines[2], "2024-03-08, Fri, 13:00-14:00, Jones");
    assert!(lines[3].chars().all(|c| c == '-'));
}

#[test]
fn console_rendering_marks_empty_schedule() {
    let text = render_schedule(&Classroom::new("B202", "History"));
    assert!(text.contains("No bookings"));
}

#[test]
fn table_rendering_sizes_columns_to_content() {
    let mut room = sample_room();
    room.reserve(Booking::new(
        d(2024, 3, 9),
        slot(Weekday::Sat, 8, 9),
        Teacher::new("Professor Longname"),
    ))
    .unwrap();

    let table = render_schedule_table(&room);
    let lines: Vec<_> = table.lines().collect();
    assert!(lines[1].contains("| Booked By          |"));
    assert!(lines[3].contains("| Smith              |"));
    assert!(lines[5].contains("| Professor Longname |"));
    let width = lines[0].len();
    assert!(lines.iter().all(|l| l.len() == width));
}

#[test]
fn schedule_frame_matches_sorted_rows() {
    let frame = schedule_frame(&sample_room()).unwrap();
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.get_column_names().len(), 5);
    assert_eq!(frame.column("Date").unwrap().dtype(), &DataType::Date);
    let teachers = frame.column("Booked By").unwrap().str().unwrap();
    assert_eq!(teachers.get(0), Some("Smith"));
    assert_eq!(teachers.get(1), Some("Jones"));
}
