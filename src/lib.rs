pub mod booking;
pub mod classroom;
pub mod config;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod registry;
pub mod time_slot;

pub use booking::{Booking, Teacher};
pub use classroom::{BookingError, Classroom};
pub use config::{ConfigError, RoomConfig, ServiceConfig};
pub use export::{
    ExportError, ExportResult, ScheduleRow, export_schedule_to_csv, render_schedule,
    render_schedule_table, schedule_frame, schedule_rows, write_schedule_csv,
};
pub use registry::{RoomRegistry, RoomSummary, SharedClassroom};
pub use time_slot::{TimeSlot, TimeSlotError};
