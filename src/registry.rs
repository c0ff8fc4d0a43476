use crate::booking::Booking;
use crate::classroom::{BookingError, Classroom};
use crate::time_slot::TimeSlot;
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub type SharedClassroom = Arc<Mutex<Classroom>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub name: String,
    pub subject: String,
    pub booking_count: usize,
}

/// Thread-safe set of rooms keyed by name.
///
/// Each room sits behind its own mutex, so check-and-insert on one room never
/// blocks work on another. Cloning the registry shares the same rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<BTreeMap<String, SharedClassroom>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(
        &self,
        name: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<SharedClassroom, BookingError> {
        let name = name.into();
        let mut rooms = self.rooms.write();
        if rooms.contains_key(&name) {
            return Err(BookingError::DuplicateRoom(name));
        }
        let room = Arc::new(Mutex::new(Classroom::new(name.clone(), subject)));
        rooms.insert(name.clone(), room.clone());
        info!(room = %name, "room registered");
        Ok(room)
    }

    pub fn room(&self, name: &str) -> Result<SharedClassroom, BookingError> {
        self.rooms
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| BookingError::UnknownRoom(name.to_string()))
    }

    pub fn room_names(&self) -> Vec<String> {
        self.rooms.read().keys().cloned().collect()
    }

    pub fn summaries(&self) -> Vec<RoomSummary> {
        self.snapshot()
            .into_iter()
            .map(|(_, room)| {
                let guard = room.lock();
                RoomSummary {
                    name: guard.name().to_string(),
                    subject: guard.subject().to_string(),
                    booking_count: guard.len(),
                }
            })
            .collect()
    }

    /// Runs `f` against a room while holding its lock.
    pub fn with_room<F, R>(&self, name: &str, f: F) -> Result<R, BookingError>
    where
        F: FnOnce(&Classroom) -> R,
    {
        let room = self.room(name)?;
        let guard = room.lock();
        Ok(f(&guard))
    }

    pub fn is_available(
        &self,
        name: &str,
        date: NaiveDate,
        slot: &TimeSlot,
    ) -> Result<bool, BookingError> {
        self.with_room(name, |room| room.is_available(date, slot))
    }

    /// Check and insert under a single lock acquisition for the room.
    pub fn reserve(&self, name: &str, booking: Booking) -> Result<(), BookingError> {
        let room = self.room(name)?;
        let mut guard = room.lock();
        guard.reserve(booking)
    }

    /// Appends without checking availability. See [`Classroom::add_booking`].
    pub fn add_booking_unchecked(&self, name: &str, booking: Booking) -> Result<(), BookingError> {
        let room = self.room(name)?;
        room.lock().add_booking(booking);
        Ok(())
    }

    pub fn sorted_bookings(&self, name: &str) -> Result<Vec<Booking>, BookingError> {
        self.with_room(name, Classroom::sorted_bookings)
    }

    /// Names of every room free for `(date, slot)`, in name order.
    pub fn available_rooms(&self, date: NaiveDate, slot: &TimeSlot) -> Vec<String> {
        self.snapshot()
            .into_par_iter()
            .filter(|(_, room)| room.lock().is_available(date, slot))
            .map(|(name, _)| name)
            .collect()
    }

    fn snapshot(&self) -> Vec<(String, SharedClassroom)> {
        self.rooms
            .read()
            .iter()
            .map(|(name, room)| (name.clone(), room.clone()))
            .collect()
    }
}
