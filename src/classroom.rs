use crate::booking::Booking;
use crate::time_slot::{TimeSlot, TimeSlotError};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error(
        "room {room} is already booked on {} ({}) by {}",
        .existing.date,
        .existing.time_slot,
        .existing.teacher.name
    )]
    Conflict { room: String, existing: Box<Booking> },
    #[error("room {0} not found")]
    UnknownRoom(String),
    #[error("room {0} already exists")]
    DuplicateRoom(String),
    #[error(transparent)]
    InvalidSlot(#[from] TimeSlotError),
}

/// One room and the bookings it holds, in insertion order.
///
/// The collection is conflict-free as long as every insertion goes through
/// [`Classroom::reserve`]. [`Classroom::add_booking`] appends without checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classroom {
    name: String,
    subject: String,
    bookings: Vec<Booking>,
}

impl Classroom {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            bookings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Bookings in the order they were inserted.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// First held booking on the same date whose slot overlaps `slot`.
    pub fn conflicts_with(&self, date: NaiveDate, slot: &TimeSlot) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|existing| existing.conflicts_with(date, slot))
    }

    pub fn is_available(&self, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.conflicts_with(date, slot).is_none()
    }

    /// Appends `booking` without an availability check.
    ///
    /// Callers that skip [`Classroom::is_available`] can break the
    /// no-overlap invariant; prefer [`Classroom::reserve`].
    pub fn add_booking(&mut self, booking: Booking) {
        if !self.is_available(booking.date, &booking.time_slot) {
            warn!(
                room = %self.name,
                date = %booking.date,
                slot = %booking.time_slot,
                "unchecked insert overlaps an existing booking"
            );
        }
        debug!(room = %self.name, booking = %booking, "booking added");
        self.bookings.push(booking);
    }

    /// Inserts `booking` only if it does not overlap anything already held.
    pub fn reserve(&mut self, booking: Booking) -> Result<(), BookingError> {
        if let Some(existing) = self.conflicts_with(booking.date, &booking.time_slot) {
            info!(
                room = %self.name,
                date = %booking.date,
                slot = %booking.time_slot,
                "reservation rejected"
            );
            return Err(BookingError::Conflict {
                room: self.name.clone(),
                existing: Box::new(existing.clone()),
            });
        }
        info!(room = %self.name, booking = %booking, "reservation accepted");
        self.bookings.push(booking);
        Ok(())
    }

    /// Bookings ordered by ascending date. Bookings on the same date keep
    /// their insertion order.
    pub fn sorted_bookings(&self) -> Vec<Booking> {
        let mut sorted = self.bookings.clone();
        sorted.sort_by_key(|booking| booking.date);
        sorted
    }
}
