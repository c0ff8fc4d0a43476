use chrono::{NaiveDate, NaiveTime, Weekday};
use classroom_booking::{Booking, BookingError, RoomRegistry, Teacher, TimeSlot};
use std::sync::{Arc, Barrier};
use std::thread;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot(start: u32, end: u32) -> TimeSlot {
    TimeSlot::new(
        Weekday::Tue,
        NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
    )
    .unwrap()
}

#[test]
fn duplicate_and_unknown_rooms_are_reported() {
    let registry = RoomRegistry::new();
    registry.add_room("A101", "Physics").unwrap();
    assert!(matches!(
        registry.add_room("A101", "Chemistry"),
        Err(BookingError::DuplicateRoom(name)) if name == "A101"
    ));
    assert!(matches!(
        registry.is_available("Z9", d(2024, 3, 5), &slot(9, 10)),
        Err(BookingError::UnknownRoom(name)) if name == "Z9"
    ));
}

#[test]
fn concurrent_reservations_of_one_slot_accept_exactly_one() {
    let registry = RoomRegistry::new();
    registry.add_room("A101", "Physics").unwrap();

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let booking = Booking::new(
                    d(2024, 3, 5),
                    slot(9, 10),
                    Teacher::new(format!("teacher-{i}")),
                );
                registry.reserve("A101", booking).is_ok()
            })
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(registry.sorted_bookings("A101").unwrap().len(), 1);
}

#[test]
fn rooms_are_independent() {
    let registry = RoomRegistry::new();
    registry.add_room("A101", "Physics").unwrap();
    registry.add_room("B202", "History").unwrap();

    let booking = Booking::new(d(2024, 3, 5), slot(9, 10), Teacher::new("Smith"));
    registry.reserve("A101", booking.clone()).unwrap();
    registry.reserve("B202", booking).unwrap();

    let summaries = registry.summaries();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.booking_count == 1));
}

#[test]
fn available_rooms_lists_only_free_rooms() {
    let registry = RoomRegistry::new();
    for name in ["A101", "B202", "C303"] {
        registry.add_room(name, "").unwrap();
    }
    registry
        .reserve(
            "B202",
            Booking::new(d(2024, 3, 5), slot(9, 11), Teacher::new("Jones")),
        )
        .unwrap();

    assert_eq!(
        registry.available_rooms(d(2024, 3, 5), &slot(10, 12)),
        vec!["A101", "C303"]
    );
    assert_eq!(
        registry.available_rooms(d(2024, 3, 5), &slot(11, 12)),
        vec!["A101", "B202", "C303"]
    );
}

#[test]
fn unchecked_insert_bypasses_conflict_check() {
    let registry = RoomRegistry::new();
    registry.add_room("A101", "").unwrap();
    let booking = Booking::new(d(2024, 3, 5), slot(9, 10), Teacher::new("Smith"));
    registry.reserve("A101", booking.clone()).unwrap();
    assert!(registry.reserve("A101", booking.clone()).is_err());
    registry.add_booking_unchecked("A101", booking).unwrap();
    assert_eq!(registry.sorted_bookings("A101").unwrap().len(), 2);
}
