use chrono::NaiveDate;
use classroom_booking::{
    Booking, BookingError, RoomRegistry, ServiceConfig, Teacher, TimeSlot,
    export_schedule_to_csv, render_schedule, render_schedule_table,
};
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    println!(
        "Commands:\n  help                                              Show this help\n  room  <name> <subject...>                         Register a room\n  rooms                                             List rooms\n  check <room> <YYYY-MM-DD> <day> <HH:MM> <HH:MM>   Check availability\n  book  <room> <YYYY-MM-DD> <day> <HH:MM> <HH:MM> <teacher...>\n                                                    Book if the slot is free\n  force <room> <YYYY-MM-DD> <day> <HH:MM> <HH:MM> <teacher...>\n                                                    Insert without checking\n  free  <YYYY-MM-DD> <day> <HH:MM> <HH:MM>          List rooms free for a slot\n  show  <room>                                      Show a room's schedule\n  table <room>                                      Show a room's schedule as a table\n  export <room> <path>                              Write a room's schedule to CSV\n  quit|exit                                         Exit"
    );
}

/// Parses `<YYYY-MM-DD> <day> <HH:MM> <HH:MM>` from the front of `args`.
fn parse_date_and_slot<'a>(
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<(NaiveDate, TimeSlot), String> {
    let (Some(date_s), Some(day), Some(start), Some(end)) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        return Err("expected <YYYY-MM-DD> <day> <HH:MM> <HH:MM>".into());
    };
    let date = NaiveDate::parse_from_str(date_s, "%Y-%m-%d")
        .map_err(|_| "Invalid date (YYYY-MM-DD)".to_string())?;
    let slot = TimeSlot::parse(day, start, end).map_err(|e| e.to_string())?;
    Ok((date, slot))
}

fn parse_booking<'a>(
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<(String, Booking), String> {
    let room = args.next().ok_or("missing room")?.to_string();
    let (date, slot) = parse_date_and_slot(args)?;
    let teacher = args.collect::<Vec<_>>().join(" ");
    if teacher.is_empty() {
        return Err("missing teacher name".into());
    }
    Ok((room, Booking::new(date, slot, Teacher::new(teacher))))
}

fn initial_registry() -> RoomRegistry {
    match ServiceConfig::from_env().and_then(|config| config.build_registry()) {
        Ok(registry) => registry,
        Err(e) => {
            println!("Ignoring room configuration: {e}");
            RoomRegistry::new()
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = initial_registry();

    println!("Classroom Booking (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "room" => {
                let Some(name) = parts.next() else {
                    println!("Usage: room <name> <subject...>");
                    continue;
                };
                let subject = parts.collect::<Vec<_>>().join(" ");
                match registry.add_room(name, subject) {
                    Ok(_) => println!("Room {name} registered."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "rooms" => {
                let rooms = registry.summaries();
                if rooms.is_empty() {
                    println!("No rooms registered.");
                }
                for room in rooms {
                    println!(
                        "{:<12} {:<24} {} booking(s)",
                        room.name, room.subject, room.booking_count
                    );
                }
            }
            "check" => {
                let Some(room) = parts.next() else {
                    println!("Usage: check <room> <YYYY-MM-DD> <day> <HH:MM> <HH:MM>");
                    continue;
                };
                match parse_date_and_slot(&mut parts) {
                    Ok((date, slot)) => match registry.is_available(room, date, &slot) {
                        Ok(true) => println!("Room {room} is available on {date} ({slot})."),
                        Ok(false) => println!("Room {room} is NOT available on {date} ({slot})."),
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("Usage: check <room> ...: {e}"),
                }
            }
            "book" | "force" => match parse_booking(&mut parts) {
                Ok((room, booking)) => {
                    let summary = booking.to_string();
                    let res = if cmd == "book" {
                        registry.reserve(&room, booking)
                    } else {
                        registry.add_booking_unchecked(&room, booking)
                    };
                    match res {
                        Ok(()) => println!("Booked room {room}: {summary}"),
                        Err(e @ BookingError::Conflict { .. }) => {
                            println!("Booking rejected: {e}")
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                Err(e) => println!(
                    "Usage: {cmd} <room> <YYYY-MM-DD> <day> <HH:MM> <HH:MM> <teacher...>: {e}"
                ),
            },
            "free" => match parse_date_and_slot(&mut parts) {
                Ok((date, slot)) => {
                    let rooms = registry.available_rooms(date, &slot);
                    if rooms.is_empty() {
                        println!("No rooms free on {date} ({slot}).");
                    } else {
                        println!("Free on {date} ({slot}): {}", rooms.join(", "));
                    }
                }
                Err(e) => println!("Usage: free <YYYY-MM-DD> <day> <HH:MM> <HH:MM>: {e}"),
            },
            "show" | "table" => {
                let Some(room) = parts.next() else {
                    println!("Usage: {cmd} <room>");
                    continue;
                };
                let rendered = registry.with_room(room, |classroom| {
                    if cmd == "show" {
                        render_schedule(classroom)
                    } else {
                        render_schedule_table(classroom)
                    }
                });
                match rendered {
                    Ok(text) => print!("{text}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "export" => {
                let (Some(room), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: export <room> <path>");
                    continue;
                };
                let exported =
                    registry.with_room(room, |classroom| export_schedule_to_csv(classroom, path));
                match exported {
                    Ok(Ok(())) => println!("Exported schedule for room {room} to {path}"),
                    Ok(Err(e)) => println!("Failed to export schedule: {e}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
