use crate::classroom::BookingError;
use crate::registry::RoomRegistry;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

pub const HTTP_ADDR_ENV: &str = "CLASSROOM_BOOKING_HTTP_ADDR";
pub const ROOMS_FILE_ENV: &str = "CLASSROOM_BOOKING_ROOMS";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid rooms file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid http address '{0}'")]
    InvalidAddr(String),
    #[error(transparent)]
    Rooms(#[from] BookingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub http_addr: SocketAddr,
    pub rooms: Vec<RoomConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            rooms: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Reads `CLASSROOM_BOOKING_HTTP_ADDR` and, when set, the JSON rooms file
    /// named by `CLASSROOM_BOOKING_ROOMS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = std::env::var(HTTP_ADDR_ENV).unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());
        let rooms = match std::env::var(ROOMS_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => load_rooms(path.trim())?,
            _ => Vec::new(),
        };
        Self::from_parts(&addr, rooms)
    }

    pub fn from_parts(addr: &str, rooms: Vec<RoomConfig>) -> Result<Self, ConfigError> {
        let http_addr = addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(addr.to_string()))?;
        Ok(Self { http_addr, rooms })
    }

    pub fn build_registry(&self) -> Result<RoomRegistry, ConfigError> {
        let registry = RoomRegistry::new();
        for room in &self.rooms {
            registry.add_room(room.name.clone(), room.subject.clone())?;
        }
        Ok(registry)
    }
}

/// Rooms file format: `[{"name": "A101", "subject": "Physics"}, ...]`.
pub fn load_rooms<P: AsRef<Path>>(path: P) -> Result<Vec<RoomConfig>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn rooms_file_seeds_registry() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"A101","subject":"Physics"}},{{"name":"B2"}}]"#
        )
        .unwrap();

        let rooms = load_rooms(file.path()).unwrap();
        let config = ServiceConfig::from_parts("127.0.0.1:8080", rooms).unwrap();
        let registry = config.build_registry().unwrap();

        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(registry.room_names(), vec!["A101", "B2"]);
    }

    #[test]
    fn duplicate_rooms_are_rejected() {
        let rooms = vec![
            RoomConfig {
                name: "A101".into(),
                subject: String::new(),
            },
            RoomConfig {
                name: "A101".into(),
                subject: String::new(),
            },
        ];
        let config = ServiceConfig::from_parts(DEFAULT_HTTP_ADDR, rooms).unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Rooms(BookingError::DuplicateRoom(_)))
        ));
    }

    #[test]
    fn bad_address_is_reported() {
        assert!(matches!(
            ServiceConfig::from_parts("not-an-addr", Vec::new()),
            Err(ConfigError::InvalidAddr(_))
        ));
    }
}
