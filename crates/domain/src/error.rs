use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    InvalidCoordinate { lon: f64, lat: f64 },
    InvalidLatitude(f64),
    InvalidZone(u8),
    InvalidBand(char),
    InvalidZoneLabel(String),
    Projection(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinate { lon, lat } => {
                write!(f, "coordinate lon={lon}, lat={lat} is outside the UTM domain")
            }
            Self::InvalidLatitude(lat) => {
                write!(f, "latitude {lat} is outside the UTM band range [-80, 84)")
            }
            Self::InvalidZone(value) => write!(f, "UTM zone must be in 1..=60, got {value}"),
            Self::InvalidBand(letter) => write!(f, "unknown latitude band letter {letter:?}"),
            Self::InvalidZoneLabel(label) => {
                write!(f, "expected a zone label such as 32V, got {label:?}")
            }
            Self::Projection(reason) => write!(f, "cannot build UTM transform: {reason}"),
        }
    }
}

impl std::error::Error for DomainError {}
