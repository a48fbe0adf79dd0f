use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::UtmCoordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Altitude {
    Meters(f64),
    /// The altitude tag was absent or could not be read.
    Unknown,
}

impl Display for Altitude {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Meters(value) => write!(f, "{value}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// One decoded photo. A record without `lat` is a placeholder for an image
/// that carries no GPS data and must never be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub filename: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude: Option<Altitude>,
    pub timestamp: Option<String>,
    pub direction: Option<f64>,
    pub direction_type: Option<String>,
    pub orientation: Option<u32>,
    pub utm: Option<UtmCoordinate>,
}

impl PhotoRecord {
    pub fn placeholder(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            lat: None,
            lon: None,
            altitude: None,
            timestamp: None,
            direction: None,
            direction_type: None,
            orientation: None,
            utm: None,
        }
    }

    pub fn is_geotagged(&self) -> bool {
        self.lat.is_some() && self.lon.is_some() && self.utm.is_some()
    }

    pub fn utm_zone(&self) -> Option<String> {
        self.utm.as_ref().map(UtmCoordinate::label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub scanned_files: usize,
    pub candidate_images: usize,
    pub written_rows: usize,
    pub skipped_without_gps: usize,
    pub skipped_unprojectable: usize,
    pub output_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_no_geo_fields() {
        let record = PhotoRecord::placeholder("a.jpg");
        assert_eq!(record.filename, "a.jpg");
        assert!(!record.is_geotagged());
        assert_eq!(record.altitude, None);
        assert_eq!(record.utm_zone(), None);
    }

    #[test]
    fn unknown_altitude_displays_sentinel() {
        assert_eq!(Altitude::Unknown.to_string(), "unknown");
        assert_eq!(Altitude::Meters(-12.5).to_string(), "-12.5");
    }
}
