use std::fmt::{Display, Formatter};

use crate::DomainError;

/// MGRS latitude bands, 8° each from 80°S; X is stretched to 84°N.
const BANDS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtmZone(u8);

impl UtmZone {
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if !(1..=60).contains(&value) {
            return Err(DomainError::InvalidZone(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian(self) -> f64 {
        f64::from(self.0) * 6.0 - 183.0
    }
}

impl Display for UtmZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatitudeBand(char);

impl LatitudeBand {
    pub fn new(letter: char) -> Result<Self, DomainError> {
        let upper = letter.to_ascii_uppercase();
        if !upper.is_ascii() || !BANDS.contains(&(upper as u8)) {
            return Err(DomainError::InvalidBand(letter));
        }
        Ok(Self(upper))
    }

    pub fn letter(self) -> char {
        self.0
    }

    /// Bands C through M lie south of the equator.
    pub fn is_southern(self) -> bool {
        self.0 < 'N'
    }
}

impl Display for LatitudeBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_coordinate(lon: f64, lat: f64) -> Result<(), DomainError> {
    let lon_ok = lon.is_finite() && (-180.0..180.0).contains(&lon);
    let lat_ok = lat.is_finite() && (MIN_LATITUDE..MAX_LATITUDE).contains(&lat);
    if lon_ok && lat_ok {
        Ok(())
    } else {
        Err(DomainError::InvalidCoordinate { lon, lat })
    }
}

/// Zone number for a point, honouring the Norway and Svalbard exceptions.
pub fn resolve_zone(lon: f64, lat: f64) -> Result<UtmZone, DomainError> {
    check_coordinate(lon, lat)?;

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return UtmZone::new(32);
    }

    if (72.0..84.0).contains(&lat) && (0.0..42.0).contains(&lon) {
        let zone = if lon < 9.0 {
            31
        } else if lon < 21.0 {
            33
        } else if lon < 33.0 {
            35
        } else {
            37
        };
        return UtmZone::new(zone);
    }

    let index = ((lon + 180.0) / 6.0).floor() as u8;
    UtmZone::new(index + 1)
}

pub fn resolve_band(lat: f64) -> Result<LatitudeBand, DomainError> {
    if !lat.is_finite() || !(MIN_LATITUDE..MAX_LATITUDE).contains(&lat) {
        return Err(DomainError::InvalidLatitude(lat));
    }
    let index = (((lat - MIN_LATITUDE) / 8.0).floor() as usize).min(BANDS.len() - 1);
    Ok(LatitudeBand(char::from(BANDS[index])))
}

/// Parses labels such as `32V` or `56h` into a zone and band.
pub fn parse_zone_label(label: &str) -> Result<(UtmZone, LatitudeBand), DomainError> {
    let trimmed = label.trim();
    let invalid = || DomainError::InvalidZoneLabel(label.to_string());

    let mut chars = trimmed.chars();
    let letter = chars.next_back().ok_or_else(invalid)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let number = digits.parse::<u8>().map_err(|_| invalid())?;

    Ok((UtmZone::new(number)?, LatitudeBand::new(letter)?))
}
