use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Altitude, DomainError, PhotoRecord, Projector};

const EXIF_TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const RECORD_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Altitude reference value meaning "below sea level".
const BELOW_SEA_LEVEL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn to_f64(self) -> Option<f64> {
        if self.denominator == 0 {
            return None;
        }
        Some(self.numerator as f64 / self.denominator as f64)
    }
}

/// Raw GPS tag group as delivered by a metadata reader. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsTagGroup {
    pub latitude: Option<Vec<Rational>>,
    pub latitude_ref: Option<String>,
    pub longitude: Option<Vec<Rational>>,
    pub longitude_ref: Option<String>,
    pub altitude: Option<Rational>,
    pub altitude_ref: Option<u8>,
    pub img_direction: Option<Rational>,
    pub img_direction_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGpsTags {
    pub gps: Option<GpsTagGroup>,
    pub date_time_original: Option<String>,
    pub orientation: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DmsPrecision {
    /// `degrees + minutes / 60`; the seconds term is dropped.
    #[default]
    DegreesMinutes,
    /// `degrees + minutes / 60 + seconds / 3600`.
    Full,
}

/// Non-fatal anomaly found while decoding one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    IncompleteCoordinate,
    MissingAltitudeTag,
    MissingAltitudeReference,
    MalformedTimestamp(String),
    InvalidRational(&'static str),
}

impl Display for DecodeIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteCoordinate => {
                f.write_str("GPS group present but latitude/longitude unreadable")
            }
            Self::MissingAltitudeTag => f.write_str("no altitude info"),
            Self::MissingAltitudeReference => f.write_str("no alt reference"),
            Self::MalformedTimestamp(raw) => write!(f, "malformed timestamp {raw:?}"),
            Self::InvalidRational(tag) => write!(f, "{tag} has a zero denominator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPhoto {
    pub record: PhotoRecord,
    pub issues: Vec<DecodeIssue>,
}

/// Reduces DMS rationals to decimal degrees. Returns `None` when a component
/// needed by `precision` is missing or has a zero denominator.
pub fn dms_to_degrees(components: &[Rational], precision: DmsPrecision) -> Option<f64> {
    let degrees = components.first()?.to_f64()?;
    let minutes = components.get(1)?.to_f64()?;
    match precision {
        DmsPrecision::DegreesMinutes => Some(degrees + minutes / 60.0),
        DmsPrecision::Full => {
            let seconds = match components.get(2) {
                Some(value) => value.to_f64()?,
                None => 0.0,
            };
            Some(degrees + minutes / 60.0 + seconds / 3600.0)
        }
    }
}

/// Rewrites `YYYY:MM:DD HH:MM:SS` as `YYYY/MM/DD HH:MM:SS`.
pub fn reformat_timestamp(raw: &str) -> Option<String> {
    let cleaned = raw.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(cleaned, EXIF_TIMESTAMP_FORMAT)
        .ok()
        .map(|parsed| parsed.format(RECORD_TIMESTAMP_FORMAT).to_string())
}

fn is_reference(value: Option<&String>, expected: &str) -> bool {
    value.is_some_and(|reference| reference.trim().eq_ignore_ascii_case(expected))
}

/// Turns raw tags into a [`PhotoRecord`] and projects it to UTM. Owns the
/// projector, so the transform cache lives as long as the decoder.
#[derive(Debug, Default)]
pub struct GpsDecoder {
    projector: Projector,
    precision: DmsPrecision,
}

impl GpsDecoder {
    pub fn new(projector: Projector, precision: DmsPrecision) -> Self {
        Self {
            projector,
            precision,
        }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn decode(
        &mut self,
        filename: &str,
        tags: &RawGpsTags,
    ) -> Result<DecodedPhoto, DomainError> {
        let mut issues = Vec::new();
        let Some(gps) = tags.gps.as_ref() else {
            return Ok(DecodedPhoto {
                record: PhotoRecord::placeholder(filename),
                issues,
            });
        };

        let lat = gps
            .latitude
            .as_deref()
            .and_then(|dms| dms_to_degrees(dms, self.precision));
        let lon = gps
            .longitude
            .as_deref()
            .and_then(|dms| dms_to_degrees(dms, self.precision));
        let (Some(mut lat), Some(mut lon)) = (lat, lon) else {
            issues.push(DecodeIssue::IncompleteCoordinate);
            return Ok(DecodedPhoto {
                record: PhotoRecord::placeholder(filename),
                issues,
            });
        };

        if is_reference(gps.latitude_ref.as_ref(), "S") {
            lat = -lat;
        }
        if is_reference(gps.longitude_ref.as_ref(), "W") {
            lon = -lon;
        }

        let mut altitude = match gps.altitude.and_then(Rational::to_f64) {
            Some(meters) => Altitude::Meters(meters),
            None => {
                issues.push(DecodeIssue::MissingAltitudeTag);
                Altitude::Unknown
            }
        };
        match (gps.altitude_ref, altitude) {
            (Some(BELOW_SEA_LEVEL), Altitude::Meters(meters)) => {
                altitude = Altitude::Meters(-meters);
            }
            (Some(_), _) => {}
            (None, _) => issues.push(DecodeIssue::MissingAltitudeReference),
        }

        let direction = match gps.img_direction {
            Some(value) => {
                let decoded = value.to_f64();
                if decoded.is_none() {
                    issues.push(DecodeIssue::InvalidRational("GPSImgDirection"));
                }
                decoded
            }
            None => None,
        };

        let timestamp = match tags.date_time_original.as_deref() {
            Some(raw) => {
                let reformatted = reformat_timestamp(raw);
                if reformatted.is_none() {
                    issues.push(DecodeIssue::MalformedTimestamp(raw.to_string()));
                }
                reformatted
            }
            None => None,
        };

        let utm = self.projector.project(lon, lat)?;

        Ok(DecodedPhoto {
            record: PhotoRecord {
                filename: filename.to_string(),
                lat: Some(lat),
                lon: Some(lon),
                altitude: Some(altitude),
                timestamp,
                direction,
                direction_type: gps.img_direction_ref.clone(),
                orientation: tags.orientation,
                utm: Some(utm),
            },
            issues,
        })
    }
}
