mod error;
mod gps;
mod projection;
mod record;
mod zone;

pub use error::DomainError;
pub use gps::{
    dms_to_degrees, reformat_timestamp, DecodeIssue, DecodedPhoto, DmsPrecision, GpsDecoder,
    GpsTagGroup, Rational, RawGpsTags,
};
pub use projection::{Projector, UtmCoordinate, ZoneTransform, SOUTHERN_FALSE_NORTHING};
pub use record::{Altitude, ExportReport, PhotoRecord};
pub use zone::{parse_zone_label, resolve_band, resolve_zone, LatitudeBand, UtmZone};
