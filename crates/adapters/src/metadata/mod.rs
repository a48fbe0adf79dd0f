use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Context, Exif, In, Tag, Value};
use photo_utm_application::{ApplicationError, MetadataReader};
use photo_utm_domain::{GpsTagGroup, Rational, RawGpsTags};
use tracing::debug;

/// Reads GPS, capture time and orientation tags with kamadak-exif.
#[derive(Debug, Default)]
pub struct KamadakExifReader;

impl MetadataReader for KamadakExifReader {
    fn read_tags(&self, path: &Path) -> Result<RawGpsTags, ApplicationError> {
        let file = File::open(path).map_err(|error| {
            ApplicationError::Io(format!("cannot open {}: {error}", path.display()))
        })?;
        let mut reader = BufReader::new(file);

        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(tags_from_exif(&exif)),
            Err(exif::Error::NotFound(_)) => {
                debug!(path = %path.display(), "no EXIF block");
                Ok(RawGpsTags::default())
            }
            Err(exif::Error::Io(error)) => Err(ApplicationError::Io(format!(
                "cannot read {}: {error}",
                path.display()
            ))),
            Err(error) => Err(ApplicationError::Metadata(format!(
                "{}: {error}",
                path.display()
            ))),
        }
    }
}

fn tags_from_exif(exif: &Exif) -> RawGpsTags {
    let field = |tag: Tag| exif.get_field(tag, In::PRIMARY).map(|field| &field.value);

    let has_gps = exif.fields().any(|field| field.tag.context() == Context::Gps);
    let gps = has_gps.then(|| GpsTagGroup {
        latitude: field(Tag::GPSLatitude).and_then(rationals),
        latitude_ref: field(Tag::GPSLatitudeRef).and_then(ascii),
        longitude: field(Tag::GPSLongitude).and_then(rationals),
        longitude_ref: field(Tag::GPSLongitudeRef).and_then(ascii),
        altitude: field(Tag::GPSAltitude).and_then(first_rational),
        altitude_ref: field(Tag::GPSAltitudeRef)
            .and_then(|value| value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok()),
        img_direction: field(Tag::GPSImgDirection).and_then(first_rational),
        img_direction_ref: field(Tag::GPSImgDirectionRef).and_then(ascii),
    });

    RawGpsTags {
        gps,
        date_time_original: field(Tag::DateTimeOriginal).and_then(ascii),
        orientation: field(Tag::Orientation).and_then(|value| value.get_uint(0)),
    }
}

fn rationals(value: &Value) -> Option<Vec<Rational>> {
    match value {
        Value::Rational(items) => Some(
            items
                .iter()
                .map(|item| Rational::new(i64::from(item.num), i64::from(item.denom)))
                .collect(),
        ),
        Value::SRational(items) => Some(
            items
                .iter()
                .map(|item| Rational::new(i64::from(item.num), i64::from(item.denom)))
                .collect(),
        ),
        _ => None,
    }
}

fn first_rational(value: &Value) -> Option<Rational> {
    rationals(value)?.into_iter().next()
}

fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}
