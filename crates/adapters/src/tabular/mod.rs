use std::fs::File;
use std::path::{Path, PathBuf};

use photo_utm_application::{ApplicationError, SinkFactory, TabularSink};
use photo_utm_domain::{Altitude, PhotoRecord};
use serde::Serialize;

/// One output row. Fields are declared in sorted column-name order so the
/// header matches what GIS tooling downstream expects.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Easting")]
    easting: f64,
    #[serde(rename = "Northing")]
    northing: f64,
    altitude: String,
    direction: Option<f64>,
    directiontype: Option<&'a str>,
    filename: &'a str,
    lat: f64,
    lon: f64,
    orientation: Option<u32>,
    timestamp: Option<&'a str>,
    utm_zone: String,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a PhotoRecord) -> Option<Self> {
        let utm = record.utm.as_ref()?;
        Some(Self {
            easting: utm.easting,
            northing: utm.northing,
            altitude: record.altitude.unwrap_or(Altitude::Unknown).to_string(),
            direction: record.direction,
            directiontype: record.direction_type.as_deref(),
            filename: &record.filename,
            lat: record.lat?,
            lon: record.lon?,
            orientation: record.orientation,
            timestamp: record.timestamp.as_deref(),
            utm_zone: utm.label(),
        })
    }
}

#[derive(Debug, Default)]
pub struct CsvSinkFactory;

impl SinkFactory for CsvSinkFactory {
    fn open_sink(
        &self,
        folder: &Path,
        file_name: &str,
    ) -> Result<Box<dyn TabularSink>, ApplicationError> {
        Ok(Box::new(CsvTabularSink::create(folder.join(file_name))?))
    }
}

/// CSV file held open for a whole export. The header goes out with the first row.
pub struct CsvTabularSink {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvTabularSink {
    pub fn create(path: PathBuf) -> Result<Self, ApplicationError> {
        let file = File::create(&path).map_err(|error| {
            ApplicationError::Io(format!("cannot create {}: {error}", path.display()))
        })?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            path,
        })
    }
}

impl TabularSink for CsvTabularSink {
    fn write_record(&mut self, record: &PhotoRecord) -> Result<(), ApplicationError> {
        let row = CsvRow::from_record(record).ok_or_else(|| {
            ApplicationError::Sink(format!(
                "{} has no coordinates and cannot be written",
                record.filename
            ))
        })?;
        self.writer
            .serialize(row)
            .map_err(|error| ApplicationError::Sink(error.to_string()))
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn finish(mut self: Box<Self>) -> Result<PathBuf, ApplicationError> {
        self.writer.flush().map_err(|error| {
            ApplicationError::Io(format!("cannot write {}: {error}", self.path.display()))
        })?;
        Ok(self.path)
    }
}
