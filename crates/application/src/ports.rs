use std::path::{Path, PathBuf};

use photo_utm_domain::{PhotoRecord, RawGpsTags};

use crate::ApplicationError;

#[derive(Debug, Clone)]
pub struct ScannedPhoto {
    pub path: PathBuf,
    pub extension: String,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoScanSummary {
    pub scanned_files: usize,
    pub photos: Vec<ScannedPhoto>,
}

/// Lists candidate images directly inside a folder (no recursion).
pub trait PhotoScanner {
    fn scan_photos(&self, folder: &Path) -> Result<PhotoScanSummary, ApplicationError>;
}

/// Extracts the GPS, capture time and orientation tags of one image.
pub trait MetadataReader {
    fn read_tags(&self, path: &Path) -> Result<RawGpsTags, ApplicationError>;
}

/// Row-oriented output. Dropping a sink releases it; `finish` flushes and
/// returns where the rows went.
pub trait TabularSink {
    fn write_record(&mut self, record: &PhotoRecord) -> Result<(), ApplicationError>;

    fn path(&self) -> &Path;

    fn finish(self: Box<Self>) -> Result<PathBuf, ApplicationError>;
}

pub trait SinkFactory {
    fn open_sink(
        &self,
        folder: &Path,
        file_name: &str,
    ) -> Result<Box<dyn TabularSink>, ApplicationError>;
}

pub trait Clock {
    /// Local time formatted as `YYYYMMDD_HHMMSS`.
    fn now_file_stamp(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerArtifact {
    pub csv_path: PathBuf,
    pub output_layer: String,
    pub saved_layer: PathBuf,
    pub materialized: bool,
}

/// Turns an exported CSV into a point layer in external GIS software.
pub trait LayerBuilder {
    fn make_xy_layer(&self, csv_path: &Path) -> Result<LayerArtifact, ApplicationError>;
}
