use std::path::PathBuf;

use photo_utm_domain::DmsPrecision;

#[derive(Debug, Clone)]
pub struct ExportFolderCommand {
    pub folder: PathBuf,
    pub output_suffix: String,
    pub precision: DmsPrecision,
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectPointCommand {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone)]
pub struct UnprojectPointCommand {
    pub zone_label: String,
    pub easting: f64,
    pub northing: f64,
}

#[derive(Debug, Clone)]
pub struct PlanLayerCommand {
    pub csv_path: PathBuf,
}
