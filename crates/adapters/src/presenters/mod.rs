use photo_utm_application::LayerArtifact;
use photo_utm_domain::{ExportReport, UtmCoordinate};

pub fn present_report(report: &ExportReport) -> String {
    format!(
        "export finished: scanned={}, candidates={}, written={}, no_gps={}, unprojectable={}",
        report.scanned_files,
        report.candidate_images,
        report.written_rows,
        report.skipped_without_gps,
        report.skipped_unprojectable
    )
}

pub fn present_coordinate(coordinate: &UtmCoordinate) -> String {
    coordinate.to_string()
}

pub fn present_lon_lat(lon: f64, lat: f64) -> String {
    format!("{lon:.8} {lat:.8}")
}

pub fn present_layer(artifact: &LayerArtifact) -> String {
    format!(
        "layer {} from {} (save as {}, materialized={})",
        artifact.output_layer,
        artifact.csv_path.display(),
        artifact.saved_layer.display(),
        artifact.materialized
    )
}
