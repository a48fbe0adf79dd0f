use std::path::Path;

use photo_utm_application::{ApplicationError, LayerArtifact, LayerBuilder};
use tracing::info;

/// Works out the XY event layer names for an exported CSV. No GIS software is
/// driven from here, so the returned artifact is never materialized.
#[derive(Debug, Default)]
pub struct DeferredLayerBuilder;

impl LayerBuilder for DeferredLayerBuilder {
    fn make_xy_layer(&self, csv_path: &Path) -> Result<LayerArtifact, ApplicationError> {
        let stem = csv_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                ApplicationError::InvalidInput(format!(
                    "cannot derive a layer name from {}",
                    csv_path.display()
                ))
            })?;

        let artifact = LayerArtifact {
            csv_path: csv_path.to_path_buf(),
            output_layer: format!("{stem}_lyr"),
            saved_layer: csv_path.with_extension("lyr"),
            materialized: false,
        };
        info!(
            layer = %artifact.output_layer,
            "no GIS tool configured; layer must be created from the CSV by hand"
        );
        Ok(artifact)
    }
}
