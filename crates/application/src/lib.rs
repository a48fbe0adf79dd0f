mod error;
mod ports;
mod service;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{
    Clock, LayerArtifact, LayerBuilder, MetadataReader, PhotoScanSummary, PhotoScanner,
    ScannedPhoto, SinkFactory, TabularSink,
};
pub use service::{file_leaf_name, ApplicationService};
pub use use_cases::{
    ExportFolderCommand, PlanLayerCommand, ProjectPointCommand, UnprojectPointCommand,
};
