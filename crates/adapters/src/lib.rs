pub mod fs;
pub mod gis;
pub mod metadata;
pub mod presenters;
pub mod tabular;

pub use fs::{DirectoryPhotoScanner, SystemClock, DEFAULT_PHOTO_EXTENSIONS};
pub use gis::DeferredLayerBuilder;
pub use metadata::KamadakExifReader;
pub use presenters::{present_coordinate, present_layer, present_lon_lat, present_report};
pub use tabular::{CsvSinkFactory, CsvTabularSink};
