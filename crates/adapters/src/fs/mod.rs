mod clock;
mod scanner;

pub use clock::SystemClock;
pub use scanner::{DirectoryPhotoScanner, DEFAULT_PHOTO_EXTENSIONS};
