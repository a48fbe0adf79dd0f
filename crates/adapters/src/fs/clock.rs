use chrono::Local;
use photo_utm_application::Clock;

const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_file_stamp(&self) -> String {
        Local::now().format(FILE_STAMP_FORMAT).to_string()
    }
}
