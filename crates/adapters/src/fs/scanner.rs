use std::path::Path;

use photo_utm_application::{ApplicationError, PhotoScanSummary, PhotoScanner, ScannedPhoto};
use walkdir::WalkDir;

pub const DEFAULT_PHOTO_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Lists files directly inside a folder whose extension matches, ignoring case.
#[derive(Debug, Clone)]
pub struct DirectoryPhotoScanner {
    extensions: Vec<String>,
}

impl DirectoryPhotoScanner {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    fn matching_extension(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extensions.contains(&ext).then_some(ext)
    }
}

impl Default for DirectoryPhotoScanner {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_EXTENSIONS)
    }
}

impl PhotoScanner for DirectoryPhotoScanner {
    fn scan_photos(&self, folder: &Path) -> Result<PhotoScanSummary, ApplicationError> {
        if !folder.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "folder does not exist or is not a directory: {}",
                folder.display()
            )));
        }

        let mut summary = PhotoScanSummary::default();

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|error| ApplicationError::Io(error.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            summary.scanned_files += 1;
            let Some(extension) = self.matching_extension(entry.path()) else {
                continue;
            };

            summary.photos.push(ScannedPhoto {
                path: entry.into_path(),
                extension,
            });
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").expect("write file");
    }

    #[test]
    fn matches_extensions_case_insensitively() {
        let dir = TempDir::new().expect("tempdir");
        for name in ["a.jpg", "b.JPG", "c.jpeg", "d.JPEG", "e.png", "f.jpg.txt", "noext"] {
            touch(dir.path(), name);
        }

        let summary = DirectoryPhotoScanner::default()
            .scan_photos(dir.path())
            .expect("scan");

        assert_eq!(summary.scanned_files, 7);
        let mut names: Vec<String> = summary
            .photos
            .iter()
            .map(|photo| {
                photo
                    .path
                    .file_name()
                    .expect("name")
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "b.JPG", "c.jpeg", "d.JPEG"]);
        assert!(summary
            .photos
            .iter()
            .all(|photo| photo.extension == "jpg" || photo.extension == "jpeg"));
    }

    #[test]
    fn does_not_descend_into_subfolders() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "top.jpg");
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).expect("mkdir");
        touch(&nested, "deep.jpg");

        let summary = DirectoryPhotoScanner::default()
            .scan_photos(dir.path())
            .expect("scan");

        assert_eq!(summary.scanned_files, 1);
        assert_eq!(summary.photos.len(), 1);
    }

    #[test]
    fn custom_extensions_are_normalised() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "a.TIF");
        touch(dir.path(), "b.jpg");

        let summary = DirectoryPhotoScanner::new([".tif"])
            .scan_photos(dir.path())
            .expect("scan");

        assert_eq!(summary.photos.len(), 1);
        assert_eq!(summary.photos[0].extension, "tif");
    }

    #[test]
    fn missing_folder_is_invalid_input() {
        let dir = TempDir::new().expect("tempdir");
        let result = DirectoryPhotoScanner::default().scan_photos(&dir.path().join("absent"));
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }
}
