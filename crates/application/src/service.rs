use std::path::Path;

use photo_utm_domain::{
    parse_zone_label, DomainError, ExportReport, GpsDecoder, Projector, UtmCoordinate,
};
use tracing::{debug, info, warn};

use crate::{
    ApplicationError, Clock, ExportFolderCommand, LayerArtifact, LayerBuilder, MetadataReader,
    PhotoScanner, PlanLayerCommand, ProjectPointCommand, SinkFactory, UnprojectPointCommand,
};

pub struct ApplicationService {
    scanner: Box<dyn PhotoScanner>,
    reader: Box<dyn MetadataReader>,
    sinks: Box<dyn SinkFactory>,
    clock: Box<dyn Clock>,
    layers: Box<dyn LayerBuilder>,
}

impl ApplicationService {
    pub fn new(
        scanner: Box<dyn PhotoScanner>,
        reader: Box<dyn MetadataReader>,
        sinks: Box<dyn SinkFactory>,
        clock: Box<dyn Clock>,
        layers: Box<dyn LayerBuilder>,
    ) -> Self {
        Self {
            scanner,
            reader,
            sinks,
            clock,
            layers,
        }
    }

    /// Decodes every candidate image in the folder and writes one row per
    /// geotagged photo. The first read or write failure aborts the batch.
    pub fn export_folder(
        &self,
        command: ExportFolderCommand,
    ) -> Result<ExportReport, ApplicationError> {
        if command.folder.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "folder path must not be empty".to_string(),
            ));
        }
        if command.output_suffix.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "output file suffix must not be empty".to_string(),
            ));
        }

        let scan = self.scanner.scan_photos(&command.folder)?;
        info!(
            folder = %command.folder.display(),
            scanned = scan.scanned_files,
            candidates = scan.photos.len(),
            "scanned photo folder"
        );

        let file_name = format!("{}_{}", self.clock.now_file_stamp(), command.output_suffix);
        let mut sink = self.sinks.open_sink(&command.folder, &file_name)?;
        debug!(output = %sink.path().display(), "opened output sink");
        let mut decoder = GpsDecoder::new(Projector::new(), command.precision);

        let mut report = ExportReport {
            scanned_files: scan.scanned_files,
            candidate_images: scan.photos.len(),
            ..ExportReport::default()
        };

        for photo in &scan.photos {
            let filename = file_leaf_name(&photo.path);
            debug!(file = %filename, extension = %photo.extension, "reading tags");
            let tags = self.reader.read_tags(&photo.path)?;

            let decoded = match decoder.decode(&filename, &tags) {
                Ok(decoded) => decoded,
                Err(error @ DomainError::Projection(_)) => return Err(error.into()),
                Err(error) => {
                    warn!(file = %filename, %error, "skipping photo that cannot be projected");
                    report.skipped_unprojectable += 1;
                    continue;
                }
            };
            for issue in &decoded.issues {
                warn!(file = %filename, "{issue}");
            }

            if !decoded.record.is_geotagged() {
                debug!(file = %filename, "no GPS data, skipping");
                report.skipped_without_gps += 1;
                continue;
            }

            sink.write_record(&decoded.record)?;
            report.written_rows += 1;
        }

        report.output_path = sink.finish()?;
        info!(
            rows = report.written_rows,
            zones = decoder.projector().cached_zones(),
            output = %report.output_path.display(),
            "export finished"
        );
        Ok(report)
    }

    pub fn project_point(
        &self,
        command: ProjectPointCommand,
    ) -> Result<UtmCoordinate, ApplicationError> {
        Ok(Projector::new().project(command.lon, command.lat)?)
    }

    pub fn unproject_point(
        &self,
        command: UnprojectPointCommand,
    ) -> Result<(f64, f64), ApplicationError> {
        let (zone, band) = parse_zone_label(&command.zone_label)?;
        let coordinate = UtmCoordinate {
            zone,
            band,
            easting: command.easting,
            northing: command.northing,
        };
        Ok(Projector::new().unproject(&coordinate)?)
    }

    pub fn plan_layer(&self, command: PlanLayerCommand) -> Result<LayerArtifact, ApplicationError> {
        let is_csv = command
            .csv_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(ApplicationError::InvalidInput(format!(
                "expected a .csv file, got {}",
                command.csv_path.display()
            )));
        }
        self.layers.make_xy_layer(&command.csv_path)
    }
}

/// File name component of a path, falling back to the whole path.
pub fn file_leaf_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::rc::Rc;

    use photo_utm_domain::{
        Altitude, DmsPrecision, DomainError, GpsTagGroup, PhotoRecord, Rational, RawGpsTags,
    };

    use super::*;
    use crate::{PhotoScanSummary, ScannedPhoto, TabularSink};

    struct FakeScanner {
        files: Vec<PathBuf>,
    }

    impl PhotoScanner for FakeScanner {
        fn scan_photos(&self, _folder: &Path) -> Result<PhotoScanSummary, ApplicationError> {
            Ok(PhotoScanSummary {
                scanned_files: self.files.len() + 1,
                photos: self
                    .files
                    .iter()
                    .map(|path| ScannedPhoto {
                        path: path.clone(),
                        extension: "jpg".to_string(),
                    })
                    .collect(),
            })
        }
    }

    #[derive(Default)]
    struct FakeReader {
        tags: HashMap<PathBuf, RawGpsTags>,
        unreadable: Option<PathBuf>,
        reads: Rc<Cell<usize>>,
    }

    impl MetadataReader for FakeReader {
        fn read_tags(&self, path: &Path) -> Result<RawGpsTags, ApplicationError> {
            self.reads.set(self.reads.get() + 1);
            if self.unreadable.as_deref() == Some(path) {
                return Err(ApplicationError::Io(format!(
                    "permission denied: {}",
                    path.display()
                )));
            }
            Ok(self.tags.get(path).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct SinkLog {
        opened: RefCell<Vec<PathBuf>>,
        rows: RefCell<Vec<PhotoRecord>>,
        finished: Cell<bool>,
    }

    struct FakeSink {
        path: PathBuf,
        log: Rc<SinkLog>,
    }

    impl TabularSink for FakeSink {
        fn write_record(&mut self, record: &PhotoRecord) -> Result<(), ApplicationError> {
            self.log.rows.borrow_mut().push(record.clone());
            Ok(())
        }

        fn path(&self) -> &Path {
            &self.path
        }

        fn finish(self: Box<Self>) -> Result<PathBuf, ApplicationError> {
            self.log.finished.set(true);
            Ok(self.path)
        }
    }

    struct FakeSinks {
        log: Rc<SinkLog>,
    }

    impl SinkFactory for FakeSinks {
        fn open_sink(
            &self,
            folder: &Path,
            file_name: &str,
        ) -> Result<Box<dyn TabularSink>, ApplicationError> {
            let path = folder.join(file_name);
            self.log.opened.borrow_mut().push(path.clone());
            Ok(Box::new(FakeSink {
                path,
                log: Rc::clone(&self.log),
            }))
        }
    }

    struct FakeClock;

    impl Clock for FakeClock {
        fn now_file_stamp(&self) -> String {
            "20240102_030405".to_string()
        }
    }

    struct FakeLayers;

    impl LayerBuilder for FakeLayers {
        fn make_xy_layer(&self, csv_path: &Path) -> Result<LayerArtifact, ApplicationError> {
            Ok(LayerArtifact {
                csv_path: csv_path.to_path_buf(),
                output_layer: "points_lyr".to_string(),
                saved_layer: csv_path.with_extension("lyr"),
                materialized: false,
            })
        }
    }

    fn geotagged(lat: (i64, i64), lat_ref: &str, lon: (i64, i64), lon_ref: &str) -> RawGpsTags {
        RawGpsTags {
            gps: Some(GpsTagGroup {
                latitude: Some(vec![
                    Rational::new(lat.0, 1),
                    Rational::new(lat.1, 1),
                    Rational::new(0, 1),
                ]),
                latitude_ref: Some(lat_ref.to_string()),
                longitude: Some(vec![
                    Rational::new(lon.0, 1),
                    Rational::new(lon.1, 1),
                    Rational::new(0, 1),
                ]),
                longitude_ref: Some(lon_ref.to_string()),
                altitude: Some(Rational::new(12, 1)),
                altitude_ref: Some(0),
                img_direction: Some(Rational::new(180, 1)),
                img_direction_ref: Some("M".to_string()),
            }),
            date_time_original: Some("2021:07:04 12:00:00".to_string()),
            orientation: Some(1),
        }
    }

    fn service_with(
        reader: FakeReader,
        files: Vec<PathBuf>,
        log: Rc<SinkLog>,
    ) -> ApplicationService {
        ApplicationService::new(
            Box::new(FakeScanner { files }),
            Box::new(reader),
            Box::new(FakeSinks { log }),
            Box::new(FakeClock),
            Box::new(FakeLayers),
        )
    }

    fn export_command() -> ExportFolderCommand {
        ExportFolderCommand {
            folder: PathBuf::from("/photos"),
            output_suffix: "fileinfo.csv".to_string(),
            precision: DmsPrecision::DegreesMinutes,
        }
    }

    #[test]
    fn export_writes_only_geotagged_photos() {
        let oslo = PathBuf::from("/photos/oslo.jpg");
        let plain = PathBuf::from("/photos/plain.JPG");
        let lima = PathBuf::from("/photos/lima.jpeg");

        let mut reader = FakeReader::default();
        reader
            .tags
            .insert(oslo.clone(), geotagged((59, 54), "N", (10, 45), "E"));
        reader
            .tags
            .insert(lima.clone(), geotagged((12, 3), "S", (77, 2), "W"));

        let log = Rc::new(SinkLog::default());
        let service = service_with(reader, vec![oslo, plain, lima], Rc::clone(&log));

        let report = service
            .export_folder(export_command())
            .expect("export should work");

        assert_eq!(report.scanned_files, 4);
        assert_eq!(report.candidate_images, 3);
        assert_eq!(report.written_rows, 2);
        assert_eq!(report.skipped_without_gps, 1);
        assert_eq!(report.skipped_unprojectable, 0);
        assert_eq!(
            report.output_path,
            PathBuf::from("/photos/20240102_030405_fileinfo.csv")
        );
        assert!(log.finished.get());

        let rows = log.rows.borrow();
        let mut names: Vec<&str> = rows.iter().map(|row| row.filename.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["lima.jpeg", "oslo.jpg"]);
        assert!(rows.iter().all(PhotoRecord::is_geotagged));

        let lima_row = rows
            .iter()
            .find(|row| row.filename == "lima.jpeg")
            .expect("lima row");
        assert!(lima_row.lat.expect("lat") < 0.0);
        assert!(lima_row.lon.expect("lon") < 0.0);
        assert_eq!(lima_row.utm_zone().as_deref(), Some("18L"));
        assert_eq!(lima_row.altitude, Some(Altitude::Meters(12.0)));
    }

    #[test]
    fn photo_without_altitude_and_with_bad_timestamp_is_still_written() {
        let equator = PathBuf::from("/photos/equator.jpg");

        let mut tags = geotagged((0, 0), "S", (9, 0), "E");
        if let Some(gps) = tags.gps.as_mut() {
            gps.altitude = None;
            gps.altitude_ref = None;
        }
        tags.date_time_original = Some("2020-01-01 00:00:00".to_string());

        let mut reader = FakeReader::default();
        reader.tags.insert(equator.clone(), tags);

        let log = Rc::new(SinkLog::default());
        let service = service_with(reader, vec![equator], Rc::clone(&log));

        let report = service
            .export_folder(export_command())
            .expect("export should work");
        assert_eq!(report.written_rows, 1);
        assert_eq!(report.skipped_without_gps, 0);
        assert_eq!(report.skipped_unprojectable, 0);

        let rows = log.rows.borrow();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.filename, "equator.jpg");
        assert_eq!(row.altitude, Some(Altitude::Unknown));
        assert_eq!(row.timestamp, None);
        assert_eq!(row.direction, Some(180.0));
        assert_eq!(row.orientation, Some(1));
        assert_eq!(row.utm_zone().as_deref(), Some("32N"));
    }

    #[test]
    fn read_failure_aborts_the_batch() {
        let first = PathBuf::from("/photos/a.jpg");
        let locked = PathBuf::from("/photos/b.jpg");
        let last = PathBuf::from("/photos/c.jpg");

        let mut reader = FakeReader::default();
        reader
            .tags
            .insert(first.clone(), geotagged((48, 51), "N", (2, 21), "E"));
        reader
            .tags
            .insert(last.clone(), geotagged((48, 51), "N", (2, 21), "E"));
        reader.unreadable = Some(locked.clone());

        let reads = Rc::new(Cell::new(0));
        reader.reads = Rc::clone(&reads);

        let log = Rc::new(SinkLog::default());
        let service = service_with(reader, vec![first, locked, last], Rc::clone(&log));

        let result = service.export_folder(export_command());
        assert_eq!(reads.get(), 2);

        assert!(matches!(result, Err(ApplicationError::Io(_))));
        assert!(result.as_ref().err().is_some_and(ApplicationError::is_read_write));
        assert_eq!(log.rows.borrow().len(), 1);
        assert!(!log.finished.get());
    }

    #[test]
    fn unprojectable_photo_is_skipped() {
        let arctic = PathBuf::from("/photos/arctic.jpg");
        let paris = PathBuf::from("/photos/paris.jpg");

        let mut reader = FakeReader::default();
        reader
            .tags
            .insert(arctic.clone(), geotagged((88, 0), "N", (10, 0), "E"));
        reader
            .tags
            .insert(paris.clone(), geotagged((48, 51), "N", (2, 21), "E"));

        let log = Rc::new(SinkLog::default());
        let service = service_with(reader, vec![arctic, paris], Rc::clone(&log));

        let report = service
            .export_folder(export_command())
            .expect("export should work");
        assert_eq!(report.written_rows, 1);
        assert_eq!(report.skipped_unprojectable, 1);
    }

    #[test]
    fn empty_folder_still_opens_and_closes_sink() {
        let log = Rc::new(SinkLog::default());
        let service = service_with(FakeReader::default(), vec![], Rc::clone(&log));

        let report = service
            .export_folder(export_command())
            .expect("export should work");

        assert_eq!(report.written_rows, 0);
        assert_eq!(log.opened.borrow().len(), 1);
        assert!(log.finished.get());
    }

    #[test]
    fn export_rejects_blank_suffix() {
        let log = Rc::new(SinkLog::default());
        let service = service_with(FakeReader::default(), vec![], Rc::clone(&log));

        let result = service.export_folder(ExportFolderCommand {
            output_suffix: "  ".to_string(),
            ..export_command()
        });

        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
        assert!(log.opened.borrow().is_empty());
    }

    #[test]
    fn project_and_unproject_point() {
        let service = service_with(
            FakeReader::default(),
            vec![],
            Rc::new(SinkLog::default()),
        );

        let utm = service
            .project_point(ProjectPointCommand {
                lon: 10.0,
                lat: 60.0,
            })
            .expect("project");
        assert_eq!(utm.label(), "32V");

        let (lon, lat) = service
            .unproject_point(UnprojectPointCommand {
                zone_label: utm.label(),
                easting: utm.easting,
                northing: utm.northing,
            })
            .expect("unproject");
        assert!((lon - 10.0).abs() < 1e-6);
        assert!((lat - 60.0).abs() < 1e-6);
    }

    #[test]
    fn unproject_rejects_bad_zone_label() {
        let service = service_with(
            FakeReader::default(),
            vec![],
            Rc::new(SinkLog::default()),
        );
        let result = service.unproject_point(UnprojectPointCommand {
            zone_label: "99Z".to_string(),
            easting: 500_000.0,
            northing: 0.0,
        });
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::InvalidZone(99)))
        ));
    }

    #[test]
    fn plan_layer_requires_csv() {
        let service = service_with(
            FakeReader::default(),
            vec![],
            Rc::new(SinkLog::default()),
        );
        assert!(matches!(
            service.plan_layer(PlanLayerCommand {
                csv_path: PathBuf::from("/photos/out.txt"),
            }),
            Err(ApplicationError::InvalidInput(_))
        ));

        let artifact = service
            .plan_layer(PlanLayerCommand {
                csv_path: PathBuf::from("/photos/out.csv"),
            })
            .expect("plan");
        assert_eq!(artifact.saved_layer, PathBuf::from("/photos/out.lyr"));
    }

    #[test]
    fn leaf_name_strips_directories() {
        assert_eq!(file_leaf_name(Path::new("/a/b/c.jpg")), "c.jpg");
        assert_eq!(file_leaf_name(Path::new("c.jpg")), "c.jpg");
    }
}
