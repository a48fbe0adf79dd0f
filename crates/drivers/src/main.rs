mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use config::AppConfig;
use photo_utm_adapters::{
    present_coordinate, present_layer, present_lon_lat, present_report, CsvSinkFactory,
    DeferredLayerBuilder, DirectoryPhotoScanner, KamadakExifReader, SystemClock,
};
use photo_utm_application::{
    ApplicationError, ApplicationService, ExportFolderCommand, PlanLayerCommand,
    ProjectPointCommand, UnprojectPointCommand,
};
use tracing::{debug, error};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let invocation = match parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => return report_failure(error),
    };

    let config = match config::load(invocation.config_path.as_deref()) {
        Ok(config) => config,
        Err(error) => return report_failure(CommandError::Usage(error.to_string())),
    };
    logging::init_logging(&config.log_filter);

    let service = build_application_service(&config);
    match run_command(invocation.command, &service, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(error),
    }
}

fn build_application_service(config: &AppConfig) -> ApplicationService {
    ApplicationService::new(
        Box::new(DirectoryPhotoScanner::new(&config.extensions)),
        Box::new(KamadakExifReader),
        Box::new(CsvSinkFactory),
        Box::new(SystemClock),
        Box::new(DeferredLayerBuilder),
    )
}

#[derive(Debug, Clone)]
struct Invocation {
    config_path: Option<PathBuf>,
    command: Command,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Export {
        folder: PathBuf,
    },
    Project {
        lon: f64,
        lat: f64,
    },
    Unproject {
        zone_label: String,
        easting: f64,
        northing: f64,
    },
    Layer {
        csv_path: PathBuf,
    },
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn report_failure(error: CommandError) -> ExitCode {
    match error {
        CommandError::Usage(msg) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        CommandError::Runtime(msg) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn parse_invocation(args: &[String]) -> Result<Invocation, CommandError> {
    let mut rest = args.get(1..).unwrap_or_default();
    let mut config_path = None;

    if rest.first().map(String::as_str) == Some("--config") {
        let path = rest
            .get(1)
            .ok_or_else(|| CommandError::Usage("missing config path".to_string()))?;
        config_path = Some(PathBuf::from(path));
        rest = &rest[2..];
    }

    Ok(Invocation {
        config_path,
        command: parse_command(rest)?,
    })
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    let Some(name) = args.first() else {
        return Err(CommandError::Usage("missing command".to_string()));
    };

    match name.as_str() {
        "export" => {
            let folder = args
                .get(1)
                .ok_or_else(|| CommandError::Usage("missing folder path".to_string()))?;
            Ok(Command::Export {
                folder: PathBuf::from(folder),
            })
        }
        "project" => {
            if args.len() < 3 {
                return Err(CommandError::Usage("missing longitude/latitude".to_string()));
            }
            Ok(Command::Project {
                lon: parse_number(&args[1], "longitude")?,
                lat: parse_number(&args[2], "latitude")?,
            })
        }
        "unproject" => {
            if args.len() < 4 {
                return Err(CommandError::Usage(
                    "missing zone, easting or northing".to_string(),
                ));
            }
            Ok(Command::Unproject {
                zone_label: args[1].clone(),
                easting: parse_number(&args[2], "easting")?,
                northing: parse_number(&args[3], "northing")?,
            })
        }
        "layer" => {
            let csv_path = args
                .get(1)
                .ok_or_else(|| CommandError::Usage("missing csv path".to_string()))?;
            Ok(Command::Layer {
                csv_path: PathBuf::from(csv_path),
            })
        }
        other => Err(CommandError::Usage(format!("unknown command: {other}"))),
    }
}

fn parse_number(raw: &str, name: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::Usage(format!("invalid {name}: {raw}")))
}

fn run_command(
    command: Command,
    service: &ApplicationService,
    config: &AppConfig,
) -> Result<(), CommandError> {
    debug!(?command, "running command");
    match command {
        Command::Export { folder } => {
            let report = service
                .export_folder(ExportFolderCommand {
                    folder: folder.clone(),
                    output_suffix: config.output_suffix.clone(),
                    precision: config.dms_precision,
                })
                .map_err(|error| export_failure(&folder, &error))?;
            println!("{}", report.output_path.display());
            println!("{}", present_report(&report));
            Ok(())
        }
        Command::Project { lon, lat } => {
            let coordinate = service
                .project_point(ProjectPointCommand { lon, lat })
                .map_err(|error| CommandError::Runtime(format!("project failed: {error}")))?;
            println!("{}", present_coordinate(&coordinate));
            Ok(())
        }
        Command::Unproject {
            zone_label,
            easting,
            northing,
        } => {
            let (lon, lat) = service
                .unproject_point(UnprojectPointCommand {
                    zone_label,
                    easting,
                    northing,
                })
                .map_err(|error| CommandError::Runtime(format!("unproject failed: {error}")))?;
            println!("{}", present_lon_lat(lon, lat));
            Ok(())
        }
        Command::Layer { csv_path } => {
            let artifact = service
                .plan_layer(PlanLayerCommand { csv_path })
                .map_err(|error| CommandError::Runtime(format!("layer failed: {error}")))?;
            println!("{}", present_layer(&artifact));
            Ok(())
        }
    }
}

fn export_failure(folder: &Path, error: &ApplicationError) -> CommandError {
    error!(
        folder = %folder.display(),
        read_write = error.is_read_write(),
        %error,
        "export aborted"
    );
    if error.is_read_write() {
        CommandError::Runtime(format!(
            "export failed: {error}\n\
             There was a read/write error. Ensure that you have read and write \
             permissions for {}",
            folder.display()
        ))
    } else {
        CommandError::Runtime(format!("export failed: {error}"))
    }
}

fn print_usage() {
    println!("usage:");
    println!("  photo-utm [--config <file>] export <folder>");
    println!("  photo-utm project <lon> <lat>");
    println!("  photo-utm unproject <zone><band> <easting> <northing>");
    println!("  photo-utm layer <csv>");
}
