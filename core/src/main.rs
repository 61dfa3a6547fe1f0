use clap::Parser;
use dcmmerge_core::cli::logging::setup_logging;
use dcmmerge_core::cli::{Cli, OutputFormat};
use dcmmerge_core::{DicomMerger, FieldSpec, LogObserver, RunReport, RunStatus, TextReport};
use log::{error, info, warn};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    if let Err(e) = setup_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Error: Failed to set up logging: {}", e);
        process::exit(1);
    }
    if let Some(path) = &cli.log_file {
        info!("Log file: {}", path.display());
    }

    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let start = Instant::now();

    if let Some(output) = &cli.output {
        if !output.to_string_lossy().ends_with(".csv") {
            warn!(
                "The output path {} does not end with '.csv'. Appending '.csv'.",
                output.display()
            );
        }
    }

    let spec = match FieldSpec::from_path(&cli.tags) {
        Ok(spec) => spec,
        Err(e) => {
            error!("{}", e);
            error!("Run failed after {:.2?}", start.elapsed());
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    info!("Loaded {} fields from {}", spec.len(), cli.tags.display());

    match DicomMerger::new(spec).run(&cli.root, cli.output.as_deref(), &mut LogObserver) {
        Ok(report) => {
            output_report(&report, &cli.format);
            if cli.fail_on_skip && report.status() == RunStatus::Partial {
                warn!("{} files were skipped", report.skipped.len());
                2
            } else {
                0
            }
        }
        Err(e) => {
            error!("{}", e);
            error!("Run failed after {:.2?}", start.elapsed());
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_report(report: &RunReport, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", TextReport::new(report)),
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                println!("{}", TextReport::new(report));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    #[test]
    fn test_missing_field_spec_fails_before_output() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("study");
        std::fs::create_dir(&root).unwrap();
        let output = temp_dir.path().join("out.csv");

        let args: Vec<OsString> = vec![
            "dcmmerge".into(),
            root.into(),
            "-o".into(),
            output.clone().into(),
            "-t".into(),
            temp_dir.path().join("absent.json").into(),
        ];
        let cli = Cli::parse_from(args);

        assert_eq!(run(&cli), 1);
        assert!(!output.exists());
    }
}
