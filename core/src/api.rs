use crate::discovery::discover_dicom_files;
use crate::error::{DcmMergeError, Result};
use crate::extraction::RecordExtractor;
use crate::observer::{RunEvent, RunObserver};
use crate::table::{TableWriter, TABLE_EXTENSION};
use crate::types::{parse_tag_identifier, FieldSpec, FieldValue};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Directory holding default output tables
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Merges the metadata of a DICOM directory tree into one table
///
/// A run walks the root directory, extracts one row per readable file and
/// streams it to the destination table. Unreadable files and unresolvable
/// fields are recovered locally; missing configuration, an empty input tree
/// and an unwritable destination end the run with an error.
///
/// # Example
///
/// ```no_run
/// use dcmmerge_core::{DicomMerger, FieldSpec, LogObserver};
/// use std::path::Path;
///
/// let spec = FieldSpec::from_path("selected_tags.json").unwrap();
/// let report = DicomMerger::new(spec)
///     .run(Path::new("/data/study"), None, &mut LogObserver)
///     .unwrap();
///
/// println!("{} rows written to {}", report.written, report.destination.display());
/// ```
#[derive(Debug, Clone)]
pub struct DicomMerger {
    spec: FieldSpec,
    output_dir: PathBuf,
}

impl DicomMerger {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Sets the directory of the default destination (`results` otherwise)
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Runs discovery, extraction and writing in a single pass
    ///
    /// `output` overrides the destination; when omitted it is derived from
    /// the root directory's name inside the output directory (see
    /// [`resolve_destination`]).
    ///
    /// # Errors
    ///
    /// - [`DcmMergeError::NoInput`] if no DICOM files are found; no output
    ///   file is created in that case
    /// - [`DcmMergeError::Io`] if the destination cannot be written
    pub fn run(
        &self,
        root: &Path,
        output: Option<&Path>,
        observer: &mut dyn RunObserver,
    ) -> Result<RunReport> {
        let start = Instant::now();
        let destination = resolve_destination(root, output, &self.output_dir);

        observer.on_event(RunEvent::Started {
            root,
            destination: &destination,
        });

        if !root.exists() {
            observer.on_event(RunEvent::RootMissing { root });
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let invalid_fields = self.invalid_fields(observer);

        let files = discover_dicom_files(root, observer);
        observer.on_event(RunEvent::Discovered { count: files.len() });
        if files.is_empty() {
            return Err(DcmMergeError::NoInput {
                root: root.to_path_buf(),
            });
        }

        let mut writer = TableWriter::create(&destination, &self.spec)?;
        observer.on_event(RunEvent::HeaderWritten {
            columns: writer.columns(),
        });

        let extractor = RecordExtractor::new(&self.spec);
        let mut skipped = Vec::new();

        for path in files.iter().map(PathBuf::as_path) {
            let record = match extractor.extract_file(path) {
                Ok(record) => record,
                Err(e) if !e.is_fatal() => {
                    observer.on_event(RunEvent::FileSkipped { path, error: &e });
                    skipped.push(path.to_path_buf());
                    continue;
                }
                Err(e) => return Err(e),
            };

            for (field, value) in self.spec.fields().iter().zip(&record.values) {
                let reason = match value {
                    FieldValue::Present(_) => continue,
                    FieldValue::Missing => "not present",
                    FieldValue::InvalidIdentifier(reason) => reason.as_str(),
                };
                observer.on_event(RunEvent::FieldUnresolved {
                    path,
                    field: &field.name,
                    reason,
                });
            }

            writer.write_record(&record)?;
            observer.on_event(RunEvent::RecordWritten { path });
        }

        let written = writer.rows();
        writer.finish()?;

        let report = RunReport {
            root: root.to_path_buf(),
            destination,
            discovered: files.len(),
            written,
            skipped,
            invalid_fields,
            elapsed: start.elapsed(),
        };

        observer.on_event(RunEvent::Finished {
            written: report.written,
            skipped: report.skipped.len(),
            elapsed: report.elapsed,
        });

        Ok(report)
    }

    /// Reports fields whose identifier can never resolve, once per run
    fn invalid_fields(&self, observer: &mut dyn RunObserver) -> Vec<String> {
        let mut invalid = Vec::new();
        for field in self.spec.fields() {
            if let Err(error) = parse_tag_identifier(&field.identifier) {
                observer.on_event(RunEvent::InvalidField {
                    field: &field.name,
                    error: &error,
                });
                invalid.push(field.name.clone());
            }
        }
        invalid
    }
}

/// Resolves the output table path
///
/// Without an explicit output, the table goes to
/// `<output_dir>/<root directory name>.csv`. An explicit output lacking the
/// `.csv` suffix gets it appended.
pub fn resolve_destination(
    root: &Path,
    output: Option<&Path>,
    output_dir: &Path,
) -> PathBuf {
    match output {
        Some(path) => with_table_extension(path),
        None => output_dir.join(format!("{}.{}", root_name(root), TABLE_EXTENSION)),
    }
}

fn with_table_extension(path: &Path) -> PathBuf {
    let suffix = format!(".{}", TABLE_EXTENSION);
    if path.to_string_lossy().ends_with(&suffix) {
        path.to_path_buf()
    } else {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        PathBuf::from(os)
    }
}

/// Final path segment of the root, e.g. `study` for `/data/study/`
fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "dataset".to_string())
}

/// Overall outcome of a run that reached the end of its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum RunStatus {
    /// Every discovered file produced a row
    Complete,

    /// Some files were skipped
    Partial,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Complete => write!(f, "complete"),
            RunStatus::Partial => write!(f, "partial"),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RunReport {
    /// Root directory that was scanned
    pub root: PathBuf,

    /// Table that was written
    pub destination: PathBuf,

    /// Number of DICOM files found
    pub discovered: usize,

    /// Number of data rows written
    pub written: usize,

    /// Files that could not be decoded
    pub skipped: Vec<PathBuf>,

    /// Fields with a malformed identifier (empty in every row)
    pub invalid_fields: Vec<String>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        if self.skipped.is_empty() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        }
    }
}
