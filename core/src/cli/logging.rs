use env_logger::{Builder, Logger, Target};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io;
use std::path::Path;

/// Installs the global logger
///
/// The console logger honours `RUST_LOG`; `verbose` raises its default
/// level from Info to Debug. With `log_file`, a second logger writes every
/// Debug-and-above line to that file regardless of the console level.
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut console = Builder::from_default_env();
    console.filter_level(level);

    let Some(path) = log_file else {
        return console
            .try_init()
            .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e));
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;

    let logger = DualLogger::new(console.build(), file_logger(file));
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;
    log::set_max_level(max_level);
    Ok(())
}

/// Builds the Debug-level logger writing plain lines to `file`
fn file_logger(file: File) -> Logger {
    Builder::new()
        .filter_level(LevelFilter::Debug)
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Pipe(Box::new(file)))
        .build()
}

/// Logger dispatching each record to a console and a file logger,
/// each applying its own level filter
pub struct DualLogger {
    console: Logger,
    file: Logger,
}

impl DualLogger {
    pub fn new(console: Logger, file: Logger) -> Self {
        Self { console, file }
    }

    /// Most verbose level either logger accepts
    pub fn max_level(&self) -> LevelFilter {
        self.console.filter().max(self.file.filter())
    }
}

impl Log for DualLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.console.enabled(metadata) || self.file.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        self.console.log(record);
        self.file.log(record);
    }

    fn flush(&self) {
        self.console.flush();
        self.file.flush();
    }
}
