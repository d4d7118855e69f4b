//! Process-wide log sink: console plus rotating files.
//!
//! [`init`] installs a `tracing` subscriber with three outputs: a console
//! layer, `combined.log` (everything the filter lets through), and
//! `error.log` (ERROR only). Both files are size-capped and rotated in
//! place by [`RollingWriter`]. The minimum level comes from the
//! `TRACKSPEC_LOG` environment variable, falling back to the configured
//! default filter.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_LEVEL_ENV: &str = "TRACKSPEC_LOG";

/// File name of the all-levels log.
pub const COMBINED_LOG: &str = "combined.log";
/// File name of the errors-only log.
pub const ERROR_LOG: &str = "error.log";

const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
const KEPT_ROTATIONS: usize = 5;

/// Errors that can occur while installing the log sink.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum LoggingError {
    /// Log directory or file could not be prepared.
    #[display("I/O error: {_0}")]
    Io(io::Error),

    /// A global subscriber is already installed.
    #[display("failed to install subscriber: {_0}")]
    Init(tracing_subscriber::util::TryInitError),
}

/// Configuration for [`init`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory receiving `combined.log` and `error.log`.
    pub directory: PathBuf,
    /// Filter used when `TRACKSPEC_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            default_filter: "trackspec_core=info".to_string(),
        }
    }
}

/// Installs the process-wide subscriber.
///
/// Safe to call once per process; a second call reports
/// [`LoggingError::Init`]. Tests that just want console output can skip
/// this entirely and rely on the host runner's capture.
///
/// # Errors
///
/// Returns [`LoggingError::Io`] when the log directory or files cannot be
/// created, [`LoggingError::Init`] when a subscriber is already set.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    fs::create_dir_all(&config.directory)?;

    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let combined = RollingWriter::create(
        config.directory.join(COMBINED_LOG),
        MAX_LOG_BYTES,
        KEPT_ROTATIONS,
    )?;
    let errors = RollingWriter::create(
        config.directory.join(ERROR_LOG),
        MAX_LOG_BYTES,
        KEPT_ROTATIONS,
    )?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(combined),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(errors)
                .with_filter(LevelFilter::ERROR),
        )
        .try_init()?;

    Ok(())
}

/// Size-capped rotating file sink.
///
/// When a write would push the file past its cap, the file is renamed to
/// `<name>.1` (existing rotations shift up, the oldest beyond the keep
/// count is deleted) and a fresh file is started. Writers serialize on an
/// internal lock, which is all the coordination concurrently running
/// tests need.
#[derive(Debug, Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingWriter {
    /// Opens (or creates) the sink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub fn create(path: PathBuf, max_bytes: u64, keep: usize) -> io::Result<Self> {
        let inner = RollingFile::open(path, max_bytes, keep)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
        })
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RollingHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Write handle produced by [`RollingWriter`].
#[derive(Debug)]
pub struct RollingHandle {
    inner: Arc<Mutex<RollingFile>>,
}

impl Write for RollingHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

#[derive(Debug)]
struct RollingFile {
    path: PathBuf,
    max_bytes: u64,
    keep: usize,
    file: File,
    written: u64,
}

impl RollingFile {
    fn open(path: PathBuf, max_bytes: u64, keep: usize) -> io::Result<Self> {
        let file = append_to(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            keep,
            file,
            written,
        })
    }

    fn numbered(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("{}.{index}", self.path.display()))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = self.numbered(self.keep);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.keep).rev() {
            let from = self.numbered(index);
            if from.exists() {
                fs::rename(&from, self.numbered(index + 1))?;
            }
        }
        fs::rename(&self.path, self.numbered(1))?;

        self.file = append_to(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn append_to(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
