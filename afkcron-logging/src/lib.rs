mod format;

pub use format::{CTIME_FORMAT, CtimeFormat};

use afkcron_core::Result;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Append-only log file. Writes go straight to the file descriptor, so
/// every event is on disk as soon as it is logged.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: File,
}

impl LogSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.file
    }
}

/// Layer writing `<timestamp>: <message>` lines to `sink`.
pub fn file_layer<S>(sink: LogSink) -> fmt::Layer<S, DefaultFields, CtimeFormat, LogSink>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .event_format(CtimeFormat)
        .with_ansi(false)
        .with_writer(sink)
}

/// Installs the global subscriber: stderr always, plus `sink` when given.
/// Level comes from `RUST_LOG`, defaulting to `info`.
pub fn init(sink: Option<LogSink>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(sink.map(file_layer))
        .try_init()
        .map_err(|e| afkcron_core::Error::Other(anyhow::Error::new(e)))
}
