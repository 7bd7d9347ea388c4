//! Tracing subscriber setup.

use configuration::{LogFormat, LoggingSettings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Name of the log file written when `logging.directory` is configured.
pub const LOG_FILE: &str = "gradebook.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so they stay out of the menu on stdout, or to `LOG_FILE` in the configured
/// directory. The returned guard must be held until shutdown so buffered file
/// output is flushed.
pub fn init(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::never(directory, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            install(filter, settings.format, writer, false)?;
            Ok(Some(guard))
        }
        None => {
            install(filter, settings.format, std::io::stderr, true)?;
            Ok(None)
        }
    }
}

fn install<W>(filter: EnvFilter, format: LogFormat, writer: W, ansi: bool) -> anyhow::Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);
    let installed = match format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install the tracing subscriber: {e}"))
}
