#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::Once;

#[cfg(feature = "trace")]
static INIT: Once = Once::new();

/// Flushes buffered trace events when dropped.
#[cfg(feature = "trace")]
pub type TraceGuard = tracing_appender::non_blocking::WorkerGuard;

#[cfg(not(feature = "trace"))]
#[derive(Debug)]
pub struct TraceGuard;

/// Install a JSON tracing subscriber. With `log_dir` the events go to
/// `translit-trace.jsonl` in that directory, otherwise to stderr.
///
/// The returned guard must outlive all tracing; the file writer is flushed
/// when it drops. Only the first call installs anything.
#[cfg(feature = "trace")]
#[must_use = "dropping the guard stops the file writer"]
pub fn init_tracing(log_dir: Option<&Path>) -> Option<TraceGuard> {
    let mut guard = None;
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("it_translit=debug"));
        let builder = tracing_subscriber::fmt()
            .json()
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(filter);

        match log_dir {
            Some(dir) => {
                let file_appender = tracing_appender::rolling::never(dir, "translit-trace.jsonl");
                let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
                guard = Some(worker);
                builder.with_writer(non_blocking).init();
            }
            None => builder.with_writer(std::io::stderr).init(),
        }
    });
    guard
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: Option<&std::path::Path>) -> Option<TraceGuard> {
    None
}
