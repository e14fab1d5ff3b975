// Logging setup
//
// `RUST_LOG` controls filtering (default `info`). When BIKE_DASHBOARD_LOG_DIR
// is set, logs go to `<dir>/<app>.log` with daily rotation instead of stdout.

use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn rotating_file_writer(app_name: &'static str) -> Option<BoxMakeWriter> {
    let dir = std::path::PathBuf::from(std::env::var_os("BIKE_DASHBOARD_LOG_DIR")?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create log dir {}: {}", dir.display(), err);
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Subscriber for the web server and report mode
pub fn init_tracing(app_name: &'static str) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    if let Some(writer) = rotating_file_writer(app_name) {
        let _ = builder.with_writer(writer).with_ansi(false).try_init();
    } else {
        let _ = builder.try_init();
    }
}

/// Subscriber for the terminal UI. Console output would corrupt the
/// alternate screen, so without a log dir everything is dropped.
pub fn init_tui_tracing(app_name: &'static str) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    match rotating_file_writer(app_name) {
        Some(writer) => {
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::sink).try_init();
        }
    }
}
