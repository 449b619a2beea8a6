//! Tracing configuration for VideoGate
//!
//! Logs go to stderr, which keeps stdout free for the participant-facing
//! console, and to a daily rolling file under the logs directory when it can
//! be created.

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "videogate.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for the workspace crates
/// - **Production**: info level
/// - HTTP internals are kept at warn either way
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        format!("videogate={level}"),
        format!("vg_app={level}"),
        format!("vg_infra={level}"),
    ]
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over the built-in directives. Passing
/// `None` for `logs_dir` disables the file layer.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(logs_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stderr_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match logs_dir.map(build_file_writer).transpose() {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
    };

    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stderr_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    if LOG_GUARD.set(guard).is_err() {
        anyhow::bail!("File logging already initialized");
    }

    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_directives_enable_debug_for_workspace_crates() {
        let directives = build_filter_directives(true);

        assert_eq!(directives[0], "debug");
        assert!(directives.contains(&"vg_app=debug".to_string()));
        assert!(directives.contains(&"vg_infra=debug".to_string()));
        assert!(directives.contains(&"reqwest=warn".to_string()));
    }

    #[test]
    fn release_directives_stay_at_info() {
        let directives = build_filter_directives(false);

        assert_eq!(directives[0], "info");
        assert!(directives.contains(&"videogate=info".to_string()));
        assert!(!directives.iter().any(|d| d.ends_with("=debug")));
    }

    #[test]
    fn directives_parse_as_env_filter() {
        let joined = build_filter_directives(true).join(",");

        assert!(tracing_subscriber::EnvFilter::try_new(joined).is_ok());
    }
}
