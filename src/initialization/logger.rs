//! Logger initialization.
//!
//! Log lines always go to stderr: stdout is reserved for the aggregated JSON.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the global logger with the specified level and format.
///
/// `RUST_LOG` is read first and `level` then overrides it, so
/// `RUST_LOG=reqwest=debug` still works for transport-level debugging while
/// `--log-level` controls this crate's own output.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a global logger is already set.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug http_request_aggregator uris.txt
/// http_request_aggregator uris.txt --log-level debug --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);
    build_logger(level, format)
        .try_init()
        .map_err(InitializationError::from)?;
    Ok(())
}

fn build_logger(level: LevelFilter, format: LogFormat) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    // Connection-pool chatter from the HTTP stack is capped at info
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("http_request_aggregator", level);
    builder.target(env_logger::Target::Stderr);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_log_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };
                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    builder
}

/// Renders one structured log line. `msg` is JSON-escaped.
fn json_log_line(ts_millis: i64, level: log::Level, target: &str, msg: &str) -> String {
    format!(
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        ts_millis,
        level,
        target,
        serde_json::to_string(msg).unwrap_or_else(|_| "\"\"".into())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_log_line_is_valid_json() {
        let line = json_log_line(
            1_700_000_000_000,
            log::Level::Warn,
            "http_request_aggregator::run",
            "body from \"http://x\" has\na newline",
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid JSON");
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["target"], "http_request_aggregator::run");
        assert_eq!(parsed["msg"], "body from \"http://x\" has\na newline");
    }

    #[test]
    fn test_build_logger_all_formats() {
        // Building never touches the global logger, so it can run repeatedly
        for format in [LogFormat::Plain, LogFormat::Json] {
            let _ = build_logger(LevelFilter::Debug, format).build();
        }
    }

    #[test]
    fn test_second_initialization_reports_error() {
        let _ = env_logger::try_init();

        // The global logger is already set at this point
        let result = init_logger_with(LevelFilter::Info, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
