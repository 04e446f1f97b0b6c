use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Logger that writes to a rotating file and echoes to stderr
struct StockLogger {
    file_writer: Option<Arc<Mutex<RollingFileAppender>>>,
    file_level: LevelFilter,
    console_level: LevelFilter,
}

impl Log for StockLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        (self.file_writer.is_some() && metadata.level() <= self.file_level)
            || metadata.level() <= self.console_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let line = format_line(
            &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            level,
            &record.args().to_string(),
        );

        if level <= self.file_level {
            if let Some(writer) = &self.file_writer {
                if let Ok(mut writer) = writer.lock() {
                    let _ = writeln!(writer, "{}", line);
                }
            }
        }

        if level <= self.console_level {
            let _ = writeln!(std::io::stderr(), "{}", line);
        }
    }

    fn flush(&self) {
        // RollingFileAppender handles flushing automatically
    }
}

fn format_line(timestamp: &str, level: log::Level, message: &str) -> String {
    format!("{} [{}] {}", timestamp, level, message)
}

/// Parse log level string to LevelFilter
pub fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info, // Default to info
    }
}

/// Initialize the global logger
///
/// With `log_file_path` set, records at or above `file_level` go to a
/// daily-rotated file (3 kept). Records at or above `console_level` are
/// always echoed to stderr.
pub fn init_logger(
    log_file_path: Option<&Path>,
    file_level: &str,
    console_level: &str,
) -> Result<()> {
    let file_writer = match log_file_path {
        Some(path) => Some(Arc::new(Mutex::new(rolling_appender(path)?))),
        None => None,
    };

    let file_level = if file_writer.is_some() {
        parse_level(file_level)
    } else {
        LevelFilter::Off
    };
    let console_level = parse_level(console_level);

    let logger = StockLogger {
        file_writer,
        file_level,
        console_level,
    };

    let max_level = file_level.max(console_level);
    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(max_level);

    Ok(())
}

fn rolling_appender(log_file_path: &Path) -> Result<RollingFileAppender> {
    let parent = log_file_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path"))?;
    fs::create_dir_all(parent).context("Failed to create log directory")?;

    // tracing-appender has no size-based rotation, daily is close enough
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(
            log_file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("remnant-stock"),
        )
        .filename_suffix(
            log_file_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log"),
        )
        .build(parent)
        .context("Failed to create rotating file appender")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("2025-01-01 08:00:00", log::Level::Warn, "Manager access denied"),
            "2025-01-01 08:00:00 [WARN] Manager access denied"
        );
    }

    #[test]
    fn test_console_only_logger_filters_by_level() {
        let logger = StockLogger {
            file_writer: None,
            file_level: LevelFilter::Off,
            console_level: LevelFilter::Warn,
        };
        let warn = Metadata::builder().level(log::Level::Warn).build();
        let info = Metadata::builder().level(log::Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }
}
