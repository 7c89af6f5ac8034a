//! log4rs setup.

use crate::error::SyncError;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

/// Timestamp, level, thread and message, one line per record.
pub const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)}:{l}:{T}:{m}{n}";

/// Initialise logging from `config_file`, or a console logger at info level
/// when the file does not exist.
pub fn init(config_file: &Path) -> Result<(), SyncError> {
    if config_file.exists() {
        return log4rs::init_file(config_file, Default::default()).map_err(|e| {
            SyncError::Config(format!(
                "Error initializing log4rs from {}: {e}",
                config_file.display()
            ))
        });
    }

    let config = console_config(LevelFilter::Info)?;
    log4rs::init_config(config)
        .map(|_| ())
        .map_err(|e| SyncError::Config(format!("Error initializing log4rs: {e}")))?;
    log::debug!("No {} found, logging to console", config_file.display());
    Ok(())
}

fn console_config(level: LevelFilter) -> Result<Config, SyncError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|e| SyncError::Config(format!("Error building log config: {e}")))
}
