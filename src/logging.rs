//! Logger setup for the command line binary.
//!
//! Terminal output at info level (debug with `verbose`), plus a debug-level
//! file log when a path is given.

use std::fs::{self, File};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::core::{Result, SimError};

pub fn init(file: Option<&Path>, verbose: bool) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let term_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, File::create(path)?));
    }

    CombinedLogger::init(loggers)
        .map_err(|e| SimError::InvalidConfig(format!("logger already initialised: {e}")))
}
