use std::{
    fs::{create_dir_all, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Terminal logging, plus `<log_dir>/consolidate_<timestamp>.log` when a log
/// directory is given. Returns the log file path if one was opened.
pub fn init(log_dir: Option<&Path>, quiet: bool) -> Result<Option<PathBuf>> {
    let term_level = if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    let mut log_path = None;
    if let Some(dir) = log_dir {
        create_dir_all(dir).with_context(|| format!("creating log directory {}", dir.display()))?;
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("consolidate_{ts}.log"));
        let file = File::create(&path).with_context(|| format!("opening {}", path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Info, Config::default(), file));
        log_path = Some(path);
    }

    CombinedLogger::init(loggers).context("initialising logger")?;
    Ok(log_path)
}
