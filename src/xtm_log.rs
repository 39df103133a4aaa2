// Opt-in file logging. The terminal UI owns stdout and stderr, so log
// lines only ever go to a file.

use std::env;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::xtm_config::{Config, default_log_path};

/// Environment variable holding an `EnvFilter` directive, e.g. `debug`
pub const LOG_ENV: &str = "XTMINES_LOG";

/// Where logs should go, or `None` when logging is not requested
pub fn log_target(cfg: &Config) -> Option<PathBuf> {
    match (&cfg.log_file, env::var_os(LOG_ENV)) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(_)) => default_log_path(),
        (None, None) => None,
    }
}

/// Install the global subscriber when logging was requested.
/// Returns the file being written to.
pub fn init_logging(cfg: &Config) -> io::Result<Option<PathBuf>> {
    let Some(path) = log_target(cfg) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_file_wins() {
        let cfg = Config { log_file: Some(PathBuf::from("/var/tmp/mines.log")), ..Config::default() };
        assert_eq!(log_target(&cfg), Some(PathBuf::from("/var/tmp/mines.log")));
    }
}
