// User configuration: preferred difficulty, icon set, seed and logging.
// Persisted as TOML in the per-user config directory.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::xtm_game::Difficulty;

pub const APP_NAME: &str = "xtmines";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Difficulty used for the first game and for restarts
    pub difficulty: Difficulty,
    /// Use plain ASCII glyphs instead of symbols
    pub ascii_icons: bool,
    /// Fixed mine-layout seed; random when absent
    pub seed: Option<u64>,
    /// Where to write the log; logging is off when neither this nor
    /// XTMINES_LOG is set
    pub log_file: Option<PathBuf>,
    /// Filter directive used when XTMINES_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            difficulty: Difficulty::Easy,
            ascii_icons: false,
            seed: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

/// Config file location, e.g. ~/.config/xtmines/xtmines.toml on Linux.
/// Falls back to the current directory when no home directory is known.
pub fn config_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "xtmines", APP_NAME) {
        let mut path = proj.config_dir().to_path_buf();
        path.push(format!("{}.toml", APP_NAME));
        return Some(path);
    }
    env::current_dir().ok().map(|mut p| {
        p.push(format!("{}.toml", APP_NAME));
        p
    })
}

/// Default log location next to the config file
pub fn default_log_path() -> Option<PathBuf> {
    config_path().map(|p| p.with_extension("log"))
}

/// Read a config file. A missing or malformed file is an error here;
/// `load_or_create_config` decides how to recover.
pub fn read_config(path: &Path) -> io::Result<Config> {
    let s = fs::read_to_string(path)?;
    toml::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn write_config(path: &Path, cfg: &Config) -> io::Result<()> {
    let s = toml::to_string(cfg).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, s)
}

/// A problem met while loading. Loading happens before logging is set up,
/// so the caller reports it once a subscriber exists.
#[derive(Debug)]
pub enum LoadIssue {
    Unreadable { path: PathBuf, error: io::Error },
    DefaultNotWritten { path: PathBuf, error: io::Error },
}

impl LoadIssue {
    pub fn log(&self) {
        match self {
            LoadIssue::Unreadable { path, error } => {
                warn!(path = %path.display(), error = %error, "ignoring unreadable config");
            }
            LoadIssue::DefaultNotWritten { path, error } => {
                warn!(path = %path.display(), error = %error, "could not write default config");
            }
        }
    }
}

/// Load the user config, writing defaults on first run. Never fails:
/// unreadable files fall back to defaults and the problem is handed back.
pub fn load_or_create_config() -> (Config, Option<LoadIssue>) {
    match config_path() {
        Some(path) => load_or_create_at(&path),
        None => (Config::default(), None),
    }
}

pub fn load_or_create_at(path: &Path) -> (Config, Option<LoadIssue>) {
    if path.exists() {
        return match read_config(path) {
            Ok(cfg) => (cfg, None),
            Err(error) => (Config::default(), Some(LoadIssue::Unreadable { path: path.to_path_buf(), error })),
        };
    }
    let cfg = Config::default();
    let issue = write_config(path, &cfg)
        .err()
        .map(|error| LoadIssue::DefaultNotWritten { path: path.to_path_buf(), error });
    (cfg, issue)
}

/// Persist the config, logging instead of failing
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        if let Err(e) = write_config(&path, cfg) {
            warn!(path = %path.display(), error = %e, "could not save config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let cfg: Config = toml::from_str("difficulty = \"Hard\"\n").unwrap();
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert!(!cfg.ascii_icons);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let res: Result<Config, _> = toml::from_str("difficulty = \"Expert\"\n");
        assert!(res.is_err());
    }

    #[test]
    fn round_trip_through_file() {
        let dir = env::temp_dir().join(format!("{}-cfg-{}", APP_NAME, std::process::id()));
        let path = dir.join("test.toml");
        let cfg = Config {
            difficulty: Difficulty::Medium,
            ascii_icons: true,
            seed: Some(99),
            log_file: Some(PathBuf::from("/tmp/xtmines.log")),
            log_level: "debug".to_string(),
        };
        write_config(&path, &cfg).unwrap();
        assert_eq!(read_config(&path).unwrap(), cfg);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = env::temp_dir().join(format!("{}-bad-{}", APP_NAME, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        fs::write(&path, "difficulty = [").unwrap();
        assert_eq!(read_config(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_falls_back_and_reports() {
        let dir = env::temp_dir().join(format!("{}-load-bad-{}", APP_NAME, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        fs::write(&path, "difficulty = [").unwrap();
        let (cfg, issue) = load_or_create_at(&path);
        assert_eq!(cfg, Config::default());
        match issue {
            Some(LoadIssue::Unreadable { path: p, error }) => {
                assert_eq!(p, path);
                assert_eq!(error.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("expected an unreadable-config issue, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn first_run_writes_defaults_quietly() {
        let dir = env::temp_dir().join(format!("{}-load-new-{}", APP_NAME, std::process::id()));
        let path = dir.join("fresh.toml");
        let _ = fs::remove_dir_all(&dir);
        let (cfg, issue) = load_or_create_at(&path);
        assert!(issue.is_none());
        assert_eq!(cfg, Config::default());
        assert_eq!(read_config(&path).unwrap(), cfg);
        let _ = fs::remove_dir_all(&dir);
    }
}
