// Entry point for the terminal Minesweeper
// Loads configuration, sets up optional logging, and runs the UI loop

use std::error::Error;
use tracing::info;

mod xtm_color; // Terminal colour depth and board palette
mod xtm_ui;    // Terminal rendering and input handling

use xtm_ui::run as run_ui;
use xtmines::xtm_config::{config_path, load_or_create_config};
use xtmines::xtm_log::init_logging;

fn main() -> Result<(), Box<dyn Error>> {
    // Preferred difficulty, icon set, seed and log settings
    let (mut cfg, load_issue) = load_or_create_config();

    if let Some(log) = init_logging(&cfg)? {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            log = %log.display(),
            config = ?config_path(),
            difficulty = %cfg.difficulty,
            "starting"
        );
    }
    // reported only now that a subscriber may be listening
    if let Some(issue) = load_issue {
        issue.log();
    }

    run_ui(&mut cfg)
}
