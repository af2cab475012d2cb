//! Process spawning
//!
//! Fire-and-forget launching of external programs. Children are never
//! waited on and never feed results back into window-manager state;
//! failures are logged and swallowed.

use std::process::Command;
use tracing::{debug, info, warn};

use crate::config::{Config, NO_WALLPAPER};

/// Spawn a program with arguments. Best-effort; a failure only produces a
/// log line.
pub fn spawn(program: &str, args: &[&str]) {
    match Command::new(program).args(args).spawn() {
        Ok(child) => debug!("spawned {} (pid {})", program, child.id()),
        Err(err) => warn!("failed to spawn {}: {}", program, err),
    }
}

/// Spawn a whitespace-separated command line, e.g. a configured terminal
/// with flags.
pub fn spawn_line(line: &str) {
    let mut parts = line.split_whitespace();
    let Some(program) = parts.next() else {
        warn!("refusing to spawn empty command line");
        return;
    };
    let args: Vec<&str> = parts.collect();
    spawn(program, &args);
}

/// One-shot startup side effects: the startup script, the keyboard layout,
/// and the wallpaper.
pub fn run_startup(config: &Config) {
    info!(
        "defaults: terminal={}, browser={}",
        config.defaults.terminal, config.defaults.browser
    );

    spawn(
        &config.options.startup_script_command,
        &[&config.options.startup_script_path],
    );
    spawn("setxkbmap", &["-layout", &config.options.keymap]);

    if config.theme.wallpaper != NO_WALLPAPER {
        spawn("feh", &["--bg-scale", &config.theme.wallpaper]);
    }
}
