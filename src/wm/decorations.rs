//! Decorations Module
//!
//! The border applier. Runs every tick and republishes border width and
//! color for every managed window from static configuration, then flushes.
//! The pass is idempotent; there is no change tracking. Per-window failures
//! are logged and skipped.

use anyhow::Result;
use tracing::warn;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ChangeWindowAttributesAux, ConfigureWindowAux, ConnectionExt};
use x11rb::rust_connection::RustConnection;

use crate::config::Config;
use crate::wm::WindowManager;

/// Re-apply border width and color to all managed windows. The active
/// window gets the active color, everything else the inactive one.
pub fn apply_borders(
    conn: &RustConnection,
    config: &Config,
    windows: &WindowManager,
) -> Result<()> {
    for client in windows.clients() {
        let color = if windows.is_active(client.window) {
            config.theme.active_window_color
        } else {
            config.theme.inactive_window_color
        };

        let result = conn
            .configure_window(
                client.window,
                &ConfigureWindowAux::new().border_width(config.theme.border_size),
            )
            .and_then(|_| {
                conn.change_window_attributes(
                    client.window,
                    &ChangeWindowAttributesAux::new().border_pixel(color),
                )
            });
        if let Err(err) = result {
            warn!("Failed to apply border to window {}: {}", client.window, err);
        }
    }
    conn.flush()?;
    Ok(())
}
