//! Events Module
//!
//! The poll-based event dispatcher. One tick drains at most one protocol
//! event: `MapRequest` goes to window registration, `KeyPress` through the
//! binding table to command execution, `DestroyNotify` drops the window
//! from the registry. Everything else is ignored.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{ConfigureWindowAux, ConnectionExt};
use x11rb::rust_connection::RustConnection;

use crate::config::Config;
use crate::spawn;
use crate::wm::WindowManager;
use crate::wm::geometry::{self, Geometry, SnapPreset};
use crate::wm::keyboard::{Command, KeyTable};
use crate::wm::screen::ScreenInfo;

/// Handle at most one pending event. Returns immediately when the queue is
/// empty so the surrounding loop keeps control; bursts are worked off one
/// event per tick.
pub fn dispatch_pending(
    conn: &RustConnection,
    screen: &ScreenInfo,
    config: &Config,
    windows: &mut WindowManager,
    keys: &KeyTable,
) -> Result<()> {
    let Some(event) = conn.poll_for_event()? else {
        return Ok(());
    };

    match event {
        Event::MapRequest(e) => {
            info!("MapRequest for window {}", e.window);
            if let Err(err) = windows.register(conn, e.window) {
                warn!("Failed to manage window {}: {err:#}", e.window);
            }
        }

        Event::KeyPress(e) => {
            debug!("KeyPress: keycode {}, state {:?}", e.detail, e.state);
            match keys.lookup(u16::from(e.state), e.detail) {
                Some(command) => run_command(conn, screen, config, windows, command)?,
                None => debug!("no binding for keycode {}", e.detail),
            }
        }

        Event::DestroyNotify(e) => {
            if windows.contains(e.window) {
                debug!("DestroyNotify for managed window {}", e.window);
                windows.untrack(e.window);
            }
        }

        // Uninteresting kinds the root event mask still delivers.
        Event::KeyRelease(_)
        | Event::CreateNotify(_)
        | Event::MapNotify(_)
        | Event::UnmapNotify(_)
        | Event::ConfigureNotify(_)
        | Event::ConfigureRequest(_)
        | Event::ClientMessage(_)
        | Event::MappingNotify(_)
        | Event::ReparentNotify(_) => {}

        other => debug!("ignoring event {:?}", other),
    }

    Ok(())
}

/// Execute one command against the current state.
fn run_command(
    conn: &RustConnection,
    screen: &ScreenInfo,
    config: &Config,
    windows: &mut WindowManager,
    command: Command,
) -> Result<()> {
    debug!("executing {:?}", command);
    match command {
        Command::MoveWindow(direction) => {
            apply_geometry(conn, windows, |rect| geometry::moved(rect, direction))
        }
        Command::ResizeWindow(edge) => {
            apply_geometry(conn, windows, |rect| geometry::resized(rect, edge))
        }
        Command::SnapWindow(preset) => snap_window(conn, screen, windows, preset),
        Command::ToggleFullscreen => toggle_fullscreen(conn, screen, windows),
        Command::CloseActiveWindow => {
            if let Err(err) = windows.close_active(conn) {
                warn!("Failed to close window: {err:#}");
            }
            Ok(())
        }
        Command::LaunchTerminal => {
            spawn::spawn_line(&config.defaults.terminal);
            Ok(())
        }
        Command::LaunchAppLauncher => {
            spawn::spawn("rofi", &["-show", "run"]);
            Ok(())
        }
    }
}

/// Transform the active window's rectangle and push the result. Silently a
/// no-op when nothing is active.
///
/// The tracked rectangle is authoritative: clients cannot reconfigure
/// themselves while ConfigureRequest is ignored, so only these commands
/// ever change a managed window's geometry.
fn apply_geometry(
    conn: &RustConnection,
    windows: &mut WindowManager,
    transform: impl FnOnce(Geometry) -> Geometry,
) -> Result<()> {
    let Some(client) = windows.active_client_mut() else {
        debug!("geometry command ignored, no active window");
        return Ok(());
    };

    let next = transform(client.geometry);
    configure(conn, client.window, next)?;
    client.geometry = next;
    Ok(())
}

/// Overwrite the active window with a preset rectangle. Snapping keeps no
/// memory of the previous rectangle.
fn snap_window(
    conn: &RustConnection,
    screen: &ScreenInfo,
    windows: &mut WindowManager,
    preset: SnapPreset,
) -> Result<()> {
    let Some(client) = windows.active_client_mut() else {
        debug!("snap ignored, no active window");
        return Ok(());
    };

    let target = geometry::snapped(preset, u32::from(screen.width), u32::from(screen.height));
    configure(conn, client.window, target)?;
    client.geometry = target;
    client.fullscreen = false;
    client.restore_geometry = None;
    Ok(())
}

/// Fullscreen the active window, saving its rectangle so a second press
/// restores it.
fn toggle_fullscreen(
    conn: &RustConnection,
    screen: &ScreenInfo,
    windows: &mut WindowManager,
) -> Result<()> {
    let Some(client) = windows.active_client_mut() else {
        debug!("fullscreen toggle ignored, no active window");
        return Ok(());
    };

    if client.fullscreen {
        let target = client.restore_geometry.take().unwrap_or_else(|| {
            geometry::snapped(
                SnapPreset::Centered,
                u32::from(screen.width),
                u32::from(screen.height),
            )
        });
        configure(conn, client.window, target)?;
        client.geometry = target;
        client.fullscreen = false;
        info!("window {} left fullscreen", client.window);
    } else {
        let target = geometry::snapped(
            SnapPreset::Full,
            u32::from(screen.width),
            u32::from(screen.height),
        );
        configure(conn, client.window, target)?;
        client.restore_geometry = Some(client.geometry);
        client.geometry = target;
        client.fullscreen = true;
        info!("window {} entered fullscreen", client.window);
    }
    Ok(())
}

/// Push a rectangle to the server.
fn configure(conn: &RustConnection, window: u32, rect: Geometry) -> Result<()> {
    conn.configure_window(
        window,
        &ConfigureWindowAux::new()
            .x(rect.x)
            .y(rect.y)
            .width(rect.width)
            .height(rect.height),
    )
    .context("Failed to configure window")?;
    conn.flush()?;
    Ok(())
}
