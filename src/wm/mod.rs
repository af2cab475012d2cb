//! Window Manager Module
//!
//! The window registry and the active-window policy. Windows are kept in
//! insertion order; the active window is a lookup key into the registry,
//! never an owning handle, so removing a window can never leave the key
//! dangling at a freed entry.

pub mod client;
pub mod decorations;
pub mod events;
pub mod geometry;
pub mod keyboard;
pub mod screen;

use anyhow::{Context, Result};
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt};
use x11rb::rust_connection::RustConnection;

use crate::spawn;
use client::Client;
use geometry::Geometry;

pub struct WindowManager {
    /// Managed windows, in registration order
    windows: Vec<Client>,

    /// Window ID of the active window, if any
    active: Option<u32>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            active: None,
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.windows
    }

    pub fn contains(&self, window: u32) -> bool {
        self.windows.iter().any(|c| c.window == window)
    }

    pub fn is_active(&self, window: u32) -> bool {
        self.active == Some(window)
    }

    /// The active window, or `None`. An empty result is a valid state, not
    /// an error; callers skip their mutation and move on.
    pub fn active_client(&self) -> Option<&Client> {
        let id = self.active?;
        self.windows.iter().find(|c| c.window == id)
    }

    pub fn active_client_mut(&mut self) -> Option<&mut Client> {
        let id = self.active?;
        self.windows.iter_mut().find(|c| c.window == id)
    }

    /// Add a window to the registry and make it active. Registering an
    /// already-managed window is a no-op.
    pub fn track(&mut self, client: Client) {
        if self.contains(client.window) {
            debug!("window {} is already managed", client.window);
            return;
        }
        self.active = Some(client.window);
        self.windows.push(client);
    }

    /// Drop a window from the registry, clearing the active key if it
    /// pointed at this window.
    pub fn untrack(&mut self, window: u32) {
        self.windows.retain(|c| c.window != window);
        if self.active == Some(window) {
            self.active = None;
        }
    }

    /// Promote the most recently registered window when nothing is active.
    /// Runs once per tick from the main loop.
    pub fn ensure_active_fallback(&mut self) {
        if self.active.is_none() {
            if let Some(client) = self.windows.last() {
                debug!("no active window, falling back to {}", client.window);
                self.active = Some(client.window);
            }
        }
    }

    /// Start managing a window in response to a map request: map it, record
    /// its title and geometry, and make it active.
    pub fn register(&mut self, conn: &RustConnection, window: u32) -> Result<()> {
        if self.contains(window) {
            debug!("ignoring map request for already-managed window {}", window);
            return Ok(());
        }

        let title = fetch_title(conn, window).unwrap_or_default();
        let geometry = fetch_geometry(conn, window)?;
        conn.map_window(window).context("Failed to map window")?;
        conn.flush()?;

        info!("managing window {} ({:?})", window, title);
        self.track(Client::new(window, geometry, title));
        Ok(())
    }

    /// Close the active window: ask the owning process to terminate, destroy
    /// the handle, and drop it from the registry. A no-op when nothing is
    /// active.
    pub fn close_active(&mut self, conn: &RustConnection) -> Result<()> {
        let Some(client) = self.active_client() else {
            debug!("close requested with no active window");
            return Ok(());
        };
        let window = client.window;
        let title = client.title.clone();

        // The owning process is matched by window title, not by protocol
        // identifier; the explicit destroy reclaims the handle either way.
        if !title.is_empty() {
            spawn::spawn("killall", &[&title]);
        }
        conn.destroy_window(window)
            .context("Failed to destroy window")?;
        conn.flush()?;

        self.untrack(window);
        info!("closed window {} ({:?})", window, title);
        Ok(())
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read WM_NAME from a window.
fn fetch_title(conn: &RustConnection, window: u32) -> Option<String> {
    let reply = conn
        .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::STRING, 0, 1024)
        .ok()?
        .reply()
        .ok()?;
    Some(String::from_utf8_lossy(&reply.value).into_owned())
}

/// Query a window's rectangle from the server, used once at registration.
fn fetch_geometry(conn: &RustConnection, window: u32) -> Result<Geometry> {
    let reply = conn
        .get_geometry(window)
        .context("Failed to request window geometry")?
        .reply()
        .context("Failed to query window geometry")?;
    Ok(Geometry {
        x: i32::from(reply.x),
        y: i32::from(reply.y),
        width: u32::from(reply.width),
        height: u32::from(reply.height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(window: u32) -> Client {
        Client::new(
            window,
            Geometry {
                x: 0,
                y: 0,
                width: 640,
                height: 480,
            },
            format!("window-{window}"),
        )
    }

    #[test]
    fn tracking_sets_active_last_registered_wins() {
        let mut wm = WindowManager::new();
        wm.track(client(1));
        assert!(wm.is_active(1));
        wm.track(client(2));
        assert!(wm.is_active(2));
        assert_eq!(wm.clients().len(), 2);
    }

    #[test]
    fn tracking_twice_is_a_noop() {
        let mut wm = WindowManager::new();
        wm.track(client(1));
        wm.track(client(2));
        wm.track(client(1));
        assert_eq!(wm.clients().len(), 2);
        // A duplicate registration must not steal the active window either.
        assert!(wm.is_active(2));
    }

    #[test]
    fn untracking_active_clears_active() {
        let mut wm = WindowManager::new();
        wm.track(client(1));
        wm.track(client(2));
        wm.untrack(2);
        assert!(wm.active_client().is_none());
        assert_eq!(wm.clients().len(), 1);
    }

    #[test]
    fn untracking_inactive_leaves_active_unchanged() {
        let mut wm = WindowManager::new();
        wm.track(client(1));
        wm.track(client(2));
        wm.untrack(1);
        assert!(wm.is_active(2));
    }

    #[test]
    fn active_is_never_dangling() {
        let mut wm = WindowManager::new();
        wm.track(client(1));
        wm.track(client(2));
        wm.track(client(3));
        wm.untrack(3);
        wm.untrack(1);
        if let Some(active) = wm.active_client() {
            assert!(wm.contains(active.window));
        }
        wm.ensure_active_fallback();
        let active = wm.active_client().expect("fallback should select a window");
        assert!(wm.contains(active.window));
    }

    #[test]
    fn fallback_promotes_most_recently_registered() {
        let mut wm = WindowManager::new();
        wm.track(client(1));
        wm.track(client(2));
        wm.track(client(3));
        wm.untrack(3);
        wm.ensure_active_fallback();
        assert!(wm.is_active(2));
    }

    #[test]
    fn fallback_on_empty_registry_stays_empty() {
        let mut wm = WindowManager::new();
        wm.ensure_active_fallback();
        assert!(wm.active_client().is_none());
    }

    #[test]
    fn mutation_without_active_window_is_silent_noop() {
        let mut wm = WindowManager::new();
        assert!(wm.active_client_mut().is_none());
        wm.untrack(99);
        assert!(wm.clients().is_empty());
        assert!(wm.active_client().is_none());
    }

    #[test]
    fn register_close_scenario() {
        // map A -> [A], active A; map B -> [A, B], active B;
        // close B -> [A], active empty until the tick fallback runs.
        let mut wm = WindowManager::new();
        wm.track(client(10));
        assert!(wm.is_active(10));
        wm.track(client(20));
        assert!(wm.is_active(20));

        wm.untrack(20);
        assert_eq!(wm.clients().len(), 1);
        assert!(wm.active_client().is_none());

        wm.ensure_active_fallback();
        assert!(wm.is_active(10));
    }
}
