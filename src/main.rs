//! driftwm
//!
//! A minimal floating window manager for X11: maps windows as they ask for
//! it, keeps them in a registry with a single active window, and mutates
//! geometry from keyboard commands, all driven by one poll-based loop.

mod config;
mod error;
mod spawn;
mod wm;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use x11rb::protocol::xproto::{ChangeWindowAttributesAux, ConnectionExt, EventMask};
use x11rb::rust_connection::RustConnection;

use config::Config;
use wm::WindowManager;
use wm::keyboard::KeyTable;
use wm::screen::ScreenInfo;

/// Sleep between loop iterations. Short enough to keep input latency low,
/// long enough to bound CPU usage.
const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Main application state
struct App {
    conn: RustConnection,
    screen: ScreenInfo,
    config: Config,
    keys: KeyTable,
    windows: WindowManager,
}

impl App {
    fn new() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;

        let (conn, screen_num) =
            x11rb::connect(None).context("Failed to connect to X server")?;
        let screen = ScreenInfo::new(&conn, screen_num);
        info!(
            "Connected to X server, screen {}, root window {}",
            screen_num, screen.root
        );
        info!("Screen size: {}x{}", screen.width, screen.height);

        // Redirect map requests and watch substructure changes on the root.
        // Only one client may hold SubstructureRedirect at a time.
        conn.change_window_attributes(
            screen.root,
            &ChangeWindowAttributesAux::new()
                .event_mask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY),
        )?
        .check()
        .context("Failed to select events on root window - is another WM running?")?;

        let keys = KeyTable::new(&conn, screen.root).context("Failed to set up key bindings")?;

        spawn::run_startup(&config);

        Ok(Self {
            conn,
            screen,
            config,
            keys,
            windows: WindowManager::new(),
        })
    }

    /// One loop iteration: dispatch at most one event, re-select an active
    /// window if none is set, then republish borders.
    fn tick(&mut self) -> Result<()> {
        wm::events::dispatch_pending(
            &self.conn,
            &self.screen,
            &self.config,
            &mut self.windows,
            &self.keys,
        )?;
        self.windows.ensure_active_fallback();
        wm::decorations::apply_borders(&self.conn, &self.config, &self.windows)?;
        Ok(())
    }

    /// Run forever. An error escaping one tick is logged and the loop
    /// continues on the next tick; the process never exits over a single
    /// bad event.
    fn run(mut self) -> Result<()> {
        info!("Starting main event loop");
        loop {
            if let Err(err) = self.tick() {
                error!("Error handling tick: {err:#}");
            }
            std::thread::sleep(TICK_INTERVAL);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "driftwm=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting driftwm");

    App::new()?.run()
}
