//! Screen Module
//!
//! A snapshot of the screen the manager runs on: root window and display
//! dimensions, taken once at connect time.

use x11rb::connection::Connection;
use x11rb::rust_connection::RustConnection;

/// Root window and display geometry.
#[derive(Debug, Clone, Copy)]
pub struct ScreenInfo {
    /// Root window ID
    pub root: u32,

    /// Display width in pixels
    pub width: u16,

    /// Display height in pixels
    pub height: u16,
}

impl ScreenInfo {
    pub fn new(conn: &RustConnection, screen_num: usize) -> Self {
        let screen = &conn.setup().roots[screen_num];
        Self {
            root: screen.root,
            width: screen.width_in_pixels,
            height: screen.height_in_pixels,
        }
    }
}
