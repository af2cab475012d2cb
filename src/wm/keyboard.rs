//! Keyboard Module
//!
//! Key bindings, keysym resolution, and key grabs. The binding table is
//! built once at startup from the server's keyboard mapping and is
//! immutable afterwards. A keysym can resolve to several keycodes under a
//! layout (a key plus locked/shifted aliases), so lookup tests for
//! membership in the code set rather than equality against a single code.

use anyhow::{Context, Result};
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, GrabMode, Keycode, ModMask};
use x11rb::rust_connection::RustConnection;

use crate::wm::geometry::{Direction, ResizeEdge, SnapPreset};

/// Keysyms used by the default bindings (X11 keysymdef values).
mod keysyms {
    pub const XK_LEFT: u32 = 0xff51;
    pub const XK_UP: u32 = 0xff52;
    pub const XK_RIGHT: u32 = 0xff53;
    pub const XK_DOWN: u32 = 0xff54;
    pub const XK_RETURN: u32 = 0xff0d;
    pub const XK_D: u32 = 0x0064;
    pub const XK_F: u32 = 0x0066;
    pub const XK_G: u32 = 0x0067;
    pub const XK_H: u32 = 0x0068;
    pub const XK_J: u32 = 0x006a;
    pub const XK_K: u32 = 0x006b;
    pub const XK_L: u32 = 0x006c;
    pub const XK_Q: u32 = 0x0071;
}

/// Modifier bits, as delivered in key event state masks.
const MOD1: u16 = 1 << 3;
const LOCK: u16 = 1 << 1;
const MOD2: u16 = 1 << 4;

/// A logical window-manager command. Pure data; carries no protocol handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveWindow(Direction),
    ResizeWindow(ResizeEdge),
    ToggleFullscreen,
    SnapWindow(SnapPreset),
    CloseActiveWindow,
    LaunchTerminal,
    LaunchAppLauncher,
}

/// Default bindings, in dispatch priority order. All use the primary
/// modifier (Mod1/Alt). The resize mnemonics keep the edge each key moved
/// historically: H/J act on the top/bottom edges, K/L on the left/right.
const DEFAULT_BINDINGS: &[(u32, Command)] = &[
    (keysyms::XK_LEFT, Command::MoveWindow(Direction::Left)),
    (keysyms::XK_RIGHT, Command::MoveWindow(Direction::Right)),
    (keysyms::XK_UP, Command::MoveWindow(Direction::Up)),
    (keysyms::XK_DOWN, Command::MoveWindow(Direction::Down)),
    (keysyms::XK_H, Command::ResizeWindow(ResizeEdge::Top)),
    (keysyms::XK_J, Command::ResizeWindow(ResizeEdge::Bottom)),
    (keysyms::XK_K, Command::ResizeWindow(ResizeEdge::Left)),
    (keysyms::XK_L, Command::ResizeWindow(ResizeEdge::Right)),
    (keysyms::XK_RETURN, Command::LaunchTerminal),
    (keysyms::XK_D, Command::LaunchAppLauncher),
    (keysyms::XK_Q, Command::CloseActiveWindow),
    (keysyms::XK_F, Command::ToggleFullscreen),
    (keysyms::XK_G, Command::SnapWindow(SnapPreset::Centered)),
];

/// Snapshot of the server's keycode-to-keysym table.
pub struct KeymapSnapshot {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl KeymapSnapshot {
    pub fn new(min_keycode: Keycode, keysyms_per_keycode: u8, keysyms: Vec<u32>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    /// Fetch the current mapping from the server.
    pub fn fetch(conn: &RustConnection) -> Result<Self> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;

        let mapping = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)
            .context("Failed to request keyboard mapping")?
            .reply()
            .context("Failed to fetch keyboard mapping")?;

        Ok(Self::new(
            min_keycode,
            mapping.keysyms_per_keycode,
            mapping.keysyms,
        ))
    }

    /// All keycodes that can produce `keysym` under the current layout.
    pub fn keycodes_for(&self, keysym: u32) -> Vec<Keycode> {
        self.keysyms
            .chunks(self.keysyms_per_keycode as usize)
            .enumerate()
            .filter(|(_, chunk)| chunk.contains(&keysym))
            .map(|(i, _)| self.min_keycode + i as u8)
            .collect()
    }
}

/// One entry of the dispatch table.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// Keycodes that fire this binding
    pub codes: Vec<Keycode>,
    /// Command to execute
    pub command: Command,
}

/// The ordered key-binding dispatch table.
pub struct KeyTable {
    /// Required modifier bits (exact match)
    modifier: u16,
    /// Bindings in priority order; the first match fires
    bindings: Vec<KeyBinding>,
}

impl KeyTable {
    /// Build the table from the server mapping and grab every bound keycode
    /// on the root window so key presses reach the window manager first.
    pub fn new(conn: &RustConnection, root: u32) -> Result<Self> {
        let snapshot = KeymapSnapshot::fetch(conn)?;
        let table = Self::from_snapshot(&snapshot);
        table.grab(conn, root)?;
        Ok(table)
    }

    /// Resolve the default bindings against a mapping snapshot. Each keycode
    /// ends up in at most one binding: when layouts alias a code to several
    /// bound symbols, the earlier binding claims it.
    pub fn from_snapshot(snapshot: &KeymapSnapshot) -> Self {
        let mut claimed: Vec<Keycode> = Vec::new();
        let mut bindings = Vec::with_capacity(DEFAULT_BINDINGS.len());

        for &(keysym, command) in DEFAULT_BINDINGS {
            let codes: Vec<Keycode> = snapshot
                .keycodes_for(keysym)
                .into_iter()
                .filter(|code| !claimed.contains(code))
                .collect();
            if codes.is_empty() {
                warn!(
                    "no keycode for keysym 0x{:x}, {:?} is unbound",
                    keysym, command
                );
                continue;
            }
            claimed.extend(&codes);
            bindings.push(KeyBinding { codes, command });
        }

        Self {
            modifier: MOD1,
            bindings,
        }
    }

    /// Grab every bound keycode under the primary modifier.
    fn grab(&self, conn: &RustConnection, root: u32) -> Result<()> {
        for binding in &self.bindings {
            for &code in &binding.codes {
                conn.grab_key(
                    true,
                    root,
                    ModMask::from(self.modifier),
                    code,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )
                .context("Failed to grab key")?;
                debug!("grabbed keycode {} for {:?}", code, binding.command);
            }
        }
        conn.flush()?;
        Ok(())
    }

    /// Look up the command for a key press. The modifier state must match
    /// exactly, ignoring Caps Lock and Num Lock; the first binding whose
    /// code set contains the pressed keycode wins.
    pub fn lookup(&self, state: u16, keycode: Keycode) -> Option<Command> {
        if state & !(LOCK | MOD2) != self.modifier {
            return None;
        }
        self.bindings
            .iter()
            .find(|binding| binding.codes.contains(&keycode))
            .map(|binding| binding.command)
    }
}
