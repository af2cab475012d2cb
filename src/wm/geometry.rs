//! Geometry Engine
//!
//! Pure rectangle transformations for the keyboard-driven window commands.
//! Nothing in here touches the X11 connection; callers fetch the current
//! rectangle, run it through one of these functions, and push the result
//! back to the server.

/// Translation step for moves, in pixels.
pub const MOVE_STEP: i32 = 5;

/// Size step for edge resizes, in pixels.
pub const RESIZE_STEP: u32 = 5;

/// Width of the centered snap preset.
pub const CENTERED_WIDTH: u32 = 1000;

/// Height of the centered snap preset.
pub const CENTERED_HEIGHT: u32 = 800;

/// A window rectangle in root-window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Direction for window moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Which edge of the window a resize acts on.
///
/// A resize adjusts exactly one dimension and keeps the opposite edge fixed,
/// so the window appears anchored while the named edge moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Hardcoded snap targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapPreset {
    /// Full display dimensions at the origin.
    Full,
    /// Fixed smaller size at the origin.
    Centered,
}

/// Translate the rectangle by one step in the given direction.
///
/// There is no clamping against the screen edges; a window may be moved
/// entirely off-screen.
pub fn moved(rect: Geometry, direction: Direction) -> Geometry {
    match direction {
        Direction::Left => Geometry {
            x: rect.x - MOVE_STEP,
            ..rect
        },
        Direction::Right => Geometry {
            x: rect.x + MOVE_STEP,
            ..rect
        },
        Direction::Up => Geometry {
            y: rect.y - MOVE_STEP,
            ..rect
        },
        Direction::Down => Geometry {
            y: rect.y + MOVE_STEP,
            ..rect
        },
    }
}

/// Resize by one step, anchored at the edge opposite to `edge`.
///
/// `Left` and `Top` shrink the window (the named edge moves inward, the
/// origin follows so the far edge stays put); `Right` and `Bottom` grow it
/// (the origin is the anchor). Shrinks saturate instead of underflowing.
pub fn resized(rect: Geometry, edge: ResizeEdge) -> Geometry {
    let shift = RESIZE_STEP as i32;
    match edge {
        ResizeEdge::Left => Geometry {
            x: rect.x + shift,
            width: rect.width.saturating_sub(RESIZE_STEP),
            ..rect
        },
        ResizeEdge::Right => Geometry {
            width: rect.width + RESIZE_STEP,
            ..rect
        },
        ResizeEdge::Top => Geometry {
            y: rect.y + shift,
            height: rect.height.saturating_sub(RESIZE_STEP),
            ..rect
        },
        ResizeEdge::Bottom => Geometry {
            height: rect.height + RESIZE_STEP,
            ..rect
        },
    }
}

/// Rectangle for a snap preset. Applied verbatim, discarding prior geometry.
pub fn snapped(preset: SnapPreset, screen_width: u32, screen_height: u32) -> Geometry {
    match preset {
        SnapPreset::Full => Geometry {
            x: 0,
            y: 0,
            width: screen_width,
            height: screen_height,
        },
        SnapPreset::Centered => Geometry {
            x: 0,
            y: 0,
            width: CENTERED_WIDTH,
            height: CENTERED_HEIGHT,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, width: u32, height: u32) -> Geometry {
        Geometry {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn move_translates_one_axis() {
        let start = rect(100, 50, 200, 80);
        assert_eq!(moved(start, Direction::Left), rect(95, 50, 200, 80));
        assert_eq!(moved(start, Direction::Right), rect(105, 50, 200, 80));
        assert_eq!(moved(start, Direction::Up), rect(100, 45, 200, 80));
        assert_eq!(moved(start, Direction::Down), rect(100, 55, 200, 80));
    }

    #[test]
    fn move_allows_offscreen_coordinates() {
        let start = rect(0, 0, 200, 80);
        assert_eq!(moved(start, Direction::Left), rect(-5, 0, 200, 80));
        assert_eq!(moved(start, Direction::Up), rect(0, -5, 200, 80));
    }

    #[test]
    fn resize_left_keeps_right_edge_fixed() {
        let start = rect(100, 50, 200, 80);
        let out = resized(start, ResizeEdge::Left);
        assert_eq!(out, rect(105, 50, 195, 80));
        assert_eq!(out.x + out.width as i32, start.x + start.width as i32);
    }

    #[test]
    fn resize_right_keeps_left_edge_fixed() {
        let out = resized(rect(100, 50, 200, 80), ResizeEdge::Right);
        assert_eq!(out, rect(100, 50, 205, 80));
    }

    #[test]
    fn resize_top_keeps_bottom_edge_fixed() {
        let start = rect(100, 50, 200, 80);
        let out = resized(start, ResizeEdge::Top);
        assert_eq!(out, rect(100, 55, 200, 75));
        assert_eq!(out.y + out.height as i32, start.y + start.height as i32);
    }

    #[test]
    fn resize_bottom_keeps_top_edge_fixed() {
        let out = resized(rect(100, 50, 200, 80), ResizeEdge::Bottom);
        assert_eq!(out, rect(100, 50, 200, 85));
    }

    #[test]
    fn resize_shrink_saturates_at_zero() {
        let out = resized(rect(0, 0, 3, 80), ResizeEdge::Left);
        assert_eq!(out.width, 0);
    }

    #[test]
    fn snap_full_overwrites_with_screen_rect() {
        let out = snapped(SnapPreset::Full, 1920, 1080);
        assert_eq!(out, rect(0, 0, 1920, 1080));
    }

    #[test]
    fn snap_centered_uses_fixed_size() {
        let out = snapped(SnapPreset::Centered, 1920, 1080);
        assert_eq!(out, rect(0, 0, CENTERED_WIDTH, CENTERED_HEIGHT));
    }
}
