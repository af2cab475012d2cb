use crate::wm::geometry::Geometry;

/// A window being managed by the window manager.
#[derive(Debug, Clone)]
pub struct Client {
    /// X11 window ID
    pub window: u32,

    /// Last known geometry
    pub geometry: Geometry,

    /// Window title (WM_NAME at map time)
    pub title: String,

    /// Is the window currently fullscreen?
    pub fullscreen: bool,

    /// Geometry to restore when leaving fullscreen
    pub restore_geometry: Option<Geometry>,
}

impl Client {
    pub fn new(window: u32, geometry: Geometry, title: String) -> Self {
        Self {
            window,
            geometry,
            title,
            fullscreen: false,
            restore_geometry: None,
        }
    }
}
