use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
//////////////////////// Structs ///////////////////////
/// The platform handles the renderer needs to create a presentation surface.
/// The window they belong to has to outlive the renderer.
#[derive(Clone, Copy)]
pub struct WindowSurface {
    pub display_handle: RawDisplayHandle,
    pub window_handle: RawWindowHandle,
}

/// Size of the drawable area of the window in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
