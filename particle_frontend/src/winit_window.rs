use particle_common::config::Settings;
use particle_vulkan_backend::{
    util::result::Result,
    window::{WindowSize, WindowSurface},
};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::{
    dpi::LogicalSize,
    error::OsError,
    event_loop::EventLoop,
    window::{Fullscreen, Window, WindowBuilder},
};

/// Opens the window described by `settings`.
/// In fullscreen mode a borderless window covers the current monitor and the requested size is ignored.
pub fn create_window(
    settings: &Settings,
    event_loop: &EventLoop<()>,
) -> std::result::Result<Window, OsError> {
    let mut window_builder = WindowBuilder::new().with_title(settings.title.as_str());
    if settings.fullscreen {
        window_builder = window_builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window_builder =
            window_builder.with_inner_size(LogicalSize::new(settings.width, settings.height));
    }
    window_builder.build(event_loop)
}

/// The drawable area of the window, which is what the swapchain has to match.
pub fn get_window_size_from_winit(winit_window: &Window) -> WindowSize {
    let inner_size = winit_window.inner_size();
    WindowSize {
        width: inner_size.width,
        height: inner_size.height,
    }
}

pub fn get_window_surface_from_winit(winit_window: &Window) -> Result<WindowSurface> {
    Ok(WindowSurface {
        display_handle: winit_window.display_handle()?.as_raw(),
        window_handle: winit_window.window_handle()?.as_raw(),
    })
}
