use crate::util::result::Result;
use crate::window::WindowSurface;

use ash::vk;
use raw_window_handle::RawDisplayHandle;
use std::os::raw::c_char;

// required extension ------------------------------------------------------
/// Instance extensions needed to present to the given display, plus debug utils when validating.
pub fn required_extension_names(
    display_handle: RawDisplayHandle,
    validation_enabled: bool,
) -> Result<Vec<*const c_char>> {
    let mut extension_names = ash_window::enumerate_required_extensions(display_handle)?.to_vec();
    if validation_enabled {
        extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
    }
    Ok(extension_names)
}

// surfaces --------------------------------------------------------------------------
pub struct SurfaceContainer {
    pub surface_loader: ash::khr::surface::Instance,
    pub surface: vk::SurfaceKHR,
}

pub fn create_surface(
    entry: &ash::Entry,
    instance: &ash::Instance,
    window_surface: &WindowSurface,
) -> Result<SurfaceContainer> {
    let surface = unsafe {
        ash_window::create_surface(
            entry,
            instance,
            window_surface.display_handle,
            window_surface.window_handle,
            None,
        )?
    };
    Ok(SurfaceContainer {
        surface_loader: ash::khr::surface::Instance::new(entry, instance),
        surface,
    })
}

impl SurfaceContainer {
    pub unsafe fn destroy(&self) {
        self.surface_loader.destroy_surface(self.surface, None);
    }
}
