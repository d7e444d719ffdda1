use crate::result::{ParticleCommonError, Result};
use log::info;
use std::{
    env,
    path::{Path, PathBuf},
};
//////////////////////// Structs ///////////////////////
/// Runtime options of the example. These can be changed from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Activates validation layers (and message output) when set to true
    pub validation: bool,
    /// Forces v-sync for the swapchain
    pub vsync: bool,
    /// Opens a borderless fullscreen window on the current monitor
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
    /// Index into the list of physical devices. `None` means pick the best rated one
    pub gpu_index: Option<usize>,
    /// Print the available vulkan devices during startup
    pub list_gpus: bool,
    /// Upload vertex and index data through a staging buffer into device local memory
    pub staging: bool,
    pub title: String,
}
/// Resolves resource files (like compiled shaders) relative to the running executable.
pub struct ResourceConfig {
    resource_base_folder: PathBuf,
}
//////////////////////// Impls ///////////////////////
impl Settings {
    pub const DEFAULT_WIDTH: u32 = 1280;
    pub const DEFAULT_HEIGHT: u32 = 720;
    pub const DEFAULT_TITLE: &'static str = "Example particle system";

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ParticleCommonError::InvalidWindowExtent {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            validation: false,
            vsync: false,
            fullscreen: false,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            gpu_index: None,
            list_gpus: false,
            staging: true,
            title: Self::DEFAULT_TITLE.to_owned(),
        }
    }
}

impl ResourceConfig {
    pub fn new() -> Result<Self> {
        let current_exe = env::current_exe()?;
        let mut resource_base = current_exe
            .parent()
            .ok_or(ParticleCommonError::ExecutableBaseDirError)?;
        // cargo puts example binaries one level deeper than the resources
        if let Some(dir_name) = resource_base.file_name() {
            if dir_name == "examples" || dir_name == "deps" {
                resource_base = resource_base
                    .parent()
                    .ok_or(ParticleCommonError::ExecutableBaseDirError)?;
            }
        }
        info!("Resource config created with {}", resource_base.display());
        Ok(Self::with_base(resource_base))
    }

    pub fn with_base<P>(resource_base_folder: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            resource_base_folder: resource_base_folder.as_ref().to_owned(),
        }
    }

    pub fn resolve_resource<P>(&self, resource_file_name: P) -> Result<PathBuf>
    where
        P: AsRef<Path>,
    {
        let resolved = self.resource_base_folder.join(resource_file_name);
        if resolved.exists() {
            Ok(resolved)
        } else {
            Err(ParticleCommonError::ResourceFailedToResolve(
                resolved.as_os_str().to_owned(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_example_defaults() {
        let settings = Settings::default();
        assert!(!settings.validation);
        assert!(!settings.vsync);
        assert!(!settings.fullscreen);
        assert_eq!(settings.width, 1280);
        assert_eq!(settings.height, 720);
        assert_eq!(settings.gpu_index, None);
        assert!(settings.staging);
        assert_eq!(settings.title, "Example particle system");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_extent_is_rejected() {
        let settings = Settings {
            height: 0,
            ..Settings::default()
        };
        match settings.validate() {
            Err(ParticleCommonError::InvalidWindowExtent { width, height }) => {
                assert_eq!((width, height), (1280, 0));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn resolves_existing_resource() {
        let base = env::temp_dir().join("particle_common_config_test");
        std::fs::create_dir_all(base.join("shaders")).unwrap();
        std::fs::write(base.join("shaders").join("a.spv"), [0u8; 4]).unwrap();

        let config = ResourceConfig::with_base(&base);
        let resolved = config.resolve_resource("shaders/a.spv").unwrap();
        assert_eq!(resolved, base.join("shaders/a.spv"));

        let missing = config.resolve_resource("shaders/missing.spv");
        assert!(matches!(
            missing,
            Err(ParticleCommonError::ResourceFailedToResolve(_))
        ));
    }
}
