use crate::util::result::{Result, VulkanError};
use crate::util::tools::vk_to_string;

use log::{debug, info};

use std::ffi::CStr;
use std::os::raw::c_char;

pub enum ValidationOptions {
    None,
    Verbose,
}

pub struct VulkanValidation {
    pub is_enabled: bool,
    validation_layer_names: [&'static CStr; 1],
    options: ValidationOptions,
}

impl VulkanValidation {
    const KHRONOS_VALIDATION_LAYER: &'static CStr = c"VK_LAYER_KHRONOS_validation";

    pub const fn enabled(options: ValidationOptions) -> Self {
        VulkanValidation {
            is_enabled: true,
            validation_layer_names: [Self::KHRONOS_VALIDATION_LAYER],
            options,
        }
    }

    pub const fn disabled() -> Self {
        VulkanValidation {
            is_enabled: false,
            validation_layer_names: [Self::KHRONOS_VALIDATION_LAYER],
            options: ValidationOptions::None,
        }
    }

    pub fn from_settings(validation_requested: bool) -> Self {
        if validation_requested {
            Self::enabled(ValidationOptions::Verbose)
        } else {
            Self::disabled()
        }
    }

    /// The layer name pointers to pass to instance and device creation. Empty when validation is disabled.
    pub fn get_enabled_layer_names(&self) -> Vec<*const c_char> {
        if self.is_enabled {
            self.validation_layer_names
                .iter()
                .map(|name| name.as_ptr())
                .collect()
        } else {
            Vec::new()
        }
    }

    pub fn check_validation_layer_support(&self, entry: &ash::Entry) -> Result<bool> {
        if !self.is_enabled {
            return Ok(true);
        }

        let layer_properties = unsafe { entry.enumerate_instance_layer_properties()? };

        if layer_properties.is_empty() {
            return Err(VulkanError::NoValidationLayers);
        } else if let ValidationOptions::Verbose = self.options {
            info!("Available layers:");
            for layer in &layer_properties {
                info!("{}", vk_to_string(&layer.layer_name)?);
            }
        }

        let mut available_layer_names = Vec::with_capacity(layer_properties.len());
        for layer in &layer_properties {
            available_layer_names.push(vk_to_string(&layer.layer_name)?);
        }

        let all_found = self.missing_layers(&available_layer_names).is_empty();
        Ok(all_found)
    }

    fn missing_layers(&self, available_layer_names: &[String]) -> Vec<&'static CStr> {
        self.validation_layer_names
            .iter()
            .copied()
            .filter(|required| {
                let found = available_layer_names
                    .iter()
                    .any(|available| required.to_bytes() == available.as_bytes());
                if !found {
                    debug!("Validation layer {:?} is not available", required);
                }
                !found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_validation_has_no_layers() {
        let validation = VulkanValidation::from_settings(false);
        assert!(!validation.is_enabled);
        assert!(validation.get_enabled_layer_names().is_empty());
    }

    #[test]
    fn enabled_validation_reports_missing_layer() {
        let validation = VulkanValidation::from_settings(true);
        assert_eq!(validation.get_enabled_layer_names().len(), 1);

        let available = vec!["VK_LAYER_LUNARG_api_dump".to_owned()];
        assert_eq!(validation.missing_layers(&available).len(), 1);

        let available = vec![
            "VK_LAYER_LUNARG_api_dump".to_owned(),
            "VK_LAYER_KHRONOS_validation".to_owned(),
        ];
        assert!(validation.missing_layers(&available).is_empty());
    }
}
