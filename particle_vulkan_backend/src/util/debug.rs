use crate::util::result::Result;
use crate::util::validation::VulkanValidation;
use log::{error, info, trace, warn};

use ash::vk;
use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_void;

/// the callback function used in Debug Utils.
unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _p_user_data: *mut c_void,
) -> vk::Bool32 {
    let types = match message_type {
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL => "[General]",
        vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "[Performance]",
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION => "[Validation]",
        _ => "[Unknown]",
    };
    let message = if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        Cow::Borrowed("")
    } else {
        CStr::from_ptr((*p_callback_data).p_message).to_string_lossy()
    };

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE => {
            trace!("[Verbose]{} {}", types, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => {
            info!("[Info]{} {}", types, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => {
            warn!("[Warning]{} {}", types, message);
        }
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => {
            error!("[Error]{} {}", types, message);
        }
        _ => {
            error!("[Unknown]{} {}", types, message);
        }
    };

    vk::FALSE
}

pub struct VulkanDebug {
    debug_utils: ash::ext::debug_utils::Instance,
    debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
}

impl VulkanDebug {
    pub fn new(
        entry: &ash::Entry,
        instance: &ash::Instance,
        validation: &VulkanValidation,
    ) -> Result<Self> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);

        let debug_messenger = if validation.is_enabled {
            let create_info = Self::populate_debug_create_info();
            let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None)? };
            Some(messenger)
        } else {
            None
        };

        Ok(Self {
            debug_utils,
            debug_messenger,
        })
    }

    pub unsafe fn destroy_debug_messenger(&mut self) {
        if let Some(debug_messenger) = self.debug_messenger.take() {
            self.debug_utils
                .destroy_debug_utils_messenger(debug_messenger, None);
        }
    }

    /// The create info is also chained into instance creation so that messages
    /// emitted while creating and destroying the instance are reported too.
    pub fn populate_debug_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
        vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                    | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            )
            .pfn_user_callback(Some(vulkan_debug_utils_callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messenger_reports_every_severity() {
        let create_info = VulkanDebug::populate_debug_create_info();
        let severity = create_info.message_severity;
        assert!(severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE));
        assert!(severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO));
        assert!(severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING));
        assert!(severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR));
        assert!(create_info.pfn_user_callback.is_some());
    }
}
