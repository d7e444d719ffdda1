use crate::devices::queues::QueueType;
use crate::presentation::swap_chain::SwapChainSupportDetails;

use ash::vk;
use std::collections::HashSet;
use std::ffi::CStr;
use std::os::raw::c_char;

pub struct DeviceRequirements {
    pub required_queues: HashSet<QueueType>,
    pub required_device_extensions: Vec<&'static CStr>,
    pub is_swap_chain_adequate_check: fn(&SwapChainSupportDetails) -> bool,
}

impl DeviceRequirements {
    pub fn new(
        required_queues: &[QueueType],
        required_device_extensions: &[&'static CStr],
        is_swap_chain_adequate_check: fn(&SwapChainSupportDetails) -> bool,
    ) -> Self {
        Self {
            required_queues: required_queues.iter().copied().collect(),
            required_device_extensions: required_device_extensions.to_vec(),
            is_swap_chain_adequate_check,
        }
    }

    /// A graphics queue, a queue that can present and the swapchain extension.
    pub fn for_presentation() -> Self {
        Self::new(
            &[
                QueueType::QueueWithFlag(vk::QueueFlags::GRAPHICS),
                QueueType::PresentQueue,
            ],
            &[ash::khr::swapchain::NAME],
            is_swap_chain_adequate,
        )
    }

    pub fn get_enabled_extension_names(&self) -> Vec<*const c_char> {
        self.required_device_extensions
            .iter()
            .map(|name| name.as_ptr())
            .collect()
    }

    pub fn missing_extensions(&self, available_extension_names: &[&CStr]) -> Vec<&'static CStr> {
        self.required_device_extensions
            .iter()
            .copied()
            .filter(|required| !available_extension_names.contains(required))
            .collect()
    }
}

fn is_swap_chain_adequate(swap_chain_support_details: &SwapChainSupportDetails) -> bool {
    !swap_chain_support_details.formats.is_empty()
        && !swap_chain_support_details.present_modes.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_requires_graphics_present_and_swapchain() {
        let requirements = DeviceRequirements::for_presentation();
        assert!(requirements
            .required_queues
            .contains(&QueueType::QueueWithFlag(vk::QueueFlags::GRAPHICS)));
        assert!(requirements
            .required_queues
            .contains(&QueueType::PresentQueue));
        assert_eq!(requirements.get_enabled_extension_names().len(), 1);
    }

    #[test]
    fn reports_missing_swapchain_extension() {
        let requirements = DeviceRequirements::for_presentation();
        let other: &CStr = c"VK_KHR_maintenance1";
        assert_eq!(
            requirements.missing_extensions(&[other]),
            vec![ash::khr::swapchain::NAME]
        );
        assert!(requirements
            .missing_extensions(&[other, ash::khr::swapchain::NAME])
            .is_empty());
    }

    #[test]
    fn swap_chain_without_formats_is_inadequate() {
        let mut details = SwapChainSupportDetails {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        assert!(!is_swap_chain_adequate(&details));
        details.formats.push(vk::SurfaceFormatKHR::default());
        assert!(is_swap_chain_adequate(&details));
    }
}
