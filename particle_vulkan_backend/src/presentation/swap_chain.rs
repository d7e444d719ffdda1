use crate::devices::queues::QueueFamilyIndices;
use crate::util::platform::SurfaceContainer;
use crate::util::result::{Result, VulkanError};
use crate::window::WindowSize;

use log::info;

use ash::vk;

pub struct SwapChainSupportDetails {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapChainSupportDetails {
    pub fn query_support(
        physical_device: vk::PhysicalDevice,
        surface: &SurfaceContainer,
    ) -> Result<Self> {
        let surface_capabilities = unsafe {
            surface
                .surface_loader
                .get_physical_device_surface_capabilities(physical_device, surface.surface)?
        };
        let formats = unsafe {
            surface
                .surface_loader
                .get_physical_device_surface_formats(physical_device, surface.surface)?
        };
        let present_modes = unsafe {
            surface
                .surface_loader
                .get_physical_device_surface_present_modes(physical_device, surface.surface)?
        };

        Ok(Self {
            capabilities: surface_capabilities,
            formats,
            present_modes,
        })
    }

    // swap extent is the resolution of the images we are writing to
    pub fn choose_swap_extent(&self, window_size: &WindowSize) -> vk::Extent2D {
        if self.capabilities.current_extent.width != u32::MAX {
            self.capabilities.current_extent
        } else {
            // the surface size is defined by the swapchain, so it follows the window
            vk::Extent2D {
                width: window_size.width.clamp(
                    self.capabilities.min_image_extent.width,
                    self.capabilities.max_image_extent.width,
                ),
                height: window_size.height.clamp(
                    self.capabilities.min_image_extent.height,
                    self.capabilities.max_image_extent.height,
                ),
            }
        }
    }

    pub fn choose_swap_surface_present(&self, vsync: bool) -> vk::PresentModeKHR {
        // fifo is always available and waits for the vertical blank
        if vsync {
            return vk::PresentModeKHR::FIFO;
        }
        if self.present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
            vk::PresentModeKHR::MAILBOX
        } else if self.present_modes.contains(&vk::PresentModeKHR::IMMEDIATE) {
            vk::PresentModeKHR::IMMEDIATE
        } else {
            vk::PresentModeKHR::FIFO
        }
    }

    pub fn choose_swap_surface_format(&self) -> Result<vk::SurfaceFormatKHR> {
        let preferred = vk::SurfaceFormatKHR {
            format: vk::Format::B8G8R8A8_UNORM,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        };
        match self.formats.as_slice() {
            [] => Err(VulkanError::SwapChainFormatsError),
            // the surface has no preferred format so we can pick any
            [only] if only.format == vk::Format::UNDEFINED => Ok(preferred),
            formats => Ok(formats
                .iter()
                .find(|format| {
                    format.format == preferred.format && format.color_space == preferred.color_space
                })
                .copied()
                .unwrap_or(formats[0])),
        }
    }

    pub fn choose_swap_min_image_count(&self) -> u32 {
        let image_count = self.capabilities.min_image_count + 1;
        if self.capabilities.max_image_count > 0 && self.capabilities.max_image_count < image_count
        {
            self.capabilities.max_image_count
        } else {
            image_count
        }
    }

    fn choose_composite_alpha(&self) -> vk::CompositeAlphaFlagsKHR {
        [
            vk::CompositeAlphaFlagsKHR::OPAQUE,
            vk::CompositeAlphaFlagsKHR::PRE_MULTIPLIED,
            vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED,
            vk::CompositeAlphaFlagsKHR::INHERIT,
        ]
        .into_iter()
        .find(|&flag| self.capabilities.supported_composite_alpha.contains(flag))
        .unwrap_or(vk::CompositeAlphaFlagsKHR::OPAQUE)
    }

    fn choose_pre_transform(&self) -> vk::SurfaceTransformFlagsKHR {
        if self
            .capabilities
            .supported_transforms
            .contains(vk::SurfaceTransformFlagsKHR::IDENTITY)
        {
            vk::SurfaceTransformFlagsKHR::IDENTITY
        } else {
            self.capabilities.current_transform
        }
    }
}

pub struct SwapChainContainer {
    pub swap_chain_loader: ash::khr::swapchain::Device,
    pub swap_chain: vk::SwapchainKHR,
    pub swap_chain_images: Vec<vk::Image>,
    pub swap_chain_format: vk::SurfaceFormatKHR,
    pub swap_chain_extent: vk::Extent2D,
}

impl SwapChainContainer {
    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        surface: &SurfaceContainer,
        window_size: &WindowSize,
        queue_indices: &QueueFamilyIndices,
        vsync: bool,
    ) -> Result<Self> {
        let swap_chain_support_details =
            SwapChainSupportDetails::query_support(physical_device, surface)?;

        let surface_format = swap_chain_support_details.choose_swap_surface_format()?;
        let present_mode = swap_chain_support_details.choose_swap_surface_present(vsync);
        let extent = swap_chain_support_details.choose_swap_extent(window_size);
        let min_image_count = swap_chain_support_details.choose_swap_min_image_count();

        let (sharing_mode, sharing_indices) = queue_indices.get_image_sharing_details();

        let swap_chain_create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface.surface)
            .min_image_count(min_image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(sharing_mode)
            .queue_family_indices(&sharing_indices)
            .pre_transform(swap_chain_support_details.choose_pre_transform())
            .composite_alpha(swap_chain_support_details.choose_composite_alpha())
            .present_mode(present_mode)
            .clipped(true);

        let swap_chain_loader = ash::khr::swapchain::Device::new(instance, logical_device);
        let swap_chain =
            unsafe { swap_chain_loader.create_swapchain(&swap_chain_create_info, None)? };

        let swap_chain_images = unsafe { swap_chain_loader.get_swapchain_images(swap_chain)? };

        info!(
            "Created swap chain with {} images of {}x{}, format {:?}, present mode {:?}",
            swap_chain_images.len(),
            extent.width,
            extent.height,
            surface_format.format,
            present_mode
        );

        Ok(SwapChainContainer {
            swap_chain,
            swap_chain_loader,
            swap_chain_images,
            swap_chain_format: surface_format,
            swap_chain_extent: extent,
        })
    }

    pub unsafe fn destroy(&self) {
        self.swap_chain_loader
            .destroy_swapchain(self.swap_chain, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(
        formats: Vec<vk::SurfaceFormatKHR>,
        present_modes: Vec<vk::PresentModeKHR>,
    ) -> SwapChainSupportDetails {
        SwapChainSupportDetails {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 0,
                current_extent: vk::Extent2D {
                    width: u32::MAX,
                    height: u32::MAX,
                },
                min_image_extent: vk::Extent2D {
                    width: 1,
                    height: 1,
                },
                max_image_extent: vk::Extent2D {
                    width: 1920,
                    height: 1080,
                },
                ..Default::default()
            },
            formats,
            present_modes,
        }
    }

    fn format(format: vk::Format) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }
    }

    #[test]
    fn prefers_bgra_unorm_format() {
        let support = details(
            vec![
                format(vk::Format::R8G8B8A8_SRGB),
                format(vk::Format::B8G8R8A8_UNORM),
            ],
            vec![],
        );
        assert_eq!(
            support.choose_swap_surface_format().unwrap().format,
            vk::Format::B8G8R8A8_UNORM
        );

        let support = details(vec![format(vk::Format::R8G8B8A8_SRGB)], vec![]);
        assert_eq!(
            support.choose_swap_surface_format().unwrap().format,
            vk::Format::R8G8B8A8_SRGB
        );

        let support = details(vec![format(vk::Format::UNDEFINED)], vec![]);
        assert_eq!(
            support.choose_swap_surface_format().unwrap().format,
            vk::Format::B8G8R8A8_UNORM
        );

        let support = details(vec![], vec![]);
        assert!(matches!(
            support.choose_swap_surface_format(),
            Err(VulkanError::SwapChainFormatsError)
        ));
    }

    #[test]
    fn present_mode_follows_vsync() {
        let all_modes = details(
            vec![],
            vec![
                vk::PresentModeKHR::FIFO,
                vk::PresentModeKHR::IMMEDIATE,
                vk::PresentModeKHR::MAILBOX,
            ],
        );
        assert_eq!(
            all_modes.choose_swap_surface_present(true),
            vk::PresentModeKHR::FIFO
        );
        assert_eq!(
            all_modes.choose_swap_surface_present(false),
            vk::PresentModeKHR::MAILBOX
        );

        let no_mailbox = details(
            vec![],
            vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE],
        );
        assert_eq!(
            no_mailbox.choose_swap_surface_present(false),
            vk::PresentModeKHR::IMMEDIATE
        );

        let fifo_only = details(vec![], vec![vk::PresentModeKHR::FIFO]);
        assert_eq!(
            fifo_only.choose_swap_surface_present(false),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn extent_is_clamped_window_size() {
        let mut support = details(vec![], vec![]);
        let window_size = WindowSize {
            width: 2560,
            height: 720,
        };
        assert_eq!(
            support.choose_swap_extent(&window_size),
            vk::Extent2D {
                width: 1920,
                height: 720
            }
        );

        support.capabilities.current_extent = vk::Extent2D {
            width: 800,
            height: 600,
        };
        assert_eq!(
            support.choose_swap_extent(&window_size),
            vk::Extent2D {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn image_count_is_one_above_minimum_within_maximum() {
        let mut support = details(vec![], vec![]);
        assert_eq!(support.choose_swap_min_image_count(), 3);
        support.capabilities.max_image_count = 2;
        assert_eq!(support.choose_swap_min_image_count(), 2);
    }
}
