use crate::{
    buffers::memory,
    depth::helpers::depth_aspect_mask,
    presentation::{image_views::create_image_view, swap_chain::SwapChainContainer},
    util::result::Result,
};
use ash::vk;

#[derive(Default)]
pub struct DepthResource {
    pub depth_format: vk::Format,
    pub depth_image: vk::Image,
    pub depth_memory: vk::DeviceMemory,
    pub depth_image_view: vk::ImageView,
}

impl DepthResource {
    /// Creates the depth attachment. Its layout is transitioned by the render pass.
    pub fn new(
        depth_format: vk::Format,
        instance: &ash::Instance,
        logical_device: &ash::Device,
        physical_device: vk::PhysicalDevice,
        swap_chain_container: &SwapChainContainer,
    ) -> Result<Self> {
        let image_create_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(depth_format)
            .extent(vk::Extent3D {
                width: swap_chain_container.swap_chain_extent.width,
                height: swap_chain_container.swap_chain_extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let depth_image = unsafe { logical_device.create_image(&image_create_info, None)? };

        let mut depth_resource = DepthResource {
            depth_format,
            depth_image,
            ..Default::default()
        };

        match depth_resource.create_memory_and_view(instance, logical_device, physical_device) {
            Ok(()) => Ok(depth_resource),
            Err(err) => {
                unsafe { depth_resource.destroy(logical_device) };
                Err(err)
            }
        }
    }

    fn create_memory_and_view(
        &mut self,
        instance: &ash::Instance,
        logical_device: &ash::Device,
        physical_device: vk::PhysicalDevice,
    ) -> Result<()> {
        self.depth_memory = memory::create_image_memory(
            instance,
            physical_device,
            logical_device,
            self.depth_image,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;
        self.depth_image_view = create_image_view(
            logical_device,
            self.depth_image,
            self.depth_format,
            depth_aspect_mask(self.depth_format),
        )?;
        Ok(())
    }

    // null handles are ignored by the destroy calls
    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        logical_device.destroy_image_view(self.depth_image_view, None);
        logical_device.destroy_image(self.depth_image, None);
        logical_device.free_memory(self.depth_memory, None);
    }
}
