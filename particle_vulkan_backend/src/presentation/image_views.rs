use crate::presentation::swap_chain::SwapChainContainer;
use crate::util::result::Result;

use ash::vk;
//////////////////////// Structs ///////////////////////
pub struct ImageViews {
    pub image_views: Vec<vk::ImageView>,
}
//////////////////////// Impls ///////////////////////
impl ImageViews {
    pub fn new(
        logical_device: &ash::Device,
        swap_chain_container: &SwapChainContainer,
    ) -> Result<Self> {
        let mut image_views = Vec::with_capacity(swap_chain_container.swap_chain_images.len());

        for &image in &swap_chain_container.swap_chain_images {
            let image_view = create_image_view(
                logical_device,
                image,
                swap_chain_container.swap_chain_format.format,
                vk::ImageAspectFlags::COLOR,
            )?;
            image_views.push(image_view);
        }

        Ok(ImageViews { image_views })
    }

    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        for &image_view in self.image_views.iter() {
            logical_device.destroy_image_view(image_view, None);
        }
    }
}

pub fn create_image_view(
    logical_device: &ash::Device,
    image: vk::Image,
    format: vk::Format,
    aspect_mask: vk::ImageAspectFlags,
) -> Result<vk::ImageView> {
    let image_view_create_info = vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(
            vk::ImageSubresourceRange::default()
                .aspect_mask(aspect_mask)
                .base_mip_level(0)
                .level_count(1)
                .base_array_layer(0)
                .layer_count(1),
        );

    let image_view = unsafe { logical_device.create_image_view(&image_view_create_info, None)? };
    Ok(image_view)
}
