use crate::{
    graphics_pipeline::GraphicsPipeline,
    presentation::{image_views::ImageViews, swap_chain::SwapChainContainer},
    util::result::Result,
};
use ash::vk;

pub fn create_framebuffers(
    logical_device: &ash::Device,
    graphics_pipeline: &GraphicsPipeline,
    image_views: &ImageViews,
    depth_image_view: vk::ImageView,
    swap_chain_container: &SwapChainContainer,
) -> Result<Vec<vk::Framebuffer>> {
    let mut framebuffers = Vec::with_capacity(image_views.image_views.len());
    for &image_view in image_views.image_views.iter() {
        // the color attachment is different for every swap chain image
        // but the depth attachment is shared since only the subpass reads and writes it
        let attachments = [image_view, depth_image_view];

        let framebuffer_create_info = vk::FramebufferCreateInfo::default()
            .render_pass(graphics_pipeline.render_pass)
            .attachments(&attachments)
            .width(swap_chain_container.swap_chain_extent.width)
            .height(swap_chain_container.swap_chain_extent.height)
            .layers(1);

        let framebuffer =
            match unsafe { logical_device.create_framebuffer(&framebuffer_create_info, None) } {
                Ok(framebuffer) => framebuffer,
                Err(err) => {
                    unsafe { destroy_framebuffers(logical_device, &framebuffers) };
                    return Err(err.into());
                }
            };
        framebuffers.push(framebuffer);
    }
    Ok(framebuffers)
}

pub unsafe fn destroy_framebuffers(logical_device: &ash::Device, framebuffers: &[vk::Framebuffer]) {
    for &framebuffer in framebuffers.iter() {
        logical_device.destroy_framebuffer(framebuffer, None);
    }
}
