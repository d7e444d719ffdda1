use crate::buffers::index_buffer::IndexBuffer;
use crate::buffers::vertex_buffer::VertexBuffer;
use crate::devices::queues::{QueueFamilyIndices, QueueMap};
use crate::graphics_pipeline::GraphicsPipeline;
use crate::models::index::INDEX_TYPE_VK_TYPE;
use crate::uniforms::descriptors::DescriptorData;
use crate::util::result::{Result, VulkanError};

use ash::vk;

pub fn create_command_pool(
    logical_device: &ash::Device,
    queue_family_indices: &QueueFamilyIndices,
) -> Result<vk::CommandPool> {
    let pool_info = vk::CommandPoolCreateInfo::default()
        .queue_family_index(queue_family_indices.graphics_family()?)
        .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

    let command_pool = unsafe { logical_device.create_command_pool(&pool_info, None)? };

    Ok(command_pool)
}

pub fn begin_single_time_commands(
    logical_device: &ash::Device,
    command_pool: vk::CommandPool,
) -> Result<vk::CommandBuffer> {
    let cb_alloc_info = vk::CommandBufferAllocateInfo::default()
        .level(vk::CommandBufferLevel::PRIMARY)
        .command_pool(command_pool)
        .command_buffer_count(1);

    let command_buffers = unsafe { logical_device.allocate_command_buffers(&cb_alloc_info)? };

    // we need to have one command buffer for the copy operation
    let &command_buffer = command_buffers
        .first()
        .ok_or(VulkanError::CommandBufferNotAvailable(0))?;

    // start recording command buffer immediatetly
    let cb_begin_info =
        vk::CommandBufferBeginInfo::default().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

    unsafe {
        logical_device.begin_command_buffer(command_buffer, &cb_begin_info)?;
    }

    Ok(command_buffer)
}

pub fn end_single_time_commands(
    command_buffer: vk::CommandBuffer,
    logical_device: &ash::Device,
    queues: &QueueMap,
    command_pool: vk::CommandPool,
) -> Result<()> {
    let command_buffer_array = [command_buffer];
    let submitted = submit_and_wait(logical_device, queues, &command_buffer_array);

    unsafe {
        logical_device.free_command_buffers(command_pool, &command_buffer_array);
    }

    submitted
}

fn submit_and_wait(
    logical_device: &ash::Device,
    queues: &QueueMap,
    command_buffers: &[vk::CommandBuffer],
) -> Result<()> {
    let submit_info = [vk::SubmitInfo::default().command_buffers(command_buffers)];
    let graphics_queue = queues.get_graphics_queue()?;
    unsafe {
        for &command_buffer in command_buffers {
            logical_device.end_command_buffer(command_buffer)?;
        }
        logical_device.queue_submit(graphics_queue, &submit_info, vk::Fence::null())?;
        logical_device.queue_wait_idle(graphics_queue)?;
    }
    Ok(())
}

pub struct DrawResources<'a> {
    pub graphics_pipeline: &'a GraphicsPipeline,
    pub framebuffers: &'a [vk::Framebuffer],
    pub extent: vk::Extent2D,
    pub vertex_buffer: &'a VertexBuffer,
    pub index_buffer: &'a IndexBuffer,
    pub descriptor_data: &'a DescriptorData,
}

/// Allocates and pre-records one command buffer per framebuffer.
pub fn create_command_buffers(
    logical_device: &ash::Device,
    command_pool: vk::CommandPool,
    draw_resources: &DrawResources,
) -> Result<Vec<vk::CommandBuffer>> {
    let allocate_info = vk::CommandBufferAllocateInfo::default()
        .command_pool(command_pool)
        .command_buffer_count(u32::try_from(draw_resources.framebuffers.len())?)
        .level(vk::CommandBufferLevel::PRIMARY);

    let command_buffers = unsafe { logical_device.allocate_command_buffers(&allocate_info)? };

    for (i, &command_buffer) in command_buffers.iter().enumerate() {
        if let Err(err) = record_command_buffer(logical_device, command_buffer, i, draw_resources) {
            unsafe { logical_device.free_command_buffers(command_pool, &command_buffers) };
            return Err(err);
        }
    }

    Ok(command_buffers)
}

fn record_command_buffer(
    logical_device: &ash::Device,
    command_buffer: vk::CommandBuffer,
    image_index: usize,
    draw_resources: &DrawResources,
) -> Result<()> {
    let &framebuffer = draw_resources
        .framebuffers
        .get(image_index)
        .ok_or(VulkanError::CommandBufferNotAvailable(image_index))?;
    let &descriptor_set = draw_resources
        .descriptor_data
        .descriptor_sets
        .get(image_index)
        .ok_or(VulkanError::DescriptorSetNotAvailable(image_index))?;
    let graphics_pipeline = draw_resources.graphics_pipeline;
    let extent = draw_resources.extent;

    let command_buffer_begin_info = vk::CommandBufferBeginInfo::default();

    let render_pass_begin_info = vk::RenderPassBeginInfo::default()
        .render_pass(graphics_pipeline.render_pass)
        .framebuffer(framebuffer)
        .render_area(vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        })
        .clear_values(&GraphicsPipeline::CLEAR_VALUES);

    let viewports = [full_viewport(extent)];
    let scissors = [vk::Rect2D {
        offset: vk::Offset2D { x: 0, y: 0 },
        extent,
    }];

    let index_count = u32::try_from(draw_resources.index_buffer.index_count)?;
    let instance_count = 1; // no instancing
    let first_index = 0;
    let vertex_offset = 0;
    let first_instance = 1;

    unsafe {
        logical_device.begin_command_buffer(command_buffer, &command_buffer_begin_info)?;

        logical_device.cmd_begin_render_pass(
            command_buffer,
            &render_pass_begin_info,
            vk::SubpassContents::INLINE,
        );

        logical_device.cmd_set_viewport(command_buffer, 0, &viewports);
        logical_device.cmd_set_scissor(command_buffer, 0, &scissors);

        logical_device.cmd_bind_descriptor_sets(
            command_buffer,
            vk::PipelineBindPoint::GRAPHICS,
            graphics_pipeline.pipeline_layout,
            0,
            &[descriptor_set],
            &[],
        );

        logical_device.cmd_bind_pipeline(
            command_buffer,
            vk::PipelineBindPoint::GRAPHICS,
            graphics_pipeline.pipeline,
        );

        let vertex_buffers = [draw_resources.vertex_buffer.data.buffer];
        let offsets: [vk::DeviceSize; 1] = [0];
        logical_device.cmd_bind_vertex_buffers(command_buffer, 0, &vertex_buffers, &offsets);

        logical_device.cmd_bind_index_buffer(
            command_buffer,
            draw_resources.index_buffer.data.buffer,
            0,
            INDEX_TYPE_VK_TYPE,
        );

        logical_device.cmd_draw_indexed(
            command_buffer,
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        );

        logical_device.cmd_end_render_pass(command_buffer);

        logical_device.end_command_buffer(command_buffer)?;
    }

    Ok(())
}

pub fn full_viewport(extent: vk::Extent2D) -> vk::Viewport {
    vk::Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width as f32,
        height: extent.height as f32,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_covers_extent_with_unit_depth() {
        let viewport = full_viewport(vk::Extent2D {
            width: 1280,
            height: 720,
        });
        assert_eq!((viewport.x, viewport.y), (0.0, 0.0));
        assert_eq!((viewport.width, viewport.height), (1280.0, 720.0));
        assert_eq!((viewport.min_depth, viewport.max_depth), (0.0, 1.0));
    }
}
