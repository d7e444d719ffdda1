use crate::{
    buffers::buffer::{Buffer, UploadStrategy},
    devices::queues::QueueMap,
    models::vertex::Vertex,
    util::result::Result,
};
use ash::vk;
//////////////////////// Structs ///////////////////////
#[derive(Default)]
pub struct VertexBuffer {
    pub data: Buffer,
    pub vertex_count: usize,
}
//////////////////////// Impls ///////////////////////
impl VertexBuffer {
    pub fn new(
        vertices: &[Vertex],
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        queues: &QueueMap,
        upload_strategy: UploadStrategy,
    ) -> Result<Self> {
        let vertex_buffer = Buffer::create_and_fill(
            instance,
            physical_device,
            logical_device,
            command_pool,
            queues,
            vertices,
            vk::BufferUsageFlags::VERTEX_BUFFER,
            upload_strategy,
        )?;

        Ok(Self {
            data: vertex_buffer,
            vertex_count: vertices.len(),
        })
    }

    pub unsafe fn cleanup(&self, logical_device: &ash::Device) {
        self.data.destroy(logical_device);
    }
}
