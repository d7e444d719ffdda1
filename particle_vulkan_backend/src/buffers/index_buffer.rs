use crate::{
    buffers::buffer::{Buffer, UploadStrategy},
    devices::queues::QueueMap,
    models::index::IndexType,
    util::result::Result,
};
use ash::vk;

#[derive(Default)]
pub struct IndexBuffer {
    pub data: Buffer,
    pub index_count: usize,
}

impl IndexBuffer {
    pub fn new(
        indices: &[IndexType],
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        queues: &QueueMap,
        upload_strategy: UploadStrategy,
    ) -> Result<Self> {
        let index_buffer = Buffer::create_and_fill(
            instance,
            physical_device,
            logical_device,
            command_pool,
            queues,
            indices,
            vk::BufferUsageFlags::INDEX_BUFFER,
            upload_strategy,
        )?;

        Ok(Self {
            data: index_buffer,
            index_count: indices.len(),
        })
    }

    pub unsafe fn cleanup(&self, logical_device: &ash::Device) {
        self.data.destroy(logical_device);
    }
}
