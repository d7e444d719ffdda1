use crate::buffers::memory;

use crate::devices::queues::QueueMap;
use crate::util::result::Result;

use log::debug;

use ash::vk;
//////////////////////// Enums ///////////////////////
/// Where vertex and index data lives while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    /// copy through a host visible staging buffer into device local memory
    Staging,
    /// render straight from host visible and coherent memory
    HostVisible,
}
//////////////////////// Structs ///////////////////////
#[derive(Default)]
pub struct Buffer {
    pub buffer: vk::Buffer,
    pub memory: vk::DeviceMemory,
}
//////////////////////// Impls ///////////////////////
impl UploadStrategy {
    pub fn from_settings(staging: bool) -> Self {
        if staging {
            UploadStrategy::Staging
        } else {
            UploadStrategy::HostVisible
        }
    }
}

impl Buffer {
    pub const HOST_MEMORY: vk::MemoryPropertyFlags = vk::MemoryPropertyFlags::from_raw(
        vk::MemoryPropertyFlags::HOST_VISIBLE.as_raw()
            | vk::MemoryPropertyFlags::HOST_COHERENT.as_raw(),
    );

    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        memory_property_requirements: vk::MemoryPropertyFlags,
    ) -> Result<Self> {
        let buffer_create_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { logical_device.create_buffer(&buffer_create_info, None)? };

        let memory = match memory::create_buffer_memory(
            instance,
            physical_device,
            logical_device,
            buffer,
            memory_property_requirements,
        ) {
            Ok(memory) => memory,
            Err(err) => {
                unsafe { logical_device.destroy_buffer(buffer, None) };
                return Err(err);
            }
        };

        Ok(Self { buffer, memory })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_and_fill<T: Copy>(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        queues: &QueueMap,
        data: &[T],
        usage: vk::BufferUsageFlags,
        upload_strategy: UploadStrategy,
    ) -> Result<Self> {
        let buffer_size = vk::DeviceSize::try_from(std::mem::size_of_val(data))?;

        if upload_strategy == UploadStrategy::HostVisible {
            let host_buffer = Buffer::new(
                instance,
                physical_device,
                logical_device,
                buffer_size,
                usage,
                Self::HOST_MEMORY,
            )?;
            unsafe {
                memory::fill_buffer(logical_device, host_buffer.memory, data)?;
            }
            return Ok(host_buffer);
        }

        let staging_buffer = Buffer::new(
            instance,
            physical_device,
            logical_device,
            buffer_size,
            vk::BufferUsageFlags::TRANSFER_SRC,
            Self::HOST_MEMORY,
        )?;

        let upload = Self::upload_from_staging(
            instance,
            physical_device,
            logical_device,
            command_pool,
            queues,
            &staging_buffer,
            data,
            buffer_size,
            usage,
        );

        unsafe {
            staging_buffer.destroy(logical_device);
        }
        debug!("Uploaded {} bytes through a staging buffer", buffer_size);

        upload
    }

    #[allow(clippy::too_many_arguments)]
    fn upload_from_staging<T: Copy>(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        command_pool: vk::CommandPool,
        queues: &QueueMap,
        staging_buffer: &Buffer,
        data: &[T],
        buffer_size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
    ) -> Result<Self> {
        unsafe {
            memory::fill_buffer(logical_device, staging_buffer.memory, data)?;
        }

        let result_buffer = Buffer::new(
            instance,
            physical_device,
            logical_device,
            buffer_size,
            vk::BufferUsageFlags::TRANSFER_DST | usage,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;

        if let Err(err) = memory::copy_buffer(
            staging_buffer.buffer,
            result_buffer.buffer,
            buffer_size,
            logical_device,
            command_pool,
            queues,
        ) {
            unsafe { result_buffer.destroy(logical_device) };
            return Err(err);
        }

        Ok(result_buffer)
    }

    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        logical_device.destroy_buffer(self.buffer, None);
        logical_device.free_memory(self.memory, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_memory_is_visible_and_coherent() {
        assert!(Buffer::HOST_MEMORY.contains(vk::MemoryPropertyFlags::HOST_VISIBLE));
        assert!(Buffer::HOST_MEMORY.contains(vk::MemoryPropertyFlags::HOST_COHERENT));
        assert!(!Buffer::HOST_MEMORY.contains(vk::MemoryPropertyFlags::DEVICE_LOCAL));
    }

    #[test]
    fn strategy_follows_staging_setting() {
        assert_eq!(UploadStrategy::from_settings(true), UploadStrategy::Staging);
        assert_eq!(
            UploadStrategy::from_settings(false),
            UploadStrategy::HostVisible
        );
    }
}
