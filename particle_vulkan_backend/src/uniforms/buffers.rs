use crate::buffers::buffer::Buffer;
use crate::util::result::{Result, VulkanError};

use particle_common::uniforms::{copy_uniform_to_memory, UniformBufferObject};

use ash::vk;
use std::os::raw::c_void;

/// One host visible uniform buffer per swapchain image, mapped for their whole lifetime.
pub struct UniformBuffers {
    pub buffers: Vec<Buffer>,
    mapped_memory: Vec<*mut c_void>,
    pending_updates: PendingUpdates,
}

/// Tracks which swapchain images still hold an outdated uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdates {
    stale: Vec<bool>,
}

impl PendingUpdates {
    /// Freshly created buffers hold no data, so every image starts out stale.
    pub fn new(image_count: usize) -> Self {
        Self {
            stale: vec![true; image_count],
        }
    }

    pub fn mark_all(&mut self) {
        self.stale.fill(true);
    }

    pub fn is_stale(&self, image_index: usize) -> bool {
        self.stale.get(image_index).copied().unwrap_or(false)
    }

    pub fn clear(&mut self, image_index: usize) {
        if let Some(stale) = self.stale.get_mut(image_index) {
            *stale = false;
        }
    }
}

impl UniformBuffers {
    pub const UNIFORM_SIZE: usize = std::mem::size_of::<UniformBufferObject>();

    pub fn new(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        image_count: usize,
    ) -> Result<Self> {
        let size = vk::DeviceSize::try_from(Self::UNIFORM_SIZE)?;

        let mut uniform_buffers = UniformBuffers {
            buffers: Vec::with_capacity(image_count),
            mapped_memory: Vec::with_capacity(image_count),
            pending_updates: PendingUpdates::new(image_count),
        };

        for _ in 0..image_count {
            if let Err(err) =
                uniform_buffers.push_buffer(instance, physical_device, logical_device, size)
            {
                unsafe { uniform_buffers.destroy(logical_device) };
                return Err(err);
            }
        }

        Ok(uniform_buffers)
    }

    fn push_buffer(
        &mut self,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        size: vk::DeviceSize,
    ) -> Result<()> {
        let buffer = Buffer::new(
            instance,
            physical_device,
            logical_device,
            size,
            vk::BufferUsageFlags::UNIFORM_BUFFER,
            Buffer::HOST_MEMORY,
        )?;
        let mapped = unsafe {
            logical_device.map_memory(buffer.memory, 0, size, vk::MemoryMapFlags::empty())
        };
        match mapped {
            Ok(mapped) => {
                self.buffers.push(buffer);
                self.mapped_memory.push(mapped);
                Ok(())
            }
            Err(err) => {
                unsafe { buffer.destroy(logical_device) };
                Err(err.into())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Every image has to get the uniform block rewritten, e.g. after the view changed.
    pub fn mark_all_stale(&mut self) {
        self.pending_updates.mark_all();
    }

    pub fn is_stale(&self, image_index: usize) -> bool {
        self.pending_updates.is_stale(image_index)
    }

    /// Writes the uniform block of the given swapchain image.
    /// The image's previous frame must have finished executing.
    pub fn update(&mut self, image_index: usize, ubo: &UniformBufferObject) -> Result<()> {
        let &mapped = self
            .mapped_memory
            .get(image_index)
            .ok_or(VulkanError::UniformBufferNotAvailable(image_index))?;
        unsafe { copy_uniform_to_memory(ubo, mapped) };
        self.pending_updates.clear(image_index);
        Ok(())
    }

    // freeing the memory also unmaps it
    pub unsafe fn destroy(&mut self, logical_device: &ash::Device) {
        for buffer in self.buffers.drain(..) {
            buffer.destroy(logical_device);
        }
        self.mapped_memory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_start_stale_until_written() {
        let mut pending = PendingUpdates::new(3);
        assert!((0..3).all(|index| pending.is_stale(index)));

        pending.clear(1);
        assert!(pending.is_stale(0));
        assert!(!pending.is_stale(1));
        // unknown images never need a write
        assert!(!pending.is_stale(3));
        pending.clear(3);
    }

    #[test]
    fn view_change_marks_every_image() {
        let mut pending = PendingUpdates::new(2);
        pending.clear(0);
        pending.clear(1);
        pending.mark_all();
        assert_eq!(pending, PendingUpdates::new(2));
    }
}
