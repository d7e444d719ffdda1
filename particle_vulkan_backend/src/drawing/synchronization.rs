use crate::util::result::Result;

use ash::vk;

use std::collections::HashMap;

pub struct SynchronizationContainer {
    image_available_semaphores: [vk::Semaphore; SynchronizationContainer::MAX_FRAMES_IN_FLIGHT],
    render_finished_semaphores: [vk::Semaphore; SynchronizationContainer::MAX_FRAMES_IN_FLIGHT],
    in_flight_fences: [vk::Fence; SynchronizationContainer::MAX_FRAMES_IN_FLIGHT],
    images_in_flight_fences: HashMap<usize, vk::Fence>,
    current_frame_idx: usize,
}

impl SynchronizationContainer {
    pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

    pub fn create(logical_device: &ash::Device) -> Result<Self> {
        let mut container = Self {
            image_available_semaphores: [vk::Semaphore::null(); Self::MAX_FRAMES_IN_FLIGHT],
            render_finished_semaphores: [vk::Semaphore::null(); Self::MAX_FRAMES_IN_FLIGHT],
            in_flight_fences: [vk::Fence::null(); Self::MAX_FRAMES_IN_FLIGHT],
            images_in_flight_fences: HashMap::new(),
            current_frame_idx: 0,
        };

        for frame in 0..Self::MAX_FRAMES_IN_FLIGHT {
            if let Err(err) = container.create_frame_objects(logical_device, frame) {
                unsafe { container.destroy(logical_device) };
                return Err(err);
            }
        }

        Ok(container)
    }

    fn create_frame_objects(&mut self, logical_device: &ash::Device, frame: usize) -> Result<()> {
        let semaphore_create_info = vk::SemaphoreCreateInfo::default();
        // create fence in signalled state so the first wait of every frame returns immediately
        let fence_create_info =
            vk::FenceCreateInfo::default().flags(vk::FenceCreateFlags::SIGNALED);

        unsafe {
            self.image_available_semaphores[frame] =
                logical_device.create_semaphore(&semaphore_create_info, None)?;
            self.render_finished_semaphores[frame] =
                logical_device.create_semaphore(&semaphore_create_info, None)?;
            self.in_flight_fences[frame] = logical_device.create_fence(&fence_create_info, None)?;
        }
        Ok(())
    }

    pub fn update_frame_counter(&mut self) {
        self.current_frame_idx = (self.current_frame_idx + 1) % Self::MAX_FRAMES_IN_FLIGHT
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame_idx
    }

    /// # Safety
    ///
    /// This function calls low level vulkan api to destroy semaphores and fences
    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        for &semaphore in self.image_available_semaphores.iter() {
            logical_device.destroy_semaphore(semaphore, None);
        }
        for &semaphore in self.render_finished_semaphores.iter() {
            logical_device.destroy_semaphore(semaphore, None);
        }
        for &fence in self.in_flight_fences.iter() {
            logical_device.destroy_fence(fence, None);
        }
    }

    pub fn get_image_available_semaphore(&self) -> vk::Semaphore {
        self.image_available_semaphores[self.current_frame_idx]
    }

    pub fn get_render_finished_semaphore(&self) -> vk::Semaphore {
        self.render_finished_semaphores[self.current_frame_idx]
    }

    pub fn get_in_flight_fence(&self) -> vk::Fence {
        self.in_flight_fences[self.current_frame_idx]
    }

    pub fn set_image_in_flight_fence(&mut self, image_index: usize, fence: vk::Fence) {
        self.images_in_flight_fences.insert(image_index, fence);
    }

    /// The fence of the frame that last rendered to this image, or a null fence.
    pub fn get_image_in_flight_fence(&self, image_index: usize) -> vk::Fence {
        self.images_in_flight_fences
            .get(&image_index)
            .copied()
            .unwrap_or_else(vk::Fence::null)
    }

    /// A new swapchain has new images which no frame has rendered to yet.
    pub fn reset_image_in_flight_fences(&mut self) {
        self.images_in_flight_fences.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn container() -> SynchronizationContainer {
        SynchronizationContainer {
            image_available_semaphores: [vk::Semaphore::from_raw(1), vk::Semaphore::from_raw(2)],
            render_finished_semaphores: [vk::Semaphore::from_raw(3), vk::Semaphore::from_raw(4)],
            in_flight_fences: [vk::Fence::from_raw(5), vk::Fence::from_raw(6)],
            images_in_flight_fences: HashMap::new(),
            current_frame_idx: 0,
        }
    }

    #[test]
    fn frame_index_wraps_after_frames_in_flight() {
        let mut sync = container();
        assert_eq!(sync.current_frame(), 0);
        assert_eq!(sync.get_in_flight_fence(), vk::Fence::from_raw(5));
        sync.update_frame_counter();
        assert_eq!(sync.current_frame(), 1);
        assert_eq!(sync.get_image_available_semaphore(), vk::Semaphore::from_raw(2));
        assert_eq!(sync.get_render_finished_semaphore(), vk::Semaphore::from_raw(4));
        sync.update_frame_counter();
        assert_eq!(sync.current_frame(), 0);
    }

    #[test]
    fn tracks_which_fence_owns_an_image() {
        let mut sync = container();
        assert_eq!(sync.get_image_in_flight_fence(2), vk::Fence::null());
        sync.set_image_in_flight_fence(2, sync.get_in_flight_fence());
        assert_eq!(sync.get_image_in_flight_fence(2), vk::Fence::from_raw(5));
        sync.reset_image_in_flight_fences();
        assert_eq!(sync.get_image_in_flight_fence(2), vk::Fence::null());
    }
}
