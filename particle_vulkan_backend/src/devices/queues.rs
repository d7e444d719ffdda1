use crate::devices::requirements::DeviceRequirements;
use crate::util::platform::SurfaceContainer;
use crate::util::result::{Result, VulkanError};

use log::{debug, info};

use ash::vk;
use std::collections::{HashMap, HashSet};

#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub enum QueueType {
    QueueWithFlag(vk::QueueFlags),
    PresentQueue,
}

pub const GRAPHICS_QUEUE: QueueType = QueueType::QueueWithFlag(vk::QueueFlags::GRAPHICS);

/// Which queue family serves which of the required queue types.
pub struct QueueFamilyIndices {
    pub indices: HashMap<u32, Vec<QueueType>>,
    pub queue_index_map: HashMap<QueueType, u32>,
}

pub struct QueueFamilyCreateData(pub u32, pub u32, pub Vec<f32>);

#[derive(Debug, Clone)]
struct QueueData(u32, HashSet<QueueType>);

pub struct QueueMap {
    queues: HashMap<QueueType, vk::Queue>,
}

impl QueueFamilyIndices {
    pub fn find(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        surface: &SurfaceContainer,
        requirements: &DeviceRequirements,
    ) -> Result<Self> {
        let device_queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };

        let mut queue_data_points = Vec::new();
        for (queue_family_index, queue_family) in (0u32..).zip(device_queue_families.iter()) {
            if queue_family.queue_count == 0 {
                continue;
            }
            let mut queue_data = QueueData(queue_family_index, HashSet::new());
            for &required_family in requirements.required_queues.iter() {
                match required_family {
                    QueueType::QueueWithFlag(queue_flag) => {
                        if queue_family.queue_flags.contains(queue_flag) {
                            queue_data.1.insert(required_family);
                        }
                    }
                    QueueType::PresentQueue => {
                        if has_present_function(surface, physical_device, queue_family_index)? {
                            queue_data.1.insert(required_family);
                        }
                    }
                }
            }
            if !queue_data.1.is_empty() {
                queue_data_points.push(queue_data);
            }
        }

        debug!("Found queue data points: {:?}", queue_data_points);

        let indices = assign_queue_families(queue_data_points, &requirements.required_queues)?;
        info!("Found indices: {:?}", indices);
        Ok(Self::from_indices(indices))
    }

    fn from_indices(indices: HashMap<u32, Vec<QueueType>>) -> Self {
        let mut queue_index_map = HashMap::new();
        for (&queue_family_index, queue_types) in indices.iter() {
            for &queue_type in queue_types {
                queue_index_map.insert(queue_type, queue_family_index);
            }
        }
        QueueFamilyIndices {
            indices,
            queue_index_map,
        }
    }

    pub fn graphics_family(&self) -> Result<u32> {
        self.queue_index_map
            .get(&GRAPHICS_QUEUE)
            .copied()
            .ok_or(VulkanError::QueueGraphicsNotFound)
    }

    /// Sharing mode and family indices for images that are used by every found queue family.
    pub fn get_image_sharing_details(&self) -> (vk::SharingMode, Vec<u32>) {
        let mut indices_needed: Vec<u32> = self.indices.keys().copied().collect();
        indices_needed.sort_unstable();
        if indices_needed.len() > 1 {
            (vk::SharingMode::CONCURRENT, indices_needed)
        } else {
            (vk::SharingMode::EXCLUSIVE, Vec::new())
        }
    }

    pub fn get_best_queue_family_data(queue_family_index: u32) -> QueueFamilyCreateData {
        QueueFamilyCreateData(queue_family_index, 1, vec![1.0_f32])
    }
}

// greedily take the family that covers most of the still missing queue types,
// preferring the lower family index on ties
fn assign_queue_families(
    mut queue_data_points: Vec<QueueData>,
    required_queues: &HashSet<QueueType>,
) -> Result<HashMap<u32, Vec<QueueType>>> {
    let mut remaining_queue_types = required_queues.clone();
    let mut indices: HashMap<u32, Vec<QueueType>> = HashMap::new();

    while !remaining_queue_types.is_empty() {
        queue_data_points.sort_by(|a, b| a.1.len().cmp(&b.1.len()).then(b.0.cmp(&a.0)));
        let best = match queue_data_points.pop() {
            Some(best) if !best.1.is_empty() => best,
            _ => return Err(VulkanError::QueueCreationFailed),
        };
        for queue_data_point in queue_data_points.iter_mut() {
            for queue_type in best.1.iter() {
                queue_data_point.1.remove(queue_type);
            }
        }

        let entry = indices.entry(best.0).or_default();
        for queue_type in best.1 {
            remaining_queue_types.remove(&queue_type);
            entry.push(queue_type);
        }
    }

    Ok(indices)
}

impl QueueMap {
    pub fn new(queue_indices: &QueueFamilyIndices, logical_device: &ash::Device) -> Self {
        let mut queues = HashMap::new();
        for (&queue_type, &queue_family_index) in queue_indices.queue_index_map.iter() {
            let queue = unsafe { logical_device.get_device_queue(queue_family_index, 0) };
            queues.insert(queue_type, queue);
        }
        Self { queues }
    }

    pub fn get_graphics_queue(&self) -> Result<vk::Queue> {
        self.queues
            .get(&GRAPHICS_QUEUE)
            .copied()
            .ok_or(VulkanError::QueueGraphicsNotFound)
    }

    pub fn get_present_queue(&self) -> Result<vk::Queue> {
        self.queues
            .get(&QueueType::PresentQueue)
            .copied()
            .ok_or(VulkanError::QueuePresentNotFound)
    }
}

pub fn has_present_function(
    surface: &SurfaceContainer,
    physical_device: vk::PhysicalDevice,
    queue_family_index: u32,
) -> Result<bool> {
    let is_present_support = unsafe {
        surface.surface_loader.get_physical_device_surface_support(
            physical_device,
            queue_family_index,
            surface.surface,
        )
    }?;
    Ok(is_present_support)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> HashSet<QueueType> {
        [GRAPHICS_QUEUE, QueueType::PresentQueue].into_iter().collect()
    }

    fn data(index: u32, types: &[QueueType]) -> QueueData {
        QueueData(index, types.iter().copied().collect())
    }

    #[test]
    fn prefers_family_that_can_do_both() {
        let points = vec![
            data(0, &[GRAPHICS_QUEUE]),
            data(1, &[GRAPHICS_QUEUE, QueueType::PresentQueue]),
            data(2, &[QueueType::PresentQueue]),
        ];
        let indices = assign_queue_families(points, &required()).unwrap();
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[&1].len(), 2);

        let family_indices = QueueFamilyIndices::from_indices(indices);
        assert_eq!(family_indices.graphics_family().unwrap(), 1);
        let (sharing_mode, shared) = family_indices.get_image_sharing_details();
        assert_eq!(sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert!(shared.is_empty());
    }

    #[test]
    fn splits_graphics_and_present_over_two_families() {
        let points = vec![
            data(0, &[GRAPHICS_QUEUE]),
            data(3, &[QueueType::PresentQueue]),
        ];
        let family_indices =
            QueueFamilyIndices::from_indices(assign_queue_families(points, &required()).unwrap());
        assert_eq!(family_indices.queue_index_map[&GRAPHICS_QUEUE], 0);
        assert_eq!(family_indices.queue_index_map[&QueueType::PresentQueue], 3);
        let (sharing_mode, shared) = family_indices.get_image_sharing_details();
        assert_eq!(sharing_mode, vk::SharingMode::CONCURRENT);
        assert_eq!(shared, vec![0, 3]);
    }

    #[test]
    fn fails_without_present_support() {
        let points = vec![data(0, &[GRAPHICS_QUEUE]), data(1, &[GRAPHICS_QUEUE])];
        assert!(matches!(
            assign_queue_families(points, &required()),
            Err(VulkanError::QueueCreationFailed)
        ));
    }
}
