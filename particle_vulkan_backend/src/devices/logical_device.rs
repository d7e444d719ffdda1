use crate::devices::queues::{QueueFamilyCreateData, QueueFamilyIndices};
use crate::devices::requirements::DeviceRequirements;
use crate::util::result::Result;
use crate::util::validation::VulkanValidation;

use ash::vk;
//////////////////////// Fns ///////////////////////
pub fn create_logical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    queue_indices: &QueueFamilyIndices,
    requirements: &DeviceRequirements,
    validation: &VulkanValidation,
) -> Result<ash::Device> {
    // the priorities have to stay alive until the device is created
    let queue_create_data: Vec<QueueFamilyCreateData> = queue_indices
        .indices
        .keys()
        .map(|&queue_family_index| QueueFamilyIndices::get_best_queue_family_data(queue_family_index))
        .collect();
    let queue_create_infos: Vec<vk::DeviceQueueCreateInfo> = queue_create_data
        .iter()
        .map(|QueueFamilyCreateData(queue_family_index, _, queue_priorities)| {
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(*queue_family_index)
                .queue_priorities(queue_priorities)
        })
        .collect();

    // the example needs no optional device features
    let device_features = vk::PhysicalDeviceFeatures::default();

    let enabled_extension_names = requirements.get_enabled_extension_names();
    let enabled_layer_names = validation.get_enabled_layer_names();

    let device_create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_create_infos)
        .enabled_features(&device_features)
        .enabled_layer_names(&enabled_layer_names)
        .enabled_extension_names(&enabled_extension_names);

    let logical_device =
        unsafe { instance.create_device(physical_device, &device_create_info, None)? };

    Ok(logical_device)
}
