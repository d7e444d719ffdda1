use crate::devices::queues::{has_present_function, QueueType};
use crate::devices::requirements::DeviceRequirements;
use crate::presentation::swap_chain::SwapChainSupportDetails;
use crate::util::platform::SurfaceContainer;
use crate::util::result::{Result, VulkanError};
use crate::util::tools;

use log::{error, info, trace};

use ash::vk;
use std::collections::HashSet;
use std::fmt;

/// What `--listgpus` prints for every device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDeviceSummary {
    pub index: usize,
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub api_version: u32,
}

struct RatedPhysicalDevice {
    rating: u32,
    physical_device: vk::PhysicalDevice,
    short_description: String,
    long_description: String,
}

impl fmt::Display for PhysicalDeviceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device [{}] : {}\n Type: {}\n API: {}",
            self.index,
            self.name,
            tools::physical_device_type_string(self.device_type),
            tools::api_version_string(self.api_version)
        )
    }
}

/// The `--listgpus` output: a header followed by one entry per device.
pub fn format_device_list(devices: &[PhysicalDeviceSummary]) -> String {
    let mut listing = String::from("Available Vulkan devices");
    for device in devices {
        listing.push('\n');
        listing.push_str(&device.to_string());
    }
    listing
}

pub fn get_physical_device_properties(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> vk::PhysicalDeviceProperties {
    unsafe { instance.get_physical_device_properties(physical_device) }
}

pub fn get_device_name(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> Result<String> {
    let properties = get_physical_device_properties(instance, physical_device);
    tools::vk_to_string(&properties.device_name)
}

pub fn list_physical_devices(instance: &ash::Instance) -> Result<Vec<PhysicalDeviceSummary>> {
    let physical_devices = unsafe { instance.enumerate_physical_devices()? };
    let mut summaries = Vec::with_capacity(physical_devices.len());
    for (index, &physical_device) in physical_devices.iter().enumerate() {
        let properties = get_physical_device_properties(instance, physical_device);
        summaries.push(PhysicalDeviceSummary {
            index,
            name: tools::vk_to_string(&properties.device_name)?,
            device_type: properties.device_type,
            api_version: properties.api_version,
        });
    }
    Ok(summaries)
}

// the device is implicitly destroyed when instance is destroyed
pub fn pick_physical_device(
    instance: &ash::Instance,
    surface_container: &SurfaceContainer,
    requirements: &DeviceRequirements,
    gpu_index: Option<usize>,
) -> Result<vk::PhysicalDevice> {
    let physical_devices = unsafe { instance.enumerate_physical_devices()? };
    if physical_devices.is_empty() {
        return Err(VulkanError::PhysicalDeviceNoGpu);
    }

    let mut rated_physical_devices = Vec::with_capacity(physical_devices.len());
    for &physical_device in physical_devices.iter() {
        rated_physical_devices.push(rate_physical_device(
            instance,
            physical_device,
            surface_container,
            requirements,
        )?);
    }

    if let Some(index) = gpu_index {
        if index >= rated_physical_devices.len() {
            error!(
                "Selected device index {} is out of range, picking the best rated device instead",
                index
            );
        } else if rated_physical_devices[index].rating == 0 {
            error!(
                "Selected device {} does not meet the requirements, picking the best rated device instead",
                rated_physical_devices[index].short_description
            );
        }
    }

    let ratings: Vec<u32> = rated_physical_devices.iter().map(|d| d.rating).collect();
    let selected = select_device_index(&ratings, gpu_index)
        .and_then(|index| rated_physical_devices.get(index))
        .ok_or(VulkanError::PhysicalDeviceNoGpu)?;

    info!(
        "Selected physical device: name = {}, rating = {}",
        selected.short_description, selected.rating
    );
    trace!("Description:\n{}", selected.long_description);
    Ok(selected.physical_device)
}

/// Index of the device to use. An explicit in-range index of a suitable device wins,
/// otherwise the highest rated suitable device (the first one on ties).
pub fn select_device_index(ratings: &[u32], gpu_index: Option<usize>) -> Option<usize> {
    if let Some(index) = gpu_index {
        if ratings.get(index).is_some_and(|&rating| rating > 0) {
            return Some(index);
        }
    }
    ratings
        .iter()
        .enumerate()
        .filter(|&(_, &rating)| rating > 0)
        .fold(None, |best: Option<(usize, u32)>, (index, &rating)| match best {
            Some((_, best_rating)) if best_rating >= rating => best,
            _ => Some((index, rating)),
        })
        .map(|(index, _)| index)
}

pub fn rate_device_type(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 1000,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 100,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 10,
        vk::PhysicalDeviceType::CPU => 1,
        _ => 1,
    }
}

// device is a handle and implements copy
fn rate_physical_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    surface_container: &SurfaceContainer,
    requirements: &DeviceRequirements,
) -> Result<RatedPhysicalDevice> {
    let physical_device_properties = get_physical_device_properties(instance, physical_device);
    let device_queue_families =
        unsafe { instance.get_physical_device_queue_family_properties(physical_device) };

    let short_description = tools::vk_to_string(&physical_device_properties.device_name)?;
    let mut long_description = format!(
        "Name: {}\nType: {}\nVersion: {}\n",
        short_description,
        tools::physical_device_type_string(physical_device_properties.device_type),
        tools::api_version_string(physical_device_properties.api_version)
    );
    let mut rated = RatedPhysicalDevice {
        rating: 0,
        physical_device,
        short_description,
        long_description: String::new(),
    };

    // if we don't match required device extensions then return 0 as rating
    if !check_device_extensions(
        instance,
        physical_device,
        requirements,
        &mut long_description,
    )? {
        rated.long_description = long_description;
        return Ok(rated);
    }

    let mut found_queue_families = HashSet::new();
    for (queue_family_idx, queue_family) in (0u32..).zip(device_queue_families.iter()) {
        long_description.push_str(&format!("Queue Count: {:2} ", queue_family.queue_count));
        if queue_family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            long_description.push_str("| Graphics Queue: supported ");
            found_queue_families.insert(QueueType::QueueWithFlag(vk::QueueFlags::GRAPHICS));
        } else {
            long_description.push_str("| Graphics Queue: unsupported ");
        };
        if has_present_function(surface_container, physical_device, queue_family_idx)? {
            long_description.push_str("| Present: supported ");
            found_queue_families.insert(QueueType::PresentQueue);
        } else {
            long_description.push_str("| Present: unsupported ");
        }
        long_description.push('\n');
    }

    if !requirements
        .required_queues
        .is_subset(&found_queue_families)
    {
        long_description.push_str("Required queues are not supported\n");
        rated.long_description = long_description;
        return Ok(rated);
    }

    let swap_query_support_details =
        SwapChainSupportDetails::query_support(physical_device, surface_container)?;
    if !(requirements.is_swap_chain_adequate_check)(&swap_query_support_details) {
        long_description.push_str("Swap chain doesn't pass adequate check\n");
        rated.long_description = long_description;
        return Ok(rated);
    }

    rated.rating = rate_device_type(physical_device_properties.device_type);
    rated.long_description = long_description;
    Ok(rated)
}

fn check_device_extensions(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    requirements: &DeviceRequirements,
    description: &mut String,
) -> Result<bool> {
    let available_extensions =
        unsafe { instance.enumerate_device_extension_properties(physical_device)? };

    description.push_str("\tAvailable Device Extensions:\n");
    let mut available_extension_names = Vec::with_capacity(available_extensions.len());
    for extension in available_extensions.iter() {
        if let Some(extension_name) = tools::vk_to_cstr(&extension.extension_name) {
            description.push_str(&format!(
                "\t\tName: {}, Version: {}\n",
                extension_name.to_string_lossy(),
                extension.spec_version
            ));
            available_extension_names.push(extension_name);
        }
    }

    let missing = requirements.missing_extensions(&available_extension_names);
    for extension_name in missing.iter() {
        description.push_str(&format!("\tMissing extension: {:?}\n", extension_name));
    }
    Ok(missing.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_beats_integrated_beats_cpu() {
        assert!(
            rate_device_type(vk::PhysicalDeviceType::DISCRETE_GPU)
                > rate_device_type(vk::PhysicalDeviceType::INTEGRATED_GPU)
        );
        assert!(
            rate_device_type(vk::PhysicalDeviceType::INTEGRATED_GPU)
                > rate_device_type(vk::PhysicalDeviceType::VIRTUAL_GPU)
        );
        assert!(
            rate_device_type(vk::PhysicalDeviceType::VIRTUAL_GPU)
                > rate_device_type(vk::PhysicalDeviceType::CPU)
        );
    }

    #[test]
    fn picks_best_rating_without_explicit_index() {
        assert_eq!(select_device_index(&[100, 1000, 1000], None), Some(1));
        assert_eq!(select_device_index(&[0, 0], None), None);
        assert_eq!(select_device_index(&[], None), None);
    }

    #[test]
    fn explicit_index_wins_when_usable() {
        assert_eq!(select_device_index(&[1000, 100], Some(1)), Some(1));
        // out of range falls back to rating
        assert_eq!(select_device_index(&[100, 1000], Some(5)), Some(1));
        // unsuitable device falls back to rating
        assert_eq!(select_device_index(&[0, 100], Some(0)), Some(1));
    }

    #[test]
    fn summary_lists_name_type_and_version() {
        let summary = PhysicalDeviceSummary {
            index: 0,
            name: "llvmpipe".to_owned(),
            device_type: vk::PhysicalDeviceType::CPU,
            api_version: vk::make_api_version(0, 1, 3, 0),
        };
        assert_eq!(
            summary.to_string(),
            "Device [0] : llvmpipe\n Type: CPU\n API: 1.3.0"
        );
    }

    #[test]
    fn device_list_starts_with_header() {
        let devices = [PhysicalDeviceSummary {
            index: 0,
            name: String::from("llvmpipe"),
            device_type: vk::PhysicalDeviceType::CPU,
            api_version: vk::make_api_version(0, 1, 3, 0),
        }];
        assert_eq!(
            format_device_list(&devices),
            "Available Vulkan devices\nDevice [0] : llvmpipe\n Type: CPU\n API: 1.3.0"
        );
        assert_eq!(format_device_list(&[]), "Available Vulkan devices");
    }
}
