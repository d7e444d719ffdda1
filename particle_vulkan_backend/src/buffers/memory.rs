use crate::devices::queues::QueueMap;
use crate::drawing::command_buffers::{begin_single_time_commands, end_single_time_commands};
use crate::util::result::{Result, VulkanError};

use ash::{prelude::VkResult, vk};
use std::os::raw::c_void;

pub fn copy_buffer(
    src_buffer: vk::Buffer,
    dst_buffer: vk::Buffer,
    size: vk::DeviceSize,
    logical_device: &ash::Device,
    command_pool: vk::CommandPool,
    queues: &QueueMap,
) -> Result<()> {
    let command_buffer = begin_single_time_commands(logical_device, command_pool)?;

    let copy_regions = [vk::BufferCopy {
        src_offset: 0,
        dst_offset: 0,
        size,
    }];

    unsafe {
        logical_device.cmd_copy_buffer(command_buffer, src_buffer, dst_buffer, &copy_regions);
    }

    end_single_time_commands(command_buffer, logical_device, queues, command_pool)
}

pub fn create_buffer_memory(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    logical_device: &ash::Device,
    buffer: vk::Buffer,
    memory_property_requirements: vk::MemoryPropertyFlags,
) -> Result<vk::DeviceMemory> {
    let memory_requirements = unsafe { logical_device.get_buffer_memory_requirements(buffer) };

    let device_memory = allocate_memory(
        instance,
        physical_device,
        logical_device,
        memory_requirements,
        memory_property_requirements,
    )?;

    let bind_result = unsafe { logical_device.bind_buffer_memory(buffer, device_memory, 0) };
    free_on_bind_failure(bind_result, || unsafe {
        logical_device.free_memory(device_memory, None)
    })?;

    Ok(device_memory)
}

pub fn create_image_memory(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    logical_device: &ash::Device,
    image: vk::Image,
    memory_property_requirements: vk::MemoryPropertyFlags,
) -> Result<vk::DeviceMemory> {
    let memory_requirements = unsafe { logical_device.get_image_memory_requirements(image) };

    let device_memory = allocate_memory(
        instance,
        physical_device,
        logical_device,
        memory_requirements,
        memory_property_requirements,
    )?;

    let bind_result = unsafe { logical_device.bind_image_memory(image, device_memory, 0) };
    free_on_bind_failure(bind_result, || unsafe {
        logical_device.free_memory(device_memory, None)
    })?;

    Ok(device_memory)
}

// memory that could not be bound is owned by nobody and has to go right away
fn free_on_bind_failure<F>(bind_result: VkResult<()>, free_memory: F) -> Result<()>
where
    F: FnOnce(),
{
    if let Err(err) = bind_result {
        free_memory();
        return Err(err.into());
    }
    Ok(())
}

fn allocate_memory(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    logical_device: &ash::Device,
    memory_requirements: vk::MemoryRequirements,
    memory_property_requirements: vk::MemoryPropertyFlags,
) -> Result<vk::DeviceMemory> {
    let mem_properties = unsafe { instance.get_physical_device_memory_properties(physical_device) };

    let memory_type_index = find_memory_type(
        memory_requirements.memory_type_bits,
        memory_property_requirements,
        &mem_properties,
    )?;

    let memory_allocate_info = vk::MemoryAllocateInfo::default()
        .allocation_size(memory_requirements.size)
        .memory_type_index(memory_type_index);

    let device_memory = unsafe { logical_device.allocate_memory(&memory_allocate_info, None)? };
    Ok(device_memory)
}

/// Copies `data` into the start of host visible memory.
/// The memory has to be HOST_COHERENT, no flush is issued.
pub unsafe fn fill_buffer<T: Copy>(
    logical_device: &ash::Device,
    buffer_memory: vk::DeviceMemory,
    data: &[T],
) -> Result<()> {
    let size = vk::DeviceSize::try_from(std::mem::size_of_val(data))?;

    let data_ptr = logical_device.map_memory(buffer_memory, 0, size, vk::MemoryMapFlags::empty())?;

    copy_slice_to_memory(data, data_ptr);

    // with a coherent memory type the writes are visible to the device on the next queue submit
    logical_device.unmap_memory(buffer_memory);

    Ok(())
}

unsafe fn copy_slice_to_memory<T: Copy>(data: &[T], data_target_ptr: *mut c_void) {
    std::ptr::copy_nonoverlapping(data.as_ptr(), data_target_ptr as *mut T, data.len());
}

pub fn find_memory_type(
    type_filter_bitfield: u32,
    required_properties: vk::MemoryPropertyFlags,
    mem_properties: &vk::PhysicalDeviceMemoryProperties,
) -> Result<u32> {
    let memory_type_count = mem_properties.memory_type_count as usize;
    for (i, mem_type) in mem_properties
        .memory_types
        .iter()
        .take(memory_type_count)
        .enumerate()
    {
        if type_filter_bitfield & (1 << i) != 0
            && mem_type.property_flags.contains(required_properties)
        {
            return Ok(u32::try_from(i)?);
        }
    }
    Err(VulkanError::MemoryFailedToFindType)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_properties(flags: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
        let mut properties = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: flags.len() as u32,
            ..Default::default()
        };
        for (i, &property_flags) in flags.iter().enumerate() {
            properties.memory_types[i] = vk::MemoryType {
                property_flags,
                heap_index: 0,
            };
        }
        properties
    }

    #[test]
    fn finds_first_type_with_required_properties() {
        let properties = memory_properties(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            vk::MemoryPropertyFlags::HOST_VISIBLE,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ]);
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        assert_eq!(find_memory_type(0b111, host, &properties).unwrap(), 2);
        assert_eq!(
            find_memory_type(0b111, vk::MemoryPropertyFlags::DEVICE_LOCAL, &properties).unwrap(),
            0
        );
    }

    #[test]
    fn respects_type_filter() {
        let properties = memory_properties(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ]);
        assert_eq!(
            find_memory_type(0b10, vk::MemoryPropertyFlags::DEVICE_LOCAL, &properties).unwrap(),
            1
        );
        assert!(matches!(
            find_memory_type(0b11, vk::MemoryPropertyFlags::HOST_VISIBLE, &properties),
            Err(VulkanError::MemoryFailedToFindType)
        ));
    }

    #[test]
    fn copies_whole_slice() {
        let source = [1u32, 2, 3];
        let mut target = [0u32; 3];
        unsafe { copy_slice_to_memory(&source, target.as_mut_ptr() as *mut c_void) };
        assert_eq!(target, source);
    }

    #[test]
    fn failed_bind_frees_the_allocation() {
        let freed = std::cell::Cell::new(false);
        let result = free_on_bind_failure(Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY), || {
            freed.set(true)
        });
        assert!(matches!(
            result,
            Err(VulkanError::OtherVkResult(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY))
        ));
        assert!(freed.get());

        freed.set(false);
        assert!(free_on_bind_failure(Ok(()), || freed.set(true)).is_ok());
        assert!(!freed.get());
    }
}
