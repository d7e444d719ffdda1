use crate::uniforms::buffers::UniformBuffers;
use crate::util::result::{Result, VulkanError};

use ash::vk;
//////////////////////// Structs ///////////////////////
#[derive(Debug)]
pub struct DescriptorData {
    pub descriptor_pool: vk::DescriptorPool,
    pub descriptor_sets: Vec<vk::DescriptorSet>,
}
//////////////////////// Impls ///////////////////////
impl DescriptorData {
    pub fn new(
        logical_device: &ash::Device,
        descriptor_layout: vk::DescriptorSetLayout,
        uniform_buffers: &UniformBuffers,
    ) -> Result<Self> {
        let descriptor_pool = Self::create_descriptor_pool(logical_device, uniform_buffers.len())?;
        let descriptor_sets = match Self::create_descriptor_sets(
            logical_device,
            descriptor_pool,
            descriptor_layout,
            uniform_buffers,
        ) {
            Ok(descriptor_sets) => descriptor_sets,
            Err(err) => {
                unsafe { logical_device.destroy_descriptor_pool(descriptor_pool, None) };
                return Err(err);
            }
        };

        Ok(Self {
            descriptor_pool,
            descriptor_sets,
        })
    }

    fn create_descriptor_pool(
        logical_device: &ash::Device,
        image_count: usize,
    ) -> Result<vk::DescriptorPool> {
        let swap_chain_img_cnt = u32::try_from(image_count)?;

        let descriptor_pool_sizes = [vk::DescriptorPoolSize {
            ty: vk::DescriptorType::UNIFORM_BUFFER,
            descriptor_count: swap_chain_img_cnt,
        }];

        let create_info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&descriptor_pool_sizes)
            .max_sets(swap_chain_img_cnt);

        let descriptor_pool = unsafe { logical_device.create_descriptor_pool(&create_info, None)? };

        Ok(descriptor_pool)
    }

    fn create_descriptor_sets(
        logical_device: &ash::Device,
        descriptor_pool: vk::DescriptorPool,
        descriptor_layout: vk::DescriptorSetLayout,
        uniform_buffers: &UniformBuffers,
    ) -> Result<Vec<vk::DescriptorSet>> {
        let layouts = vec![descriptor_layout; uniform_buffers.len()];

        let descriptor_alloc_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(descriptor_pool)
            .set_layouts(&layouts);

        let descriptor_sets =
            unsafe { logical_device.allocate_descriptor_sets(&descriptor_alloc_info)? };

        for (buf_idx, uniform_buffer) in uniform_buffers.buffers.iter().enumerate() {
            let &descriptor_set = descriptor_sets
                .get(buf_idx)
                .ok_or(VulkanError::DescriptorSetNotAvailable(buf_idx))?;

            let descriptor_buffer_infos = [vk::DescriptorBufferInfo {
                buffer: uniform_buffer.buffer,
                offset: 0,
                range: vk::DeviceSize::try_from(UniformBuffers::UNIFORM_SIZE)?,
            }];

            let descriptor_write_info = [vk::WriteDescriptorSet::default()
                .dst_set(descriptor_set)
                .dst_binding(0)
                .dst_array_element(0)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&descriptor_buffer_infos)];

            unsafe {
                logical_device.update_descriptor_sets(&descriptor_write_info, &[]);
            }
        }

        Ok(descriptor_sets)
    }

    // the sets are freed together with the pool
    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        logical_device.destroy_descriptor_pool(self.descriptor_pool, None);
    }
}
//////////////////////// Fns ///////////////////////
pub fn create_descriptor_set_layout(
    logical_device: &ash::Device,
) -> Result<vk::DescriptorSetLayout> {
    let bindings = uniform_layout_bindings();

    let descriptor_layout_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);

    let descriptor_layout =
        unsafe { logical_device.create_descriptor_set_layout(&descriptor_layout_info, None)? };

    Ok(descriptor_layout)
}

// binding 0: the vertex shader's UBO
fn uniform_layout_bindings() -> [vk::DescriptorSetLayoutBinding<'static>; 1] {
    [vk::DescriptorSetLayoutBinding::default()
        .binding(0)
        .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
        .descriptor_count(1)
        .stage_flags(vk::ShaderStageFlags::VERTEX)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_bound_for_vertex_stage() {
        let [binding] = uniform_layout_bindings();
        assert_eq!(binding.binding, 0);
        assert_eq!(binding.descriptor_type, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(binding.descriptor_count, 1);
        assert_eq!(binding.stage_flags, vk::ShaderStageFlags::VERTEX);
    }
}
