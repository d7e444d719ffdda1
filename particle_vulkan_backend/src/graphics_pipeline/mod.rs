pub mod render_pass;
pub mod shader_module;

use crate::graphics_pipeline::render_pass::create_render_pass;
use crate::graphics_pipeline::shader_module::create_shader_module;
use crate::models::vertex::Vertex;
use crate::util::result::{Result, VulkanError};

use log::debug;

use ash::vk;
use std::ffi::CStr;
use std::path::Path;

pub struct GraphicsPipeline {
    pub render_pass: vk::RenderPass,
    pub pipeline_layout: vk::PipelineLayout,
    pub pipeline_cache: vk::PipelineCache,
    pub pipeline: vk::Pipeline,
}

impl GraphicsPipeline {
    pub const CLEAR_VALUES: [vk::ClearValue; 2] = [
        vk::ClearValue {
            color: vk::ClearColorValue {
                float32: [0.0, 0.0, 0.2, 1.0],
            },
        },
        vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue {
                depth: 1.0,
                stencil: 0,
            },
        },
    ];

    // viewport and scissor are set while recording so the pipeline survives swapchain resizes
    pub const DYNAMIC_STATES: [vk::DynamicState; 2] =
        [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];

    const SHADER_ENTRY_POINT: &'static CStr = c"main";

    pub fn new(
        logical_device: &ash::Device,
        color_format: vk::Format,
        depth_format: vk::Format,
        descriptor_set_layout: vk::DescriptorSetLayout,
        vertex_shader_file: &Path,
        fragment_shader_file: &Path,
    ) -> Result<Self> {
        let pipeline_cache_create_info = vk::PipelineCacheCreateInfo::default();
        let pipeline_cache =
            unsafe { logical_device.create_pipeline_cache(&pipeline_cache_create_info, None)? };

        let render_pass = create_render_pass(logical_device, color_format, depth_format)?;

        let set_layouts = [descriptor_set_layout];
        let pipeline_layout_create_info =
            vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);
        let pipeline_layout =
            unsafe { logical_device.create_pipeline_layout(&pipeline_layout_create_info, None)? };

        let mut graphics_pipeline = Self {
            render_pass,
            pipeline_layout,
            pipeline_cache,
            pipeline: vk::Pipeline::null(),
        };

        let vert_shader = create_shader_module(vertex_shader_file, logical_device)?;
        let frag_shader = match create_shader_module(fragment_shader_file, logical_device) {
            Ok(frag_shader) => frag_shader,
            Err(err) => {
                unsafe { logical_device.destroy_shader_module(vert_shader, None) };
                return Err(err);
            }
        };

        let pipeline = graphics_pipeline.create_pipeline(logical_device, vert_shader, frag_shader);

        // the shader modules are compiled into the pipeline and can go right away
        unsafe {
            logical_device.destroy_shader_module(vert_shader, None);
            logical_device.destroy_shader_module(frag_shader, None);
        }

        graphics_pipeline.pipeline = match pipeline {
            Ok(pipeline) => pipeline,
            Err(err) => {
                unsafe { graphics_pipeline.destroy(logical_device) };
                return Err(err);
            }
        };
        debug!("Created graphics pipeline");
        Ok(graphics_pipeline)
    }

    fn create_pipeline(
        &self,
        logical_device: &ash::Device,
        vert_shader: vk::ShaderModule,
        frag_shader: vk::ShaderModule,
    ) -> Result<vk::Pipeline> {
        ////////////////////////////
        // PROGRAMABLE stages
        ////////////////////////////
        let pipeline_stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vert_shader)
                .name(Self::SHADER_ENTRY_POINT),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(frag_shader)
                .name(Self::SHADER_ENTRY_POINT),
        ];

        ////////////////////////////
        // FIXED FUNCTION stages
        ////////////////////////////
        let vertex_input_bindings = [Vertex::get_binding_description()?];
        let vertex_input_attributes = Vertex::get_attribute_descriptions()?;

        let vertex_input_create_info = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&vertex_input_bindings)
            .vertex_attribute_descriptions(&vertex_input_attributes);

        let input_assembly_create_info = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST)
            .primitive_restart_enable(false);

        // only the counts matter, the actual viewport and scissor are dynamic
        let viewport_create_info = vk::PipelineViewportStateCreateInfo::default()
            .viewport_count(1)
            .scissor_count(1);

        let rasterization_create_info = vk::PipelineRasterizationStateCreateInfo::default()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(vk::PolygonMode::FILL)
            .line_width(1.0)
            .cull_mode(vk::CullModeFlags::NONE)
            .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
            .depth_bias_enable(false);

        let multisampling_create_info = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);

        let depth_stencil_create_info = vk::PipelineDepthStencilStateCreateInfo::default()
            .depth_test_enable(true)
            .depth_write_enable(true)
            .depth_compare_op(vk::CompareOp::LESS_OR_EQUAL)
            .depth_bounds_test_enable(false)
            .stencil_test_enable(false)
            .back(vk::StencilOpState {
                fail_op: vk::StencilOp::KEEP,
                pass_op: vk::StencilOp::KEEP,
                compare_op: vk::CompareOp::ALWAYS,
                ..Default::default()
            })
            .front(vk::StencilOpState {
                fail_op: vk::StencilOp::KEEP,
                pass_op: vk::StencilOp::KEEP,
                compare_op: vk::CompareOp::ALWAYS,
                ..Default::default()
            });

        let color_blend_attachment_states = [vk::PipelineColorBlendAttachmentState {
            color_write_mask: vk::ColorComponentFlags::RGBA,
            blend_enable: vk::FALSE,
            ..Default::default()
        }];

        let color_blending_create_info = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .attachments(&color_blend_attachment_states);

        let dynamic_state_create_info =
            vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&Self::DYNAMIC_STATES);

        let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
            // programmable stages
            .stages(&pipeline_stages)
            // fixed function stages
            .vertex_input_state(&vertex_input_create_info)
            .input_assembly_state(&input_assembly_create_info)
            .viewport_state(&viewport_create_info)
            .rasterization_state(&rasterization_create_info)
            .multisample_state(&multisampling_create_info)
            .depth_stencil_state(&depth_stencil_create_info)
            .color_blend_state(&color_blending_create_info)
            .dynamic_state(&dynamic_state_create_info)
            // layout defining uniforms etc
            .layout(self.pipeline_layout)
            // render pass and index of subpass where pipeline will be used
            .render_pass(self.render_pass)
            .subpass(0)
            .base_pipeline_index(-1);

        let graphics_pipelines = unsafe {
            logical_device
                .create_graphics_pipelines(self.pipeline_cache, &[pipeline_create_info], None)
                .map_err(|(_, result)| VulkanError::from(result))?
        };

        graphics_pipelines
            .first()
            .copied()
            .ok_or(VulkanError::PipelineCreateError)
    }

    // null handles are ignored by the destroy calls
    pub unsafe fn destroy(&self, logical_device: &ash::Device) {
        logical_device.destroy_pipeline(self.pipeline, None);
        logical_device.destroy_pipeline_layout(self.pipeline_layout, None);
        logical_device.destroy_render_pass(self.render_pass, None);
        logical_device.destroy_pipeline_cache(self.pipeline_cache, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clears_to_dark_blue_and_far_depth() {
        let [color, depth] = GraphicsPipeline::CLEAR_VALUES;
        unsafe {
            assert_eq!(color.color.float32, [0.0, 0.0, 0.2, 1.0]);
            assert_eq!(depth.depth_stencil.depth, 1.0);
            assert_eq!(depth.depth_stencil.stencil, 0);
        }
    }

    #[test]
    fn viewport_and_scissor_are_dynamic() {
        assert!(GraphicsPipeline::DYNAMIC_STATES.contains(&vk::DynamicState::VIEWPORT));
        assert!(GraphicsPipeline::DYNAMIC_STATES.contains(&vk::DynamicState::SCISSOR));
    }
}
