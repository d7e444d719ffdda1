use crate::{
    buffers::{buffer::UploadStrategy, index_buffer::IndexBuffer, vertex_buffer::VertexBuffer},
    depth::{depth_resource::DepthResource, helpers::find_depth_format},
    devices::{
        logical_device::create_logical_device,
        physical_device::{
            format_device_list, get_device_name, list_physical_devices, pick_physical_device,
        },
        queues::{QueueFamilyIndices, QueueMap},
        requirements::DeviceRequirements,
    },
    drawing::{
        command_buffers::{self, DrawResources},
        framebuffers,
        synchronization::SynchronizationContainer,
    },
    graphics_pipeline::GraphicsPipeline,
    models::mesh::Mesh,
    presentation::{image_views::ImageViews, swap_chain::SwapChainContainer},
    uniforms::{
        buffers::UniformBuffers,
        descriptors::{create_descriptor_set_layout, DescriptorData},
    },
    util::{
        debug::VulkanDebug,
        platform::{self, SurfaceContainer},
        result::{Result, VulkanError},
        validation::VulkanValidation,
    },
    window::{WindowSize, WindowSurface},
};
use ash::{prelude::VkResult, vk};
use log::{debug, info};
use particle_common::{
    config::{ResourceConfig, Settings},
    uniforms::UniformBufferObject,
    view::ViewState,
};
use std::{ffi::CString, path::PathBuf};

const ENGINE_NAME: &std::ffi::CStr = c"particle";
const VERTEX_SHADER_FILE: &str = "shaders/spv/triangle.vert.spv";
const FRAGMENT_SHADER_FILE: &str = "shaders/spv/triangle.frag.spv";

/// This structure wraps all the objects that depend on the swap-chain in order to be able to recreate them when the swap-chain images change.
/// Swap-chain is a series of framebuffers that can be drawn to and later presented to the graphics display.
struct SwapChainDependentFields {
    swap_chain_container: SwapChainContainer,
    image_views_container: ImageViews,
    depth_resource: DepthResource,
    framebuffers: Vec<vk::Framebuffer>,
    uniform_buffers: UniformBuffers,
    descriptor_data: DescriptorData,
    command_buffers: Vec<vk::CommandBuffer>,
}

/// Compiled SPIR-V files of the pipeline.
pub struct ShaderFiles {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Renders the triangle mesh into a window surface.
/// It owns every vulkan object from the instance down to the per-frame synchronization primitives.
pub struct ParticleRenderer {
    _entry: ash::Entry,
    instance: ash::Instance,
    debug: VulkanDebug,
    surface_container: SurfaceContainer,
    physical_device: vk::PhysicalDevice,
    device_name: String,
    logical_device: ash::Device,
    queue_indices: QueueFamilyIndices,
    queues: QueueMap,
    depth_format: vk::Format,
    descriptor_set_layout: vk::DescriptorSetLayout,
    graphics_pipeline: GraphicsPipeline,
    command_pool: vk::CommandPool,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    dependent_fields: Option<SwapChainDependentFields>,
    sync_container: SynchronizationContainer,
    vsync: bool,
    /// This field is used to determine whether the window was resized.
    /// The swapchain is recreated after the next present.
    pub window_resized: bool,
    /// This field is used to determine whether the display window was minimized.
    /// When the window is minimized then nothing needs to be rendered.
    pub window_minimized: bool,
}

/// This enum informs us during which part of the draw-frame process a window resize happened
enum ResizeDetectedLocation {
    InAcquire,
    InPresent,
}

impl ShaderFiles {
    pub fn resolve(resource_config: &ResourceConfig) -> Result<Self> {
        Ok(Self {
            vertex: resource_config.resolve_resource(VERTEX_SHADER_FILE)?,
            fragment: resource_config.resolve_resource(FRAGMENT_SHADER_FILE)?,
        })
    }
}

impl ParticleRenderer {
    /// Runs the whole bootstrap sequence: instance, surface, device, swapchain, render pass, pipeline, buffers.
    /// The shaders are resolved next to the running executable.
    pub fn new(
        settings: &Settings,
        window_surface: &WindowSurface,
        window_size: &WindowSize,
    ) -> Result<Self> {
        let shader_files = ShaderFiles::resolve(&ResourceConfig::new()?)?;
        Self::with_shaders(settings, window_surface, window_size, &shader_files)
    }

    pub fn with_shaders(
        settings: &Settings,
        window_surface: &WindowSurface,
        window_size: &WindowSize,
        shader_files: &ShaderFiles,
    ) -> Result<Self> {
        let entry = unsafe { ash::Entry::load()? };
        let validation = VulkanValidation::from_settings(settings.validation);
        // creating the instance is equivalent to initializing the vulkan library
        let instance = Self::create_instance(&settings.title, &entry, &validation, window_surface)?;
        let debug = VulkanDebug::new(&entry, &instance, &validation)?;
        // listed before selection so the list is there even when no device is suitable
        if settings.list_gpus {
            println!("{}", format_device_list(&list_physical_devices(&instance)?));
        }
        // creating a surface to present images to
        let surface_container = platform::create_surface(&entry, &instance, window_surface)?;
        let requirements = DeviceRequirements::for_presentation();
        let physical_device = pick_physical_device(
            &instance,
            &surface_container,
            &requirements,
            settings.gpu_index,
        )?;
        let device_name = get_device_name(&instance, physical_device)?;
        // create logical device and queues
        let queue_indices = QueueFamilyIndices::find(
            &instance,
            physical_device,
            &surface_container,
            &requirements,
        )?;
        let logical_device = create_logical_device(
            &instance,
            physical_device,
            &queue_indices,
            &requirements,
            &validation,
        )?;
        let queues = QueueMap::new(&queue_indices, &logical_device);

        let command_pool = command_buffers::create_command_pool(&logical_device, &queue_indices)?;
        let sync_container = SynchronizationContainer::create(&logical_device)?;

        let mesh = Mesh::triangle();
        let upload_strategy = UploadStrategy::from_settings(settings.staging);
        let vertex_buffer = VertexBuffer::new(
            &mesh.vertices,
            &instance,
            physical_device,
            &logical_device,
            command_pool,
            &queues,
            upload_strategy,
        )?;
        let index_buffer = IndexBuffer::new(
            &mesh.indices,
            &instance,
            physical_device,
            &logical_device,
            command_pool,
            &queues,
            upload_strategy,
        )?;

        let descriptor_set_layout = create_descriptor_set_layout(&logical_device)?;

        let swap_chain_container = SwapChainContainer::new(
            &instance,
            physical_device,
            &logical_device,
            &surface_container,
            window_size,
            &queue_indices,
            settings.vsync,
        )?;
        let depth_format = find_depth_format(&instance, physical_device)?;

        let graphics_pipeline = GraphicsPipeline::new(
            &logical_device,
            swap_chain_container.swap_chain_format.format,
            depth_format,
            descriptor_set_layout,
            &shader_files.vertex,
            &shader_files.fragment,
        )?;

        let dependent_fields = Self::create_swapchain_dependent_fields(
            &instance,
            physical_device,
            &logical_device,
            swap_chain_container,
            depth_format,
            descriptor_set_layout,
            &graphics_pipeline,
            command_pool,
            &vertex_buffer,
            &index_buffer,
        )?;

        info!("Renderer ready on {}", device_name);

        Ok(Self {
            _entry: entry,
            instance,
            debug,
            surface_container,
            physical_device,
            device_name,
            logical_device,
            queue_indices,
            queues,
            depth_format,
            descriptor_set_layout,
            graphics_pipeline,
            command_pool,
            vertex_buffer,
            index_buffer,
            dependent_fields: Some(dependent_fields),
            sync_container,
            vsync: settings.vsync,
            window_resized: false,
            window_minimized: false,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Swapchain dependent fields are the ones that we need to recreate for example anytime that the window size changes
    #[allow(clippy::too_many_arguments)]
    fn create_swapchain_dependent_fields(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        logical_device: &ash::Device,
        swap_chain_container: SwapChainContainer,
        depth_format: vk::Format,
        descriptor_set_layout: vk::DescriptorSetLayout,
        graphics_pipeline: &GraphicsPipeline,
        command_pool: vk::CommandPool,
        vertex_buffer: &VertexBuffer,
        index_buffer: &IndexBuffer,
    ) -> Result<SwapChainDependentFields> {
        let image_views_container = ImageViews::new(logical_device, &swap_chain_container)?;

        let depth_resource = DepthResource::new(
            depth_format,
            instance,
            logical_device,
            physical_device,
            &swap_chain_container,
        )?;

        let framebuffers = framebuffers::create_framebuffers(
            logical_device,
            graphics_pipeline,
            &image_views_container,
            depth_resource.depth_image_view,
            &swap_chain_container,
        )?;

        let uniform_buffers = UniformBuffers::new(
            instance,
            physical_device,
            logical_device,
            swap_chain_container.swap_chain_images.len(),
        )?;

        let descriptor_data =
            DescriptorData::new(logical_device, descriptor_set_layout, &uniform_buffers)?;

        // command buffers are released when we destroy the pool
        let command_buffers = command_buffers::create_command_buffers(
            logical_device,
            command_pool,
            &DrawResources {
                graphics_pipeline,
                framebuffers: &framebuffers,
                extent: swap_chain_container.swap_chain_extent,
                vertex_buffer,
                index_buffer,
                descriptor_data: &descriptor_data,
            },
        )?;

        Ok(SwapChainDependentFields {
            swap_chain_container,
            image_views_container,
            depth_resource,
            framebuffers,
            uniform_buffers,
            descriptor_data,
            command_buffers,
        })
    }

    /// The swap-chain is a series of framebuffers that are to be presented to the graphics display.
    /// If the display changes size, then we need to recreate it.
    pub fn recreate_swap_chain(&mut self, window_size: &WindowSize) -> Result<()> {
        if window_size.is_zero_area() {
            self.window_minimized = true;
            return Ok(());
        }

        unsafe {
            self.logical_device.device_wait_idle()?;
            self.cleanup_swap_chain();
        }

        let swap_chain_container = SwapChainContainer::new(
            &self.instance,
            self.physical_device,
            &self.logical_device,
            &self.surface_container,
            window_size,
            &self.queue_indices,
            self.vsync,
        )?;

        self.dependent_fields = Some(Self::create_swapchain_dependent_fields(
            &self.instance,
            self.physical_device,
            &self.logical_device,
            swap_chain_container,
            self.depth_format,
            self.descriptor_set_layout,
            &self.graphics_pipeline,
            self.command_pool,
            &self.vertex_buffer,
            &self.index_buffer,
        )?);
        self.sync_container.reset_image_in_flight_fences();
        debug!(
            "Recreated swap chain for window of {}x{}",
            window_size.width, window_size.height
        );

        Ok(())
    }

    /// Recreates the swap chain when `resize_needed` says so and reports whether it did.
    fn handle_resize<A>(
        &mut self,
        location: ResizeDetectedLocation,
        result: &VkResult<A>,
        suboptimal: bool,
        window_size: &WindowSize,
    ) -> Result<bool> {
        let resize_needed = resize_needed(location, result, suboptimal, self.window_resized)?;
        if resize_needed {
            self.window_resized = false;
            self.recreate_swap_chain(window_size)?;
        }
        Ok(resize_needed)
    }

    /// Goes through all the vulkan steps needed to render a frame.
    pub fn draw_frame(&mut self, window_size: &WindowSize, view_state: &ViewState) -> Result<()> {
        if self.window_minimized {
            return Ok(());
        }

        let cpu_gpu_fence = self.sync_container.get_in_flight_fence();
        unsafe {
            self.logical_device
                .wait_for_fences(&[cpu_gpu_fence], true, u64::MAX)?;
        }

        // get an available image from the swapchain
        let swap_chain_container = &self.swap_chain_dependent_fields()?.swap_chain_container;
        let acquire_result = unsafe {
            swap_chain_container
                .swap_chain_loader
                .acquire_next_image(
                    swap_chain_container.swap_chain,
                    u64::MAX,
                    self.sync_container.get_image_available_semaphore(),
                    vk::Fence::null(),
                )
        };
        if self.handle_resize(
            ResizeDetectedLocation::InAcquire,
            &acquire_result,
            false,
            window_size,
        )? {
            return Ok(());
        }
        let (available_image_index_u32, _) = acquire_result?;
        let available_image_index = usize::try_from(available_image_index_u32)?;

        // wait on fence to see if image isn't being used already by an in-flight frame
        let image_fence = self
            .sync_container
            .get_image_in_flight_fence(available_image_index);
        if image_fence != vk::Fence::null() {
            unsafe {
                self.logical_device
                    .wait_for_fences(&[image_fence], true, u64::MAX)?;
            }
        }
        // save the fence that will be used for the image used by this in-flight frame
        self.sync_container
            .set_image_in_flight_fence(available_image_index, cpu_gpu_fence);

        // after image is acquired from swap chain we can update the uniform buffer for that swap chain
        self.update_uniform_buffer(available_image_index, view_state)?;

        let dependent_fields = self.swap_chain_dependent_fields()?;
        let &command_buffer = dependent_fields
            .command_buffers
            .get(available_image_index)
            .ok_or(VulkanError::CommandBufferNotAvailable(available_image_index))?;

        // delay the color output until the presentation engine has released the image
        let wait_semaphores = [self.sync_container.get_image_available_semaphore()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [command_buffer];
        let signal_semaphores = [self.sync_container.get_render_finished_semaphore()];

        let command_buffer_submit_infos = [vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)];

        let graphics_queue = self.queues.get_graphics_queue()?;
        unsafe {
            self.logical_device.reset_fences(&[cpu_gpu_fence])?;
            self.logical_device.queue_submit(
                graphics_queue,
                &command_buffer_submit_infos,
                cpu_gpu_fence,
            )?
        }

        // present the image to swap chain
        let swap_chain_container = &dependent_fields.swap_chain_container;
        let swap_chains = [swap_chain_container.swap_chain];
        let image_indices = [available_image_index_u32];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swap_chains)
            .image_indices(&image_indices);

        let present_queue = self.queues.get_present_queue()?;
        let present_result = unsafe {
            swap_chain_container
                .swap_chain_loader
                .queue_present(present_queue, &present_info)
        };
        let suboptimal = matches!(present_result, Ok(true));

        self.handle_resize(
            ResizeDetectedLocation::InPresent,
            &present_result,
            suboptimal,
            window_size,
        )?;

        self.sync_container.update_frame_counter();

        Ok(())
    }

    /// Refreshes the transformation matrices the vertex shader reads for the given swapchain image.
    /// Images whose block is still current are left alone.
    fn update_uniform_buffer(&mut self, image_index: usize, view_state: &ViewState) -> Result<()> {
        let dependent_fields = self
            .dependent_fields
            .as_mut()
            .ok_or(VulkanError::SwapChainNotAvailable)?;
        if !dependent_fields.uniform_buffers.is_stale(image_index) {
            return Ok(());
        }
        let extent = dependent_fields.swap_chain_container.swap_chain_extent;
        let ubo = UniformBufferObject::new(extent.width, extent.height, view_state);
        dependent_fields.uniform_buffers.update(image_index, &ubo)
    }

    /// The view moved, so the uniform block of every swapchain image is outdated.
    pub fn view_changed(&mut self) {
        if let Some(dependent_fields) = self.dependent_fields.as_mut() {
            dependent_fields.uniform_buffers.mark_all_stale();
        }
    }

    fn swap_chain_dependent_fields(&self) -> Result<&SwapChainDependentFields> {
        self.dependent_fields
            .as_ref()
            .ok_or(VulkanError::SwapChainNotAvailable)
    }

    /// Block until all operations on queues are done.
    pub fn wait_until_device_idle(&self) -> Result<()> {
        unsafe {
            self.logical_device.device_wait_idle()?;
        }
        Ok(())
    }

    /// Create an Ash instance.
    /// Ash is the vulkan rust library that provides the unsafe binding functions to call vulkan API from rust.
    fn create_instance(
        window_title: &str,
        entry: &ash::Entry,
        validation: &VulkanValidation,
        window_surface: &WindowSurface,
    ) -> Result<ash::Instance> {
        if !validation.check_validation_layer_support(entry)? {
            return Err(VulkanError::RequiredValidationLayersUnsupported);
        }

        let app_name = CString::new(window_title)?;
        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(0)
            .engine_name(ENGINE_NAME)
            .engine_version(0)
            .api_version(vk::API_VERSION_1_0);

        let extension_names =
            platform::required_extension_names(window_surface.display_handle, validation.is_enabled)?;
        let layer_names = validation.get_enabled_layer_names();

        // chained so that instance creation and destruction are validated too
        let mut debug_create_info = VulkanDebug::populate_debug_create_info();
        let mut create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names);
        if validation.is_enabled {
            create_info = create_info.push_next(&mut debug_create_info);
        }

        let instance: ash::Instance = unsafe { entry.create_instance(&create_info, None)? };

        Ok(instance)
    }

    /// Cleanup all objects that depend on the swap chain
    unsafe fn cleanup_swap_chain(&mut self) {
        let Some(mut dependent_fields) = self.dependent_fields.take() else {
            return;
        };
        self.logical_device
            .free_command_buffers(self.command_pool, &dependent_fields.command_buffers);
        dependent_fields.descriptor_data.destroy(&self.logical_device);
        dependent_fields.uniform_buffers.destroy(&self.logical_device);
        framebuffers::destroy_framebuffers(&self.logical_device, &dependent_fields.framebuffers);
        dependent_fields.depth_resource.destroy(&self.logical_device);
        dependent_fields
            .image_views_container
            .destroy(&self.logical_device);
        dependent_fields.swap_chain_container.destroy();
    }
}

/// Whether a resize needs to happen depends on what `location` in draw-frame the resize happened and on the result of
/// a vulkan operation which may signal that the swapchain is out of date.
/// A resize signaled by a window event is only handled after the image got presented.
fn resize_needed<A>(
    location: ResizeDetectedLocation,
    result: &VkResult<A>,
    suboptimal: bool,
    window_resized: bool,
) -> Result<bool> {
    match (location, result) {
        (_, Err(vk::Result::ERROR_OUT_OF_DATE_KHR)) => Ok(true),
        (_, Err(error)) => Err(VulkanError::from(*error)),
        (ResizeDetectedLocation::InAcquire, Ok(_)) => Ok(false),
        (ResizeDetectedLocation::InPresent, Ok(_)) => Ok(suboptimal || window_resized),
    }
}

impl Drop for ParticleRenderer {
    fn drop(&mut self) {
        info!("ParticleRenderer exiting");
        unsafe {
            // nothing may be in flight while we destroy, there is nothing left to do on failure
            let _ = self.logical_device.device_wait_idle();
            self.cleanup_swap_chain();

            self.graphics_pipeline.destroy(&self.logical_device);
            self.logical_device
                .destroy_descriptor_set_layout(self.descriptor_set_layout, None);
            self.index_buffer.cleanup(&self.logical_device);
            self.vertex_buffer.cleanup(&self.logical_device);

            self.sync_container.destroy(&self.logical_device);
            self.logical_device
                .destroy_command_pool(self.command_pool, None);

            self.logical_device.destroy_device(None);
            self.surface_container.destroy();
            self.debug.destroy_debug_messenger();
            self.instance.destroy_instance(None);
        }
    }
}
