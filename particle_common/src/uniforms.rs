use nalgebra_glm::{self as glm, Mat4, Vec3};

use crate::view::ViewState;
//////////////////////// Structs ///////////////////////
// the field order has to match the uniform block of the vertex shader:
// layout(set = 0, binding = 0) uniform UBO { mat4 projectionMatrix; mat4 modelMatrix; mat4 viewMatrix; }
// mat4 is 64 bytes so no manual padding is needed between the fields
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy)]
pub struct UniformBufferObject {
    pub projection: Mat4,
    pub model: Mat4,
    pub view: Mat4,
}
//////////////////////// Impls ///////////////////////
impl UniformBufferObject {
    pub const FOV_Y_DEGREES: f32 = 60.0;
    pub const Z_NEAR: f32 = 0.1;
    pub const Z_FAR: f32 = 256.0;

    /// Builds the transformation matrices for a framebuffer of `width` x `height` seen through `view_state`.
    pub fn new(width: u32, height: u32, view_state: &ViewState) -> Self {
        let aspect_ratio = width as f32 / height.max(1) as f32;
        // vulkan uses a [0, 1] depth range so the zero-to-one variant is needed here
        let projection = glm::perspective_rh_zo(
            aspect_ratio,
            Self::FOV_Y_DEGREES.to_radians(),
            Self::Z_NEAR,
            Self::Z_FAR,
        );

        let view = glm::translate(&Mat4::identity(), &Vec3::new(0.0, 0.0, view_state.zoom));

        let mut model = Mat4::identity();
        model = glm::rotate(
            &model,
            view_state.rotation.x.to_radians(),
            &Vec3::new(1.0, 0.0, 0.0),
        );
        model = glm::rotate(
            &model,
            view_state.rotation.y.to_radians(),
            &Vec3::new(0.0, 1.0, 0.0),
        );
        model = glm::rotate(
            &model,
            view_state.rotation.z.to_radians(),
            &Vec3::new(0.0, 0.0, 1.0),
        );

        Self {
            projection,
            model,
            view,
        }
    }
}
//////////////////////// Fns ///////////////////////
/// # Safety
///
/// The target has to point at mapped memory that is valid for writes of a `T`.
pub unsafe fn copy_uniform_to_memory<T>(src: &T, memory_data_target_ptr: *mut core::ffi::c_void)
where
    T: Sized,
{
    let target_ptr = memory_data_target_ptr as *mut T;
    target_ptr.copy_from_nonoverlapping(src as *const T, 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::Vec4;

    #[test]
    fn layout_matches_shader_block() {
        assert_eq!(std::mem::size_of::<UniformBufferObject>(), 3 * 64);
        assert_eq!(std::mem::align_of::<UniformBufferObject>(), 16);
    }

    #[test]
    fn initial_view_translates_by_zoom() {
        let ubo = UniformBufferObject::new(1280, 720, &ViewState::new());
        assert_eq!(ubo.model, Mat4::identity());
        let origin = ubo.view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.z - ViewState::INITIAL_ZOOM).abs() < 1e-6);
    }

    #[test]
    fn projection_maps_depth_to_zero_one() {
        let ubo = UniformBufferObject::new(800, 600, &ViewState::new());
        let near = ubo.projection * Vec4::new(0.0, 0.0, -UniformBufferObject::Z_NEAR, 1.0);
        let far = ubo.projection * Vec4::new(0.0, 0.0, -UniformBufferObject::Z_FAR, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_is_applied_in_degrees() {
        let mut view_state = ViewState::new();
        view_state.rotation.z = 90.0;
        let ubo = UniformBufferObject::new(800, 600, &view_state);
        let rotated = ubo.model * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(rotated.x.abs() < 1e-5);
        assert!((rotated.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn copies_into_raw_memory() {
        let ubo = UniformBufferObject::new(800, 600, &ViewState::new());
        let mut target = std::mem::MaybeUninit::<UniformBufferObject>::uninit();
        let copied = unsafe {
            copy_uniform_to_memory(&ubo, target.as_mut_ptr() as *mut core::ffi::c_void);
            target.assume_init()
        };
        assert_eq!(copied.view, ubo.view);
    }
}
