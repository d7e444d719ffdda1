use crate::util::result::Result;

use ash::vk;
use memoffset::offset_of;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: glm::Vec3,
    pub color: glm::Vec3,
}

impl Vertex {
    pub fn new(pos: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            pos: glm::vec3(pos[0], pos[1], pos[2]),
            color: glm::vec3(color[0], color[1], color[2]),
        }
    }

    pub fn get_binding_description() -> Result<vk::VertexInputBindingDescription> {
        Ok(vk::VertexInputBindingDescription {
            // index of the binding in the array of bindings
            binding: 0,
            stride: u32::try_from(std::mem::size_of::<Self>())?,
            input_rate: vk::VertexInputRate::VERTEX,
        })
    }

    pub fn get_attribute_descriptions() -> Result<[vk::VertexInputAttributeDescription; 2]> {
        Ok([
            vk::VertexInputAttributeDescription {
                binding: 0,
                // vertex shader location 0 -> position
                location: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: u32::try_from(offset_of!(Vertex, pos))?,
            },
            vk::VertexInputAttributeDescription {
                binding: 0,
                // vertex shader location 1 -> color
                location: 1,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: u32::try_from(offset_of!(Vertex, color))?,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_strides_over_whole_vertex() {
        let binding = Vertex::get_binding_description().unwrap();
        assert_eq!(binding.binding, 0);
        assert_eq!(binding.stride, 24);
        assert_eq!(binding.input_rate, vk::VertexInputRate::VERTEX);
    }

    #[test]
    fn attributes_point_at_position_and_color() {
        let [position, color] = Vertex::get_attribute_descriptions().unwrap();
        assert_eq!((position.location, position.offset), (0, 0));
        assert_eq!((color.location, color.offset), (1, 12));
        assert_eq!(position.format, vk::Format::R32G32B32_SFLOAT);
        assert_eq!(color.format, vk::Format::R32G32B32_SFLOAT);
    }
}
