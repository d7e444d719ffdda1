use ash::vk;
//////////////////////// Consts ///////////////////////
pub const INDEX_TYPE_VK_TYPE: vk::IndexType = vk::IndexType::UINT32;
//////////////////////// Types ///////////////////////
pub type IndexType = u32;
