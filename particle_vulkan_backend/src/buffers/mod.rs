pub mod buffer;
pub mod index_buffer;
pub mod memory;
pub mod vertex_buffer;
