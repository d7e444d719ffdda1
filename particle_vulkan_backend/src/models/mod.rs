pub mod index;
pub mod mesh;
pub mod vertex;
