extern crate nalgebra_glm as glm;

pub mod backend;
pub mod buffers;
pub mod depth;
pub mod devices;
pub mod drawing;
pub mod graphics_pipeline;
pub mod models;
pub mod presentation;
pub mod uniforms;
pub mod util;
pub mod window;
