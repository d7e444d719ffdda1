//! Window, input and main loop of the particle example. Drives the vulkan renderer.

extern crate nalgebra_glm as glm;

pub mod input;
pub mod main_loop;
pub mod result;
pub mod winit_window;
