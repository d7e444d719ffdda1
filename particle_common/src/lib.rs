//! Shared pieces of the particle example: settings, timing, the view state and the uniform block.

pub mod config;
pub mod frame_timer;
pub mod macros;
pub mod result;
pub mod uniforms;
pub mod view;
