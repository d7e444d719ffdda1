//! Helpers for build scripts: compiling GLSL shaders and placing resources next to the executable.

pub mod build_hacks;
pub mod resource_bundle;
pub mod shader_compilation;
pub mod tools;
