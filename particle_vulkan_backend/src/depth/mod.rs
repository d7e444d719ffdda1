pub mod depth_resource;
pub mod helpers;
