pub mod command_buffers;
pub mod framebuffers;
pub mod synchronization;
