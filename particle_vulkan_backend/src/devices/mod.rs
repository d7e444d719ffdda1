pub mod logical_device;
pub mod physical_device;
pub mod queues;
pub mod requirements;
