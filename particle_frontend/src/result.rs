use particle_common::{propagate, result::ParticleCommonError};
use particle_vulkan_backend::util::result::VulkanError;
use thiserror::Error;
use winit::error::{EventLoopError, OsError};

pub type Result<T> = std::result::Result<T, ParticleError>;

#[derive(Error, Debug)]
pub enum ParticleError {
    #[error(transparent)]
    ParticleCommonError(ParticleCommonError),
    #[error(transparent)]
    VulkanError(VulkanError),
    #[error(transparent)]
    WinitOSError(OsError),
    #[error(transparent)]
    WinitEventLoopError(EventLoopError),
}

propagate!(
    ParticleError,
    ParticleCommonError as ParticleCommonError,
    VulkanError as VulkanError,
    WinitOSError as OsError,
    WinitEventLoopError as EventLoopError;
    using_panic_feature
);
