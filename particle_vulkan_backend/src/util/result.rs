use ash::{vk, LoadingError};
use particle_common::{propagate, result::ParticleCommonError};
use raw_window_handle::HandleError;
use std::{
    ffi::{NulError, OsString},
    num::TryFromIntError,
    str::Utf8Error,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VulkanError>;

#[derive(Error, Debug)]
pub enum VulkanError {
    #[error("Failed to find command buffer with index: {0}")]
    CommandBufferNotAvailable(usize),
    // depth
    #[error("Failed to find a supported depth format")]
    DepthFailedToFindSupportedFormat,
    // descriptors
    #[error("Incorrect number of descriptors sets: {0}")]
    DescriptorSetNotAvailable(usize),
    // instance
    #[error("Application name is not a valid C string: {0}")]
    InvalidApplicationName(NulError),
    // memory
    #[error("Failed to find suitable memory type")]
    MemoryFailedToFindType,
    // propagating common errors
    #[error(transparent)]
    ParticleCommonError(ParticleCommonError),
    // validation
    #[error("No available layers")]
    NoValidationLayers,
    #[error("Failed to create physical device. No GPU with supported functions")]
    PhysicalDeviceNoGpu,
    // queues
    #[error("Failed to create queue indices")]
    QueueCreationFailed,
    #[error("Failed to find graphics queue")]
    QueueGraphicsNotFound,
    #[error("Failed to find present queue")]
    QueuePresentNotFound,
    // Pipeline
    #[error("Failed to create graphics pipeline")]
    PipelineCreateError,
    // validation
    #[error("Not all required validation layers are supported")]
    RequiredValidationLayersUnsupported,
    // shaders
    #[error("Failed to read shader: {shader_file:?}. Reason: {source:?}")]
    ShaderFileReadFailure {
        source: std::io::Error,
        shader_file: OsString,
    },
    // swap chain errors
    #[error("Failed to choose a swap chain format")]
    SwapChainFormatsError,
    #[error("The swap chain is not available, its last recreation failed")]
    SwapChainNotAvailable,
    // uniform buffer errors
    #[error("No uniform buffer for swap chain image with index {0}")]
    UniformBufferNotAvailable(usize),
    // fallback errors
    #[error(transparent)]
    AshLoadingError(LoadingError),
    #[error(transparent)]
    OtherVkResult(vk::Result),
    #[error(transparent)]
    VulkanStringConversionError(Utf8Error),
    #[error(transparent)]
    VulkanUsizeConversionError(TryFromIntError),
    #[error(transparent)]
    WindowHandleError(HandleError),
}

propagate!(
    VulkanError,
    AshLoadingError as LoadingError,
    InvalidApplicationName as NulError,
    OtherVkResult as vk::Result,
    VulkanStringConversionError as Utf8Error,
    VulkanUsizeConversionError as TryFromIntError,
    WindowHandleError as HandleError,
    ParticleCommonError as ParticleCommonError;
    using_panic_feature
);
