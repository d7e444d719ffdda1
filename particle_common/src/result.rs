use std::{ffi::OsString, io};

use crate::propagate;
use thiserror::Error;
//////////////////////// Types ///////////////////////
pub type Result<T> = std::result::Result<T, ParticleCommonError>;
//////////////////////// Enums ///////////////////////
#[derive(Error, Debug)]
pub enum ParticleCommonError {
    #[error("Failed to get base directory from executable")]
    ExecutableBaseDirError,
    #[error("Invalid window extent {width}x{height}. Both sides must be non-zero")]
    InvalidWindowExtent { width: u32, height: u32 },
    #[error(transparent)]
    IoError(io::Error),
    #[error("Resource {0:?} failed to resolve")]
    ResourceFailedToResolve(OsString),
}
//////////////////////// Impls ///////////////////////
propagate!(ParticleCommonError, IoError as io::Error, using_panic_feature);
