use std::{
    fs,
    io::Result,
    path::{Path, PathBuf},
};

/// A folder of resource files (shader sources and compiled shaders) belonging to an application.
/// The bundle is copied to a location where the executable finds it by a relative path.
pub struct ResourceBundle {
    pub resource_dir_path: PathBuf,
}

impl ResourceBundle {
    pub fn new(resource_dir_path: PathBuf) -> Self {
        println!("cargo:rerun-if-changed={}", resource_dir_path.display());
        Self { resource_dir_path }
    }

    /// Copies the bundle contents into `target_dir`, creating it when needed.
    pub fn copy_bundle_to_location(&self, target_dir: &Path) -> Result<()> {
        fs::create_dir_all(target_dir)?;
        let mut accumulated_path = target_dir.to_owned();
        Self::copy_recursive(&self.resource_dir_path, &mut accumulated_path)
    }

    fn copy_recursive(source_path: &Path, accumulated_path: &mut PathBuf) -> Result<()> {
        for entry in fs::read_dir(source_path)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name() else {
                continue;
            };
            accumulated_path.push(file_name);
            if path.is_dir() {
                fs::create_dir_all(accumulated_path.as_path())?;
                Self::copy_recursive(&path, accumulated_path)?;
            } else {
                fs::copy(&path, accumulated_path.as_path())?;
            }
            accumulated_path.pop();
        }
        Ok(())
    }
}
