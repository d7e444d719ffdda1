use crate::util::result::{Result, VulkanError};

use ash::vk;
use std::fs::File;
use std::path::Path;

pub fn create_shader_module(
    file_name: &Path,
    logical_device: &ash::Device,
) -> Result<vk::ShaderModule> {
    // the SPIR-V bytecode buffer can be freed right after the shader module has been created
    let code = read_shader_file(file_name)?;

    let shader_module_create_info = vk::ShaderModuleCreateInfo::default().code(&code);

    let shader_module =
        unsafe { logical_device.create_shader_module(&shader_module_create_info, None)? };

    Ok(shader_module)
}

fn read_shader_file(file_name: &Path) -> Result<Vec<u32>> {
    let to_read_failure = |source| VulkanError::ShaderFileReadFailure {
        source,
        shader_file: file_name.as_os_str().to_owned(),
    };
    let mut file = File::open(file_name).map_err(to_read_failure)?;
    // read_spv checks the magic number and handles the alignment of the words
    ash::util::read_spv(&mut file).map_err(to_read_failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_missing_shader_names_the_file() {
        let missing = std::env::temp_dir().join("particle_missing_shader.vert.spv");
        match read_shader_file(&missing) {
            Err(VulkanError::ShaderFileReadFailure { shader_file, .. }) => {
                assert_eq!(shader_file, missing.clone().into_os_string());
            }
            other => panic!("unexpected result {:?}", other.map(|code| code.len())),
        }
    }

    #[test]
    fn reads_spirv_words() {
        let path = std::env::temp_dir().join("particle_shader_module_test.spv");
        let magic: u32 = 0x0723_0203;
        let mut bytes = magic.to_le_bytes().to_vec();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let code = read_shader_file(&path).unwrap();
        assert_eq!(code, vec![magic, 1]);
    }
}
