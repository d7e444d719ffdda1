use crate::{
    build_hacks::get_target_from_out_dir, resource_bundle::ResourceBundle,
    shader_compilation::ShaderCompileParams,
};
use std::{env, path::PathBuf};

/// Copies the `resource_folder_name` folder of the crate being built next to its executable
/// and compiles the shaders under `<resource_folder_name>/src` into `<resource_folder_name>/spv` there.
/// Individual shader compile failures are reported as cargo warnings.
pub fn process_app_resources(resource_folder_name: &str) -> Result<(), String> {
    // manifest dir is where the Cargo.toml of the crate being built is
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|err| err.to_string())?;
    let resource_dir = PathBuf::from(manifest_dir).join(resource_folder_name);
    let resource_bundle = ResourceBundle::new(resource_dir.clone());

    let out_dir = env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?;
    let profile_dir = get_target_from_out_dir(&PathBuf::from(out_dir))
        .ok_or("Failed to find the target directory from OUT_DIR")?;
    let target_dir = profile_dir.join(resource_folder_name);

    resource_bundle
        .copy_bundle_to_location(&target_dir)
        .map_err(|err| format!("Failed to copy resources: {}", err))?;

    let shader_compile_params = ShaderCompileParams::new(&resource_dir, &target_dir)
        .map_err(|err| format!("Failed to create shader output dir: {}", err))?;
    let shader_srcs = shader_compile_params
        .collect_shader_srcs()
        .map_err(|err| format!("Failed to collect shader sources: {}", err))?;

    for shader_src in shader_srcs {
        if let Err(error) = shader_src.compile(&shader_compile_params) {
            println!("cargo:warning={}", error);
        }
    }
    Ok(())
}
