use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Represents a GLSL shader source file in the filesystem.
pub struct ShaderSource {
    shader_path: PathBuf,
}

impl ShaderSource {
    pub fn new(shader_path: PathBuf) -> Self {
        Self { shader_path }
    }

    /// `.vert` and `.frag` files are the shader stages we compile.
    pub fn is_shader_source(path: &Path) -> bool {
        matches!(
            path.extension().and_then(OsStr::to_str),
            Some("vert") | Some("frag")
        )
    }

    /// `triangle.vert` compiles to `<output_dir>/triangle.vert.spv`.
    pub fn compiled_file_path(&self, output_dir: &Path) -> Option<PathBuf> {
        let file_name = self.shader_path.file_name()?;
        let mut compiled_name = file_name.to_owned();
        compiled_name.push(".spv");
        Some(output_dir.join(compiled_name))
    }

    /// Compile the GLSL shader into SPIR-V with `glslc`.
    /// The build script reruns when the source changes.
    pub fn compile(&self, params: &ShaderCompileParams) -> Result<(), String> {
        println!("cargo:rerun-if-changed={}", self.shader_path.display());

        let compiled_file_path = self
            .compiled_file_path(&params.output_dir)
            .ok_or_else(|| format!("Failed to get file name of {:?}", self.shader_path))?;
        let args = [
            self.shader_path.as_os_str(),
            &params.out_arg_flag,
            compiled_file_path.as_os_str(),
        ];

        let command_result = Command::new(ShaderCompileParams::COMPILER).args(args).output();
        match command_result {
            Err(error) => Err(format!(
                "Error running {} on {:?}: {}",
                ShaderCompileParams::COMPILER,
                self.shader_path,
                error
            )),
            Ok(output) if !output.status.success() => Err(format!(
                "Shader compile error in {:?}: {}",
                self.shader_path,
                String::from_utf8_lossy(&output.stderr)
            )),
            Ok(_) => Ok(()),
        }
    }
}

/// Input directory holding GLSL sources and the output directory receiving the SPIR-V files.
pub struct ShaderCompileParams {
    input_dir: PathBuf,
    output_dir: PathBuf,
    out_arg_flag: OsString,
}

impl ShaderCompileParams {
    const SHADERS_SRC: &'static str = "src";
    const SHADERS_SPV: &'static str = "spv";
    const COMPILER: &'static str = if cfg!(target_os = "windows") {
        "glslc.exe"
    } else {
        "glslc"
    };

    /// Sources are read from `<shader_dir>/src`, SPIR-V is written to `<output_shader_dir>/spv`.
    pub fn new(shader_dir: &Path, output_shader_dir: &Path) -> io::Result<Self> {
        let input_dir = shader_dir.join(Self::SHADERS_SRC);
        let output_dir = output_shader_dir.join(Self::SHADERS_SPV);
        fs::create_dir_all(&output_dir)?;

        // new files under the source folder need a rerun as well
        println!("cargo:rerun-if-changed={}", input_dir.display());
        Ok(Self {
            input_dir,
            output_dir,
            out_arg_flag: OsStr::new("-o").to_owned(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Locate all vertex and fragment GLSL shaders.
    pub fn collect_shader_srcs(&self) -> io::Result<Vec<ShaderSource>> {
        let mut result = Vec::new();
        if self.input_dir.is_dir() {
            for entry in fs::read_dir(&self.input_dir)? {
                let path = entry?.path();
                if path.is_file() && ShaderSource::is_shader_source(&path) {
                    result.push(ShaderSource::new(path));
                }
            }
        }
        result.sort_by(|a, b| a.shader_path.cmp(&b.shader_path));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn spv_name_keeps_stage_extension() {
        let source = ShaderSource::new(PathBuf::from("shaders/src/triangle.frag"));
        assert_eq!(
            source.compiled_file_path(Path::new("out/spv")),
            Some(PathBuf::from("out/spv/triangle.frag.spv"))
        );
    }

    #[test]
    fn only_vertex_and_fragment_sources_are_collected() {
        let root = env::temp_dir().join("particle_build_utils_shader_test");
        let _ = fs::remove_dir_all(&root);
        let src = root.join("shaders").join("src");
        fs::create_dir_all(&src).unwrap();
        for name in ["triangle.vert", "triangle.frag", "notes.txt"] {
            fs::write(src.join(name), "").unwrap();
        }

        let params =
            ShaderCompileParams::new(&root.join("shaders"), &root.join("target")).unwrap();
        assert!(params.output_dir().is_dir());

        let names: Vec<_> = params
            .collect_shader_srcs()
            .unwrap()
            .iter()
            .filter_map(|source| source.shader_path.file_name().map(OsStr::to_owned))
            .collect();
        assert_eq!(names, vec!["triangle.frag", "triangle.vert"]);
    }
}
