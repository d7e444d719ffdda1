use std::path::{Path, PathBuf};
//////////////////////// Fns ///////////////////////
/// Finds the `<target>/<profile>` directory from a build script's `OUT_DIR`,
/// which cargo places under `<target>/<profile>/build/<crate>-<hash>/out`.
///
/// This is a hack because build scripts shouldn't write outside of OUT_DIR.
/// For a binary crate it is the simplest way to put resources next to the executable.
pub fn get_target_from_out_dir(out_dir: &Path) -> Option<PathBuf> {
    out_dir
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == "build"))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_build_script_dirs() {
        let out_dir = Path::new("/work/target/debug/build/particle_demo-1234abcd/out");
        assert_eq!(
            get_target_from_out_dir(out_dir),
            Some(PathBuf::from("/work/target/debug"))
        );
    }

    #[test]
    fn no_build_dir_means_no_target() {
        assert_eq!(get_target_from_out_dir(Path::new("/tmp/out")), None);
    }
}
