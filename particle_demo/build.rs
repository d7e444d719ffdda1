use particle_build_utils::tools::process_app_resources;

fn main() {
    if let Err(error) = process_app_resources("shaders") {
        println!("cargo:warning={}", error);
    }
}
