use clap::{ArgAction, Parser};
use log::{error, info};
use particle_common::config::Settings;
use particle_frontend::main_loop::MainLoop;

/// Renders a coloured triangle with vulkan.
#[derive(Parser, Debug)]
#[command(name = "particle_demo", version, disable_help_flag = true)]
struct Args {
    /// Activate the validation layers and print their messages.
    #[arg(long, default_value_t = false)]
    validation: bool,

    /// Wait for the vertical blank when presenting.
    #[arg(long, default_value_t = false)]
    vsync: bool,

    /// Borderless fullscreen on the current monitor.
    #[arg(long, default_value_t = false)]
    fullscreen: bool,

    /// Window width.
    #[arg(short, long, default_value_t = Settings::DEFAULT_WIDTH)]
    width: u32,

    /// Window height.
    #[arg(short, long, default_value_t = Settings::DEFAULT_HEIGHT)]
    height: u32,

    /// Index of the GPU to render with, see --listgpus.
    #[arg(short, long)]
    gpu: Option<usize>,

    /// Print the available vulkan devices.
    #[arg(long = "listgpus", default_value_t = false)]
    list_gpus: bool,

    /// Upload vertex and index data into host visible memory instead of using a staging buffer.
    #[arg(long, default_value_t = false)]
    no_staging: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            validation: args.validation,
            vsync: args.vsync,
            fullscreen: args.fullscreen,
            width: args.width,
            height: args.height,
            gpu_index: args.gpu,
            list_gpus: args.list_gpus,
            staging: !args.no_staging,
            ..Settings::default()
        }
    }
}

fn run(args: Args) -> particle_frontend::result::Result<()> {
    let settings = Settings::from(args);
    settings.validate()?;
    info!("Starting with {:?}", settings);
    MainLoop::run(settings)
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        error!("{}", err);
        eprintln!("Fatal error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_map_to_default_settings() {
        let args = Args::try_parse_from(["particle_demo"]).unwrap();
        assert_eq!(Settings::from(args), Settings::default());
    }

    #[test]
    fn flags_map_to_settings() {
        let args = Args::try_parse_from([
            "particle_demo",
            "--validation",
            "--vsync",
            "-w",
            "640",
            "-h",
            "480",
            "--gpu",
            "1",
            "--listgpus",
            "--no-staging",
        ])
        .unwrap();
        let settings = Settings::from(args);
        assert!(settings.validation);
        assert!(settings.vsync);
        assert!(!settings.fullscreen);
        assert_eq!((settings.width, settings.height), (640, 480));
        assert_eq!(settings.gpu_index, Some(1));
        assert!(settings.list_gpus);
        assert!(!settings.staging);
    }

    #[test]
    fn zero_height_fails_validation() {
        let args = Args::try_parse_from(["particle_demo", "--height", "0"]).unwrap();
        assert!(Settings::from(args).validate().is_err());
    }
}
