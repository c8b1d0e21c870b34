use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use switch_source::{config, discover, output, rewrite};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(clap::Args)]
struct SwitchArgs {
    /// The PTO filename, optional if there is only one PTO file
    #[arg(value_name = "FILENAME")]
    filename: Option<PathBuf>,

    /// Layout to switch to (default from config, stock: TIFF)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    filetype: Option<String>,

    /// Hugin's directory, glob wildcards allowed
    #[arg(long, value_name = "HUGIN_DIR")]
    hugin: Option<String>,
}

#[derive(Parser)]
#[command(name = "switch-source")]
#[command(about = "Switches a Hugin file to different input files")]
#[command(long_about = "\
Switches a Hugin file to different input files

Rewrites every image line (i ...) of a .pto project so its n\"dir/name.ext\"
source points at another layout, keeping the image basename:

  i w4000 h3000 ... n\"jpeg/IMG_0001.jpg\"
  i w4000 h3000 ... n\"tiff16/IMG_0001.tif\"

Stock layouts:
  TIFF  tiff16/*.tif
  JPEG  jpeg/*.jpg

The project is replaced only if at least one line changed.
Run 'switch-source gen-config' to generate a documented switch-source.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding switch-source.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Switch a project's source images to another layout
    Switch(SwitchArgs),
    /// List the known layouts
    Layouts,
    /// Print a stock switch-source.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Switch(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let registry = config.layout_registry()?;

            let hugin_pattern = args
                .hugin
                .or_else(|| config.hugin_dir.clone())
                .unwrap_or_else(|| discover::default_hugin_pattern().to_string());
            let hugin_dir = discover::find_tool_dir(&hugin_pattern)?;
            debug!(hugin = %hugin_dir.display(), "found Hugin");

            let target_name = args.filetype.as_deref().unwrap_or(&config.default_layout);
            let target = registry.get(target_name)?;

            let project = match args.filename {
                Some(filename) => filename,
                None => discover::find_project_file(Path::new("."))?,
            };

            output::print_switch_header(&project, target);
            let result = rewrite::rewrite(&project, target)?;
            output::print_rewrite_result(&result);
        }
        Command::Layouts => {
            let config = config::load_config(&cli.config_dir)?;
            let registry = config.layout_registry()?;
            output::print_layouts(&registry, &config.default_layout);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
