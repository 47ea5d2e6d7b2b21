//! `vitrine` command-line viewer.

use std::path::PathBuf;

use clap::Parser;
use vitrine::{config::DEFAULT_CONFIG_PATH, Viewer};

#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Interactive 3D model viewer with clickable hotspots")]
struct Args {
    /// Configuration document (JSON or TOML)
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Window title (defaults to the configured title)
    #[arg(long)]
    title: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut builder = Viewer::builder().with_config_path(&args.config);
    if let Some(title) = args.title {
        builder = builder.with_title(title);
    }
    if let Err(e) = builder.build().run() {
        log::error!("{}: {e}", args.config.display());
        std::process::exit(1);
    }
}
