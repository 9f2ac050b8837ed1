use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "astrobiochem-explorer")]
#[command(version, about = "Explore exoplanet habitability scores")]
pub struct Cli {
    /// Load this catalog file (.csv, .json, .parquet) instead of the NASA archive
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Config file (default: platform config dir, config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base directory for molecule images
    #[arg(short, long)]
    pub resources: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
