use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "issuedeck", version, about = "Terminal client for an issue tracker")]
pub struct Cli {
    /// Root of the issue tracker API, e.g. http://localhost:3000.
    #[arg(long, env = "ISSUEDECK_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Path to config file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Give up on a request after this many seconds.
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,

    /// Colour theme (dark, light, contrast).
    #[arg(long)]
    pub theme: Option<String>,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
