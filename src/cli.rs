use clap::{Parser, Subcommand};

use crate::domain::constants::CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "sarp",
    version,
    about = "Serverless application repository publisher"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = CONFIG_FILE,
        help = "Publish configuration file"
    )]
    pub config: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Publish,
    Package,
    Show {
        name: Option<String>,
    },
}
