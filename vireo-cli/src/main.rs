use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vireo", version, about = "Vireo view compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the view islands in a source file.
    Build {
        /// Path to the source file
        input: PathBuf,
        /// Output directory (default: target/vireo-gen)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Compile and report diagnostics without writing output.
    Check {
        /// Path to the source file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Build { input, out_dir } => {
            vireo_cli::build_cmd(&input, out_dir.as_deref())?;
        }
        Commands::Check { input } => vireo_cli::check_cmd(&input)?,
    }
    Ok(())
}
