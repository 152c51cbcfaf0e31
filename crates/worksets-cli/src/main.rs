use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "worksets")]
#[command(about = "Worksets CLI - inspect and maintain stored desktop sessions", long_about = None)]
struct Cli {
    /// Use this directory instead of the per-user worksets directory
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sanitized session for any session file
    Validate {
        /// Session JSON file to check
        file: PathBuf,
    },
    /// Summarize the stored session
    Show,
    /// Copy the stored session to a timestamped backup
    Backup,
    /// List exported worksets and collections
    List,
    /// Export one workset of the stored session
    Export {
        /// Name of the workset
        workset: String,
    },
    /// Check the application-chooser helper against its checksum
    VerifyHelper {
        /// Helper path (defaults to the configured one)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Expected SHA-256 (defaults to the configured one)
        #[arg(long)]
        expected: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = commands::utils::resolve_paths(cli.config_dir)?;
    let config = commands::utils::load_config(&paths);
    let _log_guard = commands::utils::init_logging(&config, &paths);

    match cli.command {
        Commands::Validate { file } => commands::session::validate(&file)?,
        Commands::Show => commands::session::show(&paths).await?,
        Commands::Backup => commands::session::backup(&paths).await?,
        Commands::List => commands::objects::list(&paths).await?,
        Commands::Export { workset } => commands::objects::export(&paths, &workset).await?,
        Commands::VerifyHelper { path, expected } => {
            commands::helper::verify(&config, path, expected)?
        }
    }

    Ok(())
}
