use atlas::cli::{self, Command};
use atlas::core::config;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "atlas", about = "Browse countries from the REST Countries API")]
struct Args {
    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let mut config_error = None;
    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        config_error = Some(e);
        config::AtlasConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref(), args.verbose);

    // Initialize file logger - writes to atlas.log unless configured otherwise
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = &config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!("Atlas starting up against {}", resolved.base_url);

    if let Err(e) = cli::run(resolved, args.command).await {
        log::error!("Command failed: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
