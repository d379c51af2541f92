use clap::{Parser, Subcommand};
use gsmloc_provider::Provider;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gsmloc-cli")]
#[command(about = "Locate this machine from the GSM cell its modem is registered on")]
struct Cli {
    /// Print compact JSON instead of pretty-printed output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read and normalize the serving cell identity
    Cell,
    /// Run one full position lookup
    Position,
    /// Show provider status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = gsmloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Diagnostics go to stderr so stdout stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let provider = Provider::from_config(&config)?;
    let output = match cli.command {
        Commands::Cell => serde_json::to_value(provider.cell_identity().await?)?,
        Commands::Position => serde_json::to_value(provider.position().await?)?,
        Commands::Status => serde_json::json!({
            "status": provider.status(),
            "provider": provider.info(),
        }),
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");
    Ok(())
}
