//! townsquare CLI binary entry point.

use tracing_subscriber::EnvFilter;

use townsquare::cli::commands::{handle_call, handle_serve};
use townsquare::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("townsquare=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(config, args).await,
        Commands::Call(args) => handle_call(config, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
