use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Request logging stays quiet unless RUST_LOG asks for it
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nowplaying_overlay=info".parse()?)
                .add_directive("nowplaying_core=info".parse()?)
                .add_directive("tower_http=warn".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { port } => {
            cli::commands::start::run(cli.config, port).await?;
        }
        Commands::Status => {
            cli::commands::status::run(cli.config).await?;
        }
        Commands::Encode { url } => {
            cli::commands::encode::run(cli.config, &url)?;
        }
    }

    Ok(())
}
