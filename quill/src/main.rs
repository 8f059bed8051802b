use anyhow::Result;
use clap::{Parser, Subcommand};
use quill::{AppConfig, Container, demo, open_channel, telemetry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Blog service with broker-backed commands and in-process queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration directory
    #[arg(short, long, global = true, default_value = "config")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume commands and events until Ctrl-C (default)
    Serve,
    /// Move dead-lettered messages back to their queue
    Replay {
        /// Primary queue, e.g. commands.CreatePostCommand
        queue: String,

        /// Maximum number of messages to replay
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Create a user and a post, then print the post as JSON
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    telemetry::init(&config.telemetry)?;

    let channel = open_channel(&config.broker).await?;
    let mut container = Container::build(&config, channel)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let handle = container.start().await?;
            info!("quill is running, press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            info!("shutting down");
            container.stop(handle).await?;
        }
        Commands::Replay { queue, limit } => {
            let replayed = container.replayer().replay(&queue, limit).await?;
            println!("replayed {replayed} message(s) into {queue}");
            container.channel().close().await?;
        }
        Commands::Demo => {
            let handle = container.start().await?;
            let result = demo::run(&container).await;
            container.stop(handle).await?;
            println!("{}", serde_json::to_string_pretty(&result?)?);
        }
    }

    Ok(())
}
