use std::sync::Arc;

use clap::Parser;
use fleet_arena::{init_logging, simulate_duel, EngineConfig, GameServer, ServerConfig};
use tokio::net::TcpListener;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Run the game server.
    Serve {
        #[arg(long, default_value = fleet_arena::config::DEFAULT_BIND)]
        bind: String,
        #[arg(long, default_value_t = 1000, help = "Pause before each bot shot")]
        bot_delay_ms: u64,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Play one headless duel and print a JSON summary.
    Simulate {
        #[arg(long, help = "Fix RNG seed for a reproducible duel")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            bot_delay_ms,
            seed,
        } => {
            let config = ServerConfig {
                bind,
                engine: EngineConfig {
                    bot_delay: Duration::from_millis(bot_delay_ms),
                    seed,
                },
            };
            if let Some(s) = config.engine.seed {
                println!("Using fixed seed: {} (games will be reproducible)", s);
            }
            let listener = TcpListener::bind(&config.bind).await?;
            let server = Arc::new(GameServer::new(config.engine));
            server.serve(listener).await?;
        }
        Commands::Simulate { seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            let report = simulate_duel(seed).await?;
            println!("{}", serde_json::to_string(&report)?);
        }
    }
    Ok(())
}
