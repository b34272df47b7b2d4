use std::path::PathBuf;

use clap::Parser;
use gridbrawl::prelude::*;
use tracing_subscriber::EnvFilter;

/// Authoritative server for the Gridbrawl arena.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Port to listen on
    port: u16,

    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// JSON world config (grid size, obstacles, max players)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra obstacles scattered over free cells at startup
    #[arg(long)]
    random_obstacles: Option<usize>,

    /// Seed for the obstacle scatter
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut world = match &args.config {
        Some(path) => load_world_config(path)?,
        None => WorldConfig::default(),
    };
    if let Some(n) = args.random_obstacles {
        world.random_obstacles = n;
    }
    if args.seed.is_some() {
        world.seed = args.seed;
    }

    let server = GridbrawlServerBuilder::new()
        .bind(&format!("{}:{}", args.host, args.port))
        .world_config(world)
        .build()
        .await?;

    server.run().await?;
    Ok(())
}
