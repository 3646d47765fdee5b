use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::io::Read;
use std::path::{Path, PathBuf};

use redis_if::config::Config;
use redis_if::server::{self, AppState};
use redis_if::store::{MemoryStore, SeedLoader, SharedStore};
use redis_if::txn::{self, CompareMode, RunOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one transaction request against a seeded in-memory store
    Run {
        /// Path to the request JSON, or `-` for stdin
        #[arg(short, long)]
        request: String,

        /// Seed file (YAML or JSON) loaded before the request runs
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Compare numbers only with numbers and text only with text
        #[arg(long)]
        strict: bool,

        /// Print the keyspace after the request
        #[arg(long)]
        dump: bool,
    },
    /// Serve transactions over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Seed file (YAML or JSON) loaded at startup
        #[arg(short, long)]
        seed: Option<PathBuf>,
    },
}

fn load_store(seed: Option<&Path>) -> anyhow::Result<MemoryStore> {
    match seed {
        Some(path) => {
            log::info!("Loading seed: {}", path.display());
            let seed = SeedLoader::new()
                .load_seed(path)
                .with_context(|| format!("failed to load seed {}", path.display()))?;
            Ok(seed.into_store())
        }
        None => Ok(MemoryStore::new()),
    }
}

fn read_request(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut payload = String::new();
        std::io::stdin().read_to_string(&mut payload)?;
        Ok(payload)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    match args.command {
        Commands::Run {
            request,
            seed,
            strict,
            dump,
        } => {
            env_logger::init();

            let mut store = load_store(seed.as_deref().or(config.seed.as_deref()))?;
            let options = if strict {
                RunOptions::with_mode(CompareMode::Strict)
            } else {
                config.run_options()
            };

            let payload = read_request(&request)?;
            let outcome = txn::run_json(&payload, &mut store, options)?;
            println!("{}", outcome.as_int());

            if dump {
                println!("{}", serde_json::to_string_pretty(&store.to_json())?);
            }
        }
        Commands::Serve { port, seed } => {
            tracing_subscriber::fmt::init();

            let store = load_store(seed.as_deref().or(config.seed.as_deref()))?;
            let state = AppState {
                store: SharedStore::new(store),
                options: config.run_options(),
            };

            server::serve(port.unwrap_or(config.port), state)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}
