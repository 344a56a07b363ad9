//! Principles API entry point
//!
//! # Usage
//!
//! ```bash
//! # Start the server (reads MONGO_URI from the environment or .env)
//! principles-api serve --port 5000
//!
//! # Run without a database
//! principles-api serve --in-memory
//!
//! # Check that the configured MongoDB deployment is reachable
//! principles-api ping
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use principles_api::{connect_store, create_router, serve, AppState};
use principles_core::config::{DEFAULT_DATABASE, MONGO_DATABASE_VAR, MONGO_URI_VAR};
use principles_core::{DotEnv, InMemoryPrincipleStore, MongoPrincipleStore, ServiceSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "principles-api")]
#[command(about = "REST API for the principles collection")]
#[command(version)]
struct Cli {
    /// .env file loaded before settings are read
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "json", env = "LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000", env = "PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Keep principles in process memory instead of MongoDB
        #[arg(long)]
        in_memory: bool,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Connect to MongoDB and report whether it answers
    Ping {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args)]
struct StoreArgs {
    /// MongoDB connection string
    #[arg(long, env = MONGO_URI_VAR, hide_env_values = true)]
    mongo_uri: Option<String>,

    /// Database holding the principles collection
    #[arg(long, env = MONGO_DATABASE_VAR, default_value = DEFAULT_DATABASE)]
    database: String,
}

impl StoreArgs {
    fn settings(&self) -> ServiceSettings {
        ServiceSettings::new(self.mongo_uri.clone()).with_database(&self.database)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

fn main() -> anyhow::Result<()> {
    // The environment must be complete before clap reads `env` defaults,
    // so parse once for --env-file, apply it, then parse again.
    let env_file = Cli::parse().env_file;
    let dotenv = DotEnv::load_optional(&env_file)?;
    let applied = dotenv.as_ref().map(DotEnv::apply).unwrap_or_default();
    let cli = Cli::parse();

    init_tracing(cli.log_format);
    if let Some(dotenv) = &dotenv {
        tracing::info!(
            path = %dotenv.path().display(),
            applied = applied.len(),
            "Loaded environment file"
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let exit_code = runtime.block_on(run(cli.command))?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

async fn run(command: Commands) -> anyhow::Result<i32> {
    match command {
        Commands::Serve {
            port,
            host,
            in_memory,
            store,
        } => {
            let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

            let router = if in_memory {
                tracing::info!("Using in-memory principle store");
                create_router(AppState::new(Arc::new(InMemoryPrincipleStore::new())))
            } else {
                let store = connect_store(&store.settings()).await;
                create_router(AppState::<MongoPrincipleStore>::from_option(store))
            };

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "Starting Principles API on {}",
                addr
            );
            serve(router, addr).await?;
            Ok(0)
        }

        Commands::Ping { store } => match connect_store(&store.settings()).await {
            Some(store) => {
                println!(
                    "{}",
                    serde_json::json!({ "status": "ok", "database": store.database() })
                );
                Ok(0)
            }
            None => {
                println!("{}", serde_json::json!({ "status": "error" }));
                Ok(1)
            }
        },
    }
}
