//! Address Book Server Binary
//!
//! Starts the TCP server for the address book.
//!
//! Settings come from the defaults, then `ADDRESSBOOK_*` environment
//! variables, then command line flags.

use std::sync::Arc;

use addressbook::network::Server;
use addressbook::{Backend, Config, Directory};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Address Book Server
#[derive(Parser, Debug)]
#[command(name = "addressbook-server")]
#[command(about = "Concurrent address book with glob lookups")]
#[command(version)]
struct Args {
    /// Listen address (host:port) [default: 127.0.0.1:9090]
    #[arg(short, long)]
    listen: Option<String>,

    /// SQLite database URL; contacts stay in memory when unset
    #[arg(short, long)]
    database_url: Option<String>,

    /// Maximum concurrent connections [default: 1024]
    #[arg(short, long)]
    max_connections: Option<usize>,

    /// Connection worker threads [default: 16]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Idle read timeout per connection in ms, 0 disables [default: 5000]
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Write timeout per connection in ms, 0 disables [default: 5000]
    #[arg(long)]
    write_timeout_ms: Option<u64>,
}

impl Args {
    /// Apply the flags that were given on top of `config`
    fn apply(self, config: Config) -> Config {
        let mut builder = config.into_builder();

        if let Some(listen) = self.listen {
            builder = builder.listen_addr(listen);
        }
        if let Some(database_url) = self.database_url {
            builder = builder.backend(Backend::Relational { database_url });
        }
        if let Some(count) = self.max_connections {
            builder = builder.max_connections(count);
        }
        if let Some(count) = self.workers {
            builder = builder.worker_threads(count);
        }
        if let Some(ms) = self.read_timeout_ms {
            builder = builder.read_timeout_ms(ms);
        }
        if let Some(ms) = self.write_timeout_ms {
            builder = builder.write_timeout_ms(ms);
        }

        builder.build()
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,addressbook=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => args.apply(config),
        Err(e) => {
            tracing::error!("Invalid environment: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Address Book Server v{}", addressbook::VERSION);
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Backend: {:?}", config.backend);

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let directory = match Directory::open(&config) {
        Ok(d) => Arc::new(d),
        Err(e) => {
            tracing::error!("Failed to open directory: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = Server::new(config, directory);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
