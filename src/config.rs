//! Configuration for the address book service
//!
//! Centralized configuration with sensible defaults.

use std::env;

use crate::error::{BookError, Result};

/// Environment variable overriding the listen address
pub const ENV_LISTEN_ADDR: &str = "ADDRESSBOOK_LISTEN_ADDR";

/// Environment variable selecting the relational backend
pub const ENV_DATABASE_URL: &str = "ADDRESSBOOK_DATABASE_URL";

/// Main configuration for an address book server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Where contacts live
    pub backend: Backend,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Number of threads serving connections
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

/// Contact storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Process-local map, discarded on shutdown
    InMemory,

    /// SQLite database reached through `database_url`
    /// (e.g. `sqlite://contacts.db`)
    Relational { database_url: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::InMemory,
            listen_addr: "127.0.0.1:9090".to_string(),
            max_connections: 1024,
            worker_threads: 16,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Builder seeded with this config, for layering overrides on top
    pub fn into_builder(self) -> ConfigBuilder {
        ConfigBuilder { config: self }
    }

    /// Default config overlaid with `ADDRESSBOOK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(addr) = read_env(ENV_LISTEN_ADDR)? {
            builder = builder.listen_addr(addr);
        }
        if let Some(url) = read_env(ENV_DATABASE_URL)? {
            builder = builder.backend(Backend::Relational { database_url: url });
        }

        Ok(builder.build())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(BookError::Config("worker_threads must be at least 1".to_string()));
        }
        if self.max_connections == 0 {
            return Err(BookError::Config("max_connections must be at least 1".to_string()));
        }
        if let Backend::Relational { database_url } = &self.backend {
            if database_url.trim().is_empty() {
                return Err(BookError::Config("database url is empty".to_string()));
            }
        }
        Ok(())
    }
}

fn read_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(BookError::Config(format!("{} is not valid unicode", key)))
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage backend
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
