//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "smartrent=info,smartrent_server=info,tower_http=info";

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// SmartRent alert service
#[derive(Debug, Clone, Parser)]
#[command(name = "smartrent-server")]
#[command(about = "HTTP API for maintenance alerts and rental units")]
#[command(version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "SMARTRENT_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// JSON snapshot file; state is kept in memory only when omitted
    #[arg(long, env = "SMARTRENT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "SMARTRENT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable debug logging for SmartRent crates
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    fn env_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("smartrent=debug,smartrent_server=debug,tower_http=debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
        }
    }

    /// Install the global tracing subscriber
    pub fn init_tracing(&self) {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        match self.log_format {
            LogFormat::Text => registry.with(fmt::layer()).init(),
            LogFormat::Json => registry.with(fmt::layer().json()).init(),
        }
    }
}
