//! Startup settings for pulse-server
//!
//! Command-line arguments and environment variables come from [`Args`]; any
//! value left unset there falls back to the TOML config file, then to the
//! compiled default.

use clap::Parser;
use pulse_common::config::{BackendSettings, Roster, TomlConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5780";

/// Command-line arguments for pulse-server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pulse-server")]
#[command(about = "Residency Pulse submission service")]
#[command(version)]
pub struct Args {
    /// Address to listen on
    #[arg(short, long, env = "PULSE_BIND")]
    pub bind: Option<SocketAddr>,

    /// Directory for the JSON submissions file (enables the file store)
    #[arg(short, long, env = "PULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Shared secret for the admin endpoints
    #[arg(long, env = "PULSE_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Comma-separated contributor roster
    #[arg(long, env = "PULSE_ROSTER")]
    pub roster: Option<String>,

    /// Remote key-value REST endpoint (https)
    #[arg(long, env = "KV_REST_API_URL")]
    pub kv_url: Option<String>,

    /// Bearer token for the remote key-value endpoint
    #[arg(long, env = "KV_REST_API_TOKEN", hide_env_values = true)]
    pub kv_token: Option<String>,

    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    pub backend: BackendSettings,
    pub admin_password: Option<String>,
    pub roster: Roster,
}

impl Settings {
    /// Merge arguments over the TOML layer
    ///
    /// The Upstash variable names are honoured when the Vercel KV ones are
    /// absent.
    pub fn resolve(args: Args, toml: TomlConfig) -> anyhow::Result<Self> {
        let bind = match args.bind {
            Some(addr) => addr,
            None => toml
                .bind
                .as_deref()
                .unwrap_or(DEFAULT_BIND)
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?,
        };

        let roster = match (args.roster, toml.roster) {
            (Some(list), _) => Roster::from_list(&list),
            (None, Some(names)) => Roster::new(names),
            (None, None) => Roster::default(),
        };
        if roster.names().is_empty() {
            anyhow::bail!("Contributor roster is empty");
        }

        let backend = BackendSettings {
            remote_url: args
                .kv_url
                .or_else(|| std::env::var("UPSTASH_REDIS_REST_URL").ok())
                .or(toml.remote_url),
            remote_token: args
                .kv_token
                .or_else(|| std::env::var("UPSTASH_REDIS_REST_TOKEN").ok())
                .or(toml.remote_token),
            data_dir: args.data_dir.or(toml.data_dir),
        };

        Ok(Self {
            bind,
            backend,
            admin_password: args
                .admin_password
                .or(toml.admin_password)
                .filter(|p| !p.is_empty()),
            roster,
        })
    }
}
