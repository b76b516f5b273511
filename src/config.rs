use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::infrastructure::csv_store::DEFAULT_PATH;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub csv_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(std::env::var("TODOLIST_CSV").ok(), std::env::var("BIND_ADDR").ok())
    }

    fn from_vars(csv_path: Option<String>, bind_addr: Option<String>) -> Result<Self> {
        let csv_path = csv_path.filter(|p| !p.is_empty()).unwrap_or_else(|| DEFAULT_PATH.to_string());
        let bind_addr = bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("invalid BIND_ADDR `{bind_addr}`"))?;
        Ok(Self { csv_path: PathBuf::from(csv_path), bind_addr })
    }
}
