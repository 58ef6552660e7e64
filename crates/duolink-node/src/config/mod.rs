//! Node config loader (strict parsing).

pub mod schema;

use std::fs;

use duolink_core::error::{DuolinkError, Result};

pub use schema::{LineConfig, NodeConfig, Parity, SessionTiming, TransportConfig};

pub fn load_from_file(path: &str) -> Result<NodeConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DuolinkError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<NodeConfig> {
    let cfg: NodeConfig = serde_yaml::from_str(s)
        .map_err(|e| DuolinkError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
