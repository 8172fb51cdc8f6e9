//! Serializable settings for constructing a [`DofHandler`](crate::handler::DofHandler).
use crate::basis::BasisOrder;
use crate::reorder::DisconnectedPolicy;
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DofHandlerConfig {
    /// Polynomial order of the basis.
    pub order: BasisOrder,
    /// Whether to renumber DoFs immediately after construction.
    pub renumber: bool,
    pub disconnected_policy: DisconnectedPolicy,
}

pub fn load_config_from_str(json: &str) -> eyre::Result<DofHandlerConfig> {
    serde_json::from_str(json).wrap_err("failed to parse DoF handler config")
}

pub fn load_config_from_file<P: AsRef<Path>>(file_path: P) -> eyre::Result<DofHandlerConfig> {
    let json = std::fs::read_to_string(file_path).wrap_err("failed to read config file")?;
    load_config_from_str(&json)
}
