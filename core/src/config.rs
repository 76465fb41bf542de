//! Serializable client configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Settings applied by `Client::from_config` / `Client::apply_config`.
///
/// Missing fields fall back to the defaults of `Client::new`: no timeout
/// and no headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in seconds. `None` or `0` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, ClientError> {
        serde_json::from_str(raw).map_err(|e| ClientError::Config(e.to_string()))
    }
}
