//! Service configuration with TOML file support.

use civis_types::{PolicyParams, Role};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the Civis service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the HTTP API listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Policy parameters. When the `[params]` table is present it must be
    /// complete; when absent, production defaults apply.
    #[serde(default)]
    pub params: PolicyParams,

    /// Phone number that receives new-report alerts, if any.
    #[serde(default)]
    pub admin_alert_number: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Static bearer credentials, for deployments where session issuance
    /// happens out of band. The daemon provisions a user record for each
    /// entry at startup.
    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
}

/// One static credential: a bearer token mapped to an identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialEntry {
    pub token: String,
    pub phone_number: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

fn default_listen_port() -> u16 {
    8070
}

fn default_log_format() -> String {
    "human".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            params: PolicyParams::default(),
            admin_alert_number: None,
            log_format: default_log_format(),
            credentials: Vec::new(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
