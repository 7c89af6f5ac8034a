//! Site and secret configuration, plus timing constants.
//!
//! Configuration is read once by the binary and handed to the reconciler.

use crate::error::SyncError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const SITE_CONFIG_FILE: &str = "site_configs.json";
pub const SECRET_CONFIG_FILE: &str = "secret.json";

/// Config directory on the router flash.
pub const ROUTER_CONFIG_DIR: &str = "/bootflash";

pub const ARM_ENDPOINT: &str = "https://management.azure.com";
pub const ARM_SCOPE: &str = "https://management.azure.com/.default";
pub const NETWORK_API_VERSION: &str = "2023-09-01";

/// Wait between async operation polls when Azure sends no Retry-After.
pub const POLL_INTERVAL_SECS: u64 = 10;
/// Give up waiting for an update after this long.
pub const OPERATION_TIMEOUT_SECS: u64 = 30 * 60;

/// Which NIC to reconcile and for which LISP site.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub resource_group: String,
    #[serde(alias = "interface_name")]
    pub csr_azure_intf_name: String,
    pub site_name: String,
}

/// Service principal and subscription.
#[derive(Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    #[serde(default)]
    pub sp_client_id: String,
    #[serde(default)]
    pub sp_secret: String,
    #[serde(default)]
    pub sp_tenant_id: String,
    #[serde(default)]
    pub sub_id: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("sp_client_id", &self.sp_client_id)
            .field("sp_secret", &"***")
            .field("sp_tenant_id", &self.sp_tenant_id)
            .field("sub_id", &self.sub_id)
            .finish()
    }
}

impl Secrets {
    /// Environment variables take precedence over the secret file.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields = [
            ("AZURE_CLIENT_ID", &mut self.sp_client_id),
            ("AZURE_CLIENT_SECRET", &mut self.sp_secret),
            ("AZURE_TENANT_ID", &mut self.sp_tenant_id),
            ("AZURE_SUBSCRIPTION_ID", &mut self.sub_id),
        ];
        for (var, field) in fields {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
        self
    }

    fn validate(self) -> Result<Self, SyncError> {
        let missing: Vec<&str> = [
            ("sp_client_id", &self.sp_client_id),
            ("sp_secret", &self.sp_secret),
            ("sp_tenant_id", &self.sp_tenant_id),
            ("sub_id", &self.sub_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(SyncError::Config(format!(
                "missing secrets: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Read and decode a JSON file, reporting the failing JSON path.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SyncError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Config(format!("Error reading {}: {e}", path.display())))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        SyncError::Config(format!(
            "Error parsing {}: path={} error={}",
            path.display(),
            e.path(),
            e.inner()
        ))
    })
}

/// Load `site_configs.json` from `config_dir`.
pub fn load_site_config(config_dir: &Path) -> Result<SiteConfig, SyncError> {
    let path = config_dir.join(SITE_CONFIG_FILE);
    log::info!("Reading site config: {}", path.display());
    read_json(&path)
}

/// Load `secret.json` from `config_dir`, then apply environment overrides.
///
/// The file may be absent when every secret comes from the environment.
pub fn load_secrets(
    config_dir: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Secrets, SyncError> {
    let path = config_dir.join(SECRET_CONFIG_FILE);
    let secrets = if path.exists() {
        log::info!("Reading secrets: {}", path.display());
        read_json(&path)?
    } else {
        log::warn!("Secret file not found: {}, using environment", path.display());
        Secrets::default()
    };
    secrets.with_overrides(lookup).validate()
}
