//! Vault configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{Address, AssetId, Quantity};

/// Full configuration for a vault instance.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VaultConfig {
    /// Vault identity settings.
    #[serde(default)]
    pub vault: VaultSection,

    /// Assets onboarded at initialization.
    #[serde(default)]
    pub assets: Vec<AssetConfig>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSection {
    /// Display name.
    #[serde(default = "default_vault_name")]
    pub name: String,
    /// Address the vault trades as.
    #[serde(default = "default_vault_address")]
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Asset handle.
    pub id: AssetId,
    /// Opening balance in smallest units, written as a decimal string.
    #[serde(default, with = "quantity_str")]
    pub initial_balance: Quantity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_vault_name() -> String {
    "tradevault".into()
}
fn default_vault_address() -> Address {
    Address::from_bytes([0u8; 20])
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            name: default_vault_name(),
            address: default_vault_address(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl VaultConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: VaultConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Quantities exceed TOML's i64 integers, so they travel as decimal strings.
mod quantity_str {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Quantity;

    pub fn serialize<S: Serializer>(value: &Quantity, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Quantity, D::Error> {
        let s = String::deserialize(d)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}
