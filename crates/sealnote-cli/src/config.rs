use std::path::{Path, PathBuf};

use sealnote_core::crypto::KdfParams;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_UNLOCK_ATTEMPTS;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SealnoteConfig {
    pub vault: VaultSection,
    pub kdf: KdfSection,
    pub security: SecuritySection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSection {
    pub path: Option<String>,
}

/// Argon2id parameters applied when a vault is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfSection {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfSection {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl KdfSection {
    pub fn params(&self) -> anyhow::Result<KdfParams> {
        KdfParams::new(self.memory_kib, self.iterations, self.parallelism)
            .map_err(|e| anyhow::anyhow!("Invalid [kdf] configuration: {}", e))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub max_unlock_attempts: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            max_unlock_attempts: DEFAULT_MAX_UNLOCK_ATTEMPTS,
        }
    }
}

impl SealnoteConfig {
    pub fn with_vault_path(vault_path: &Path) -> Self {
        Self {
            vault: VaultSection {
                path: Some(vault_path.to_string_lossy().to_string()),
            },
            ..Self::default()
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SealnoteConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Load the config file, or defaults when the default location has none.
///
/// An explicitly requested path must exist.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<SealnoteConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = default_config_path()?;
            if path.exists() {
                read_config(&path)
            } else {
                Ok(SealnoteConfig::default())
            }
        }
    }
}

pub fn write_config(path: &Path, config: &SealnoteConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealnote"));
        }
    }
    Ok(home_dir()?.join(".config").join("sealnote"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealnote"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("sealnote"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
