use crate::config::policy::GenerationPolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub policy: GenerationPolicy,
}

impl GeneratorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to the default policy.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("📁 Loading generator config from: {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No generator config at {}, using default policy",
                path.display()
            );
            Ok(Self::default())
        }
    }
}

impl Validate for GeneratorConfig {
    fn validate(&self) -> Result<()> {
        self.policy.validate()
    }
}
