use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_REGISTRY_URL: &str = "https://diamond-lang.herokuapp.com";

/// 环境变量覆盖项
pub const ENV_REGISTRY_URL: &str = "BLUE_REGISTRY_URL";
pub const ENV_PACKAGES_DIR: &str = "BLUE_PACKAGES_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry_url: String,
    pub packages_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            packages_dir: PathBuf::from(home).join(".diamond/packages"),
        }
    }
}

impl Config {
    /// 读取配置：环境变量 > 配置文件 > 默认值
    pub fn load_or_default() -> Result<Self> {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let config_path = PathBuf::from(home).join(".config/blue/config.toml");

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 用 `lookup` 提供的值覆盖对应字段，空值忽略
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(ENV_REGISTRY_URL) {
            self.registry_url = url;
        }
        if let Some(dir) = value(ENV_PACKAGES_DIR) {
            self.packages_dir = PathBuf::from(dir);
        }
        self
    }

    /// 创建本地包目录（连同其父目录）
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.packages_dir)?;
        Ok(())
    }

    /// 上传用的网页入口
    pub fn upload_page(&self) -> String {
        format!("{}/packages", self.registry_url.trim_end_matches('/'))
    }
}
