use crate::error::{PhotoMagicError, Result};
use photo_magic_common::gemini::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIキーを上書きする環境変数
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込む（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoMagicError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-magic").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// 環境変数の値（あれば）と保存済みキーから使用するキーを決める
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .into_iter()
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or(PhotoMagicError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(PhotoMagicError::Config("APIキーが空です".into()));
        }
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        let model = model.trim().to_string();
        if model.is_empty() {
            return Err(PhotoMagicError::Config("モデル名が空です".into()));
        }
        self.model = model;
        self.save()
    }

    /// 表示用にマスクしたAPIキー（短いキーは末尾も出さない）
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(|key| {
            let len = key.chars().count();
            if len > 8 {
                let tail: String = key.chars().skip(len - 4).collect();
                format!("****{}", tail)
            } else {
                "****".to_string()
            }
        })
    }
}
