//! APIキーの保存（localStorage）
//!
//! ビルド時に `GEMINI_API_KEY` が与えられていれば初期値として使う。

use gloo::storage::{LocalStorage, Storage};

const STORAGE_KEY: &str = "photo-magic.gemini-api-key";

/// 保存済みのキー、なければビルド時のキー、どちらもなければ空文字
pub fn load() -> String {
    LocalStorage::get::<String>(STORAGE_KEY)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(build_time_key)
        .unwrap_or_default()
}

pub fn save(api_key: &str) -> Result<(), String> {
    LocalStorage::set(STORAGE_KEY, api_key.trim()).map_err(|e| format!("Could not save the API key: {}", e))
}

pub fn clear() {
    LocalStorage::delete(STORAGE_KEY);
}

fn build_time_key() -> Option<String> {
    option_env!("GEMINI_API_KEY")
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}
