//! エラー型定義
//!
//! - ValidationError: リクエスト発行前の入力チェック
//! - Error: エンコード・リモート呼び出し中の失敗（メッセージはそのまま表示）

use thiserror::Error;

/// 入力チェックエラー（ネットワーク呼び出しは発生しない）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload an image and provide an editing instruction.")]
    MissingImage,

    #[error("Please upload an image and provide an editing instruction.")]
    MissingInstruction,

    #[error("An edit is already in progress.")]
    Busy,
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 画像の読み込み失敗（読み込み元のメッセージをそのまま保持）
    #[error("{0}")]
    Read(String),

    /// リモート側の失敗（ネットワーク・サービスのメッセージをそのまま保持）
    #[error("{0}")]
    Remote(String),

    /// 応答待ちの時間切れ
    #[error("The request to the image service timed out.")]
    Timeout,

    #[error("API error: {0}")]
    Api(u16),

    #[error("{}", no_image_message(.0.as_deref()))]
    NoImage(Option<String>),

    #[error("failed to decode: {0}")]
    Decode(String),

    #[error("Unexpected response from the image service: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

fn no_image_message(reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.trim().is_empty() => {
            format!("The model did not return an image: {}", reason.trim())
        }
        _ => "The model did not return an image.".to_string(),
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
