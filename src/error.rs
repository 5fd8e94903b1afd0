use photo_magic_common::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoMagicError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`photo-magic config --set-api-key YOUR_KEY` または環境変数 GEMINI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("対応していない画像形式です（PNG, JPG, WEBP）: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 編集リクエストの失敗（表示用メッセージ）
    #[error("{0}")]
    Edit(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] photo_magic_common::Error),
}

pub type Result<T> = std::result::Result<T, PhotoMagicError>;
