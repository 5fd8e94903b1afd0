//! バイナリ→送信用エンコーダ
//!
//! 画像バイト列をBase64に変換し、MIMEタイプと組にして返す。
//! 読み込み元ごとの差異（メモリ上・ファイル・ブラウザのFile）は
//! `ImageSource` トレイトで吸収する。

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};
use crate::types::{EncodedImage, RESULT_MIME_TYPE};

/// アップロードされた画像のハンドル
///
/// `encode` は読み込みに失敗した場合、そのメッセージをそのまま返す。
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    fn file_name(&self) -> &str;

    fn mime_type(&self) -> &str;

    async fn encode(&self) -> Result<EncodedImage>;
}

/// メモリ上に保持した画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryImage {
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl InMemoryImage {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: Arc::from(bytes.into()),
        }
    }
}

impl ImageSource for InMemoryImage {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn encode(&self) -> Result<EncodedImage> {
        Ok(encode_bytes(&self.bytes, &self.mime_type))
    }
}

/// バイト列をBase64化してMIMEタイプと組にする
pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> EncodedImage {
    EncodedImage::new(STANDARD.encode(bytes), mime_type)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(data.trim())
        .map_err(|e| Error::Decode(e.to_string()))
}

pub fn to_data_url(mime_type: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime_type, data)
}

/// Data URLからBase64データ部分とMIMEタイプを取り出す
///
/// `data:image/jpeg;base64,/9j/4AAQ...` 形式のみ対象。
/// MIMEタイプが空の場合は `image/png` とみなす。
pub fn split_data_url(data_url: &str) -> Option<EncodedImage> {
    let rest = data_url.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    let mime_type = if mime_type.is_empty() {
        RESULT_MIME_TYPE
    } else {
        mime_type
    };
    Some(EncodedImage::new(data, mime_type))
}
