//! 画像まわりの型定義
//!
//! - ImageFormat: アップロードで受け付ける形式（png/jpeg/webp）
//! - EncodedImage: 送信用にBase64化した画像とMIMEタイプ
//! - ResultImage: サービスから返された編集結果（PNG想定）

/// 編集結果のMIMEタイプ（サービスはPNGを返す前提）
pub const RESULT_MIME_TYPE: &str = "image/png";

/// ダウンロード時のファイル名
pub const DOWNLOAD_FILE_NAME: &str = "edited-image.png";

/// 受け付ける画像形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// 拡張子から形式を判定（大文字小文字は区別しない）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.mime_type().eq_ignore_ascii_case(mime_type.trim()))
    }

    /// `<input type="file" accept=...>` に渡す文字列
    pub fn accept_attribute() -> String {
        Self::ALL
            .iter()
            .map(|f| f.mime_type())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Base64エンコード済みの画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// 編集結果画像（Base64ペイロード）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultImage {
    data: String,
}

impl ResultImage {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn base64(&self) -> &str {
        &self.data
    }

    /// `<img src>` にそのまま使えるData URL
    pub fn src(&self) -> String {
        crate::encoder::to_data_url(RESULT_MIME_TYPE, &self.data)
    }

    pub fn download(&self) -> Download {
        Download {
            href: self.src(),
            file_name: DOWNLOAD_FILE_NAME,
        }
    }
}

/// クライアント側ダウンロードのリンク情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub href: String,
    pub file_name: &'static str,
}
