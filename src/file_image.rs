//! ローカルファイルの画像ソース

use crate::error::{PhotoMagicError, Result};
use photo_magic_common::{encode_bytes, EncodedImage, ImageFormat, ImageSource};
use std::path::PathBuf;

/// ディスク上の画像ファイル
///
/// 形式は拡張子で判定する。読み込みは `encode` の時点で行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImage {
    path: PathBuf,
    file_name: String,
    format: ImageFormat,
}

impl FileImage {
    /// 対応形式（PNG/JPG/WEBP）かどうかを確認して開く
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| PhotoMagicError::UnsupportedFormat(path.display().to_string()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self { path, file_name, format })
    }
}

impl ImageSource for FileImage {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> &str {
        self.format.mime_type()
    }

    async fn encode(&self) -> photo_magic_common::Result<EncodedImage> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| photo_magic_common::Error::Read(e.to_string()))?;
        tracing::debug!(file = %self.file_name, bytes = bytes.len(), "image loaded");
        Ok(encode_bytes(&bytes, self.mime_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_detects_format_from_extension() {
        let image = FileImage::open("photos/Cat.JPEG").unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.file_name(), "Cat.JPEG");
    }

    #[test]
    fn test_open_rejects_unsupported_extension() {
        assert!(matches!(
            FileImage::open("notes.gif"),
            Err(PhotoMagicError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileImage::open("no_extension"),
            Err(PhotoMagicError::UnsupportedFormat(_))
        ));
    }
}
