//! 編集リクエスト
//!
//! エンコード → 外部サービス呼び出しの2段パイプライン。
//! リトライ・部分結果・ストリーミングは行わない。

use crate::encoder::ImageSource;
use crate::error::Result;
use crate::types::EncodedImage;

/// 外部の画像生成サービス
///
/// `edit(base64Image, mimeType, instruction) -> base64Image`
#[allow(async_fn_in_trait)]
pub trait ImageEditor {
    /// 編集済み画像（PNG）のBase64文字列を返す
    async fn edit(&self, image: &EncodedImage, instruction: &str) -> Result<String>;
}

/// 画像をエンコードしてサービスへ送信する
pub async fn run_edit<S, E>(source: &S, instruction: &str, editor: &E) -> Result<String>
where
    S: ImageSource,
    E: ImageEditor,
{
    let encoded = source.encode().await?;
    editor.edit(&encoded, instruction).await
}
