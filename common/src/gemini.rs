//! Gemini API 画像編集のワイヤーフォーマット
//!
//! CLI(reqwest)とWeb(fetch)の両クライアントで共有する。
//! リクエスト: 元画像(inline_data) + 編集指示(text)
//! レスポンス: candidates[].content.parts[] のうち inlineData を持つ最初のパート

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::EncodedImage;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 画像編集に使うデフォルトモデル
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// 1回の編集リクエストの待ち時間上限（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// generateContent エンドポイントURL（APIキーはクエリパラメータ）
pub fn endpoint_url(model: &str, api_key: &str) -> String {
    format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key)
}

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
}

/// 画像編集リクエストを組み立てる（画像 → 指示の順）
pub fn build_edit_request(image: &EncodedImage, instruction: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text {
                    text: instruction.to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
        },
    }
}

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data", default)]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
struct ResponseInlineData {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    block_reason: Option<String>,
}

impl GeminiResponse {
    /// 最初の画像パートのBase64データを取り出す
    ///
    /// 画像がない場合は、モデルのテキスト応答・ブロック理由・終了理由の順で
    /// 取れたものをエラーに添える。
    pub fn into_image(self) -> Result<String> {
        let candidates = &self.candidates;
        let parts = move || {
            candidates
                .iter()
                .filter_map(|c| c.content.as_ref())
                .flat_map(|c| c.parts.iter())
        };

        if let Some(data) = parts()
            .filter_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.trim())
            .find(|d| !d.is_empty())
        {
            return Ok(data.to_string());
        }

        let text = parts()
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let reason = if !text.is_empty() {
            Some(text)
        } else if let Some(block) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            Some(format!("blocked ({})", block))
        } else {
            self.candidates
                .iter()
                .find_map(|c| c.finish_reason.clone())
                .filter(|r| r != "STOP")
        };

        Err(Error::NoImage(reason))
    }
}

/// レスポンス本文(JSON)から編集済み画像を取り出す
pub fn parse_edit_response(body: &str) -> Result<String> {
    let response: GeminiResponse = serde_json::from_str(body)?;
    response.into_image()
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// 非2xxレスポンスをエラーに変換
///
/// 本文に `error.message` があればそれをそのまま使う。
pub fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.trim().is_empty() => {
            Error::Remote(envelope.error.message.trim().to_string())
        }
        _ => Error::Api(status),
    }
}
