//! Gemini API連携（fetch版）
//!
//! リクエスト組み立てとレスポンス解釈は photo_magic_common::gemini を使う。

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, RequestMode, Response};

use photo_magic_common::gemini::{api_error, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use photo_magic_common::{
    build_edit_request, endpoint_url, EncodedImage, Error, GeminiRequest, GeminiResponse,
    ImageEditor, Result,
};

use crate::js_error::request_error;

/// ブラウザから直接Gemini APIを呼び出すクライアント
#[derive(Debug, Clone)]
pub struct GeminiFetchClient {
    api_key: String,
    model: String,
}

impl GeminiFetchClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ImageEditor for GeminiFetchClient {
    async fn edit(&self, image: &EncodedImage, instruction: &str) -> Result<String> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::Config("Please enter a Gemini API key.".to_string()));
        }

        let request = build_edit_request(image, instruction);
        call_gemini_api(api_key, &self.model, &request).await
    }
}

/// Gemini API呼び出し（1往復、リトライなし、時間切れで中断）
async fn call_gemini_api(api_key: &str, model: &str, request: &GeminiRequest) -> Result<String> {
    let url = endpoint_url(model, api_key);
    let body = serde_json::to_string(request)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));
    opts.set_signal(Some(&AbortSignal::timeout_with_u32(timeout_millis())));

    let request = Request::new_with_str_and_init(&url, &opts).map_err(request_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(request_error)?;

    let window = web_sys::window().ok_or_else(|| Error::Remote("window is not available".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(request_error)?;
    let resp: Response = resp_value.dyn_into().map_err(request_error)?;

    if !resp.ok() {
        let text = JsFuture::from(resp.text().map_err(request_error)?)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        return Err(api_error(resp.status(), &text));
    }

    let json = JsFuture::from(resp.json().map_err(request_error)?)
        .await
        .map_err(request_error)?;
    let response: GeminiResponse = serde_wasm_bindgen::from_value(json).map_err(|e| {
        Error::Remote(format!("Unexpected response from the image service: {}", e))
    })?;

    response.into_image()
}

fn timeout_millis() -> u32 {
    u32::try_from(DEFAULT_TIMEOUT_SECS * 1000).unwrap_or(u32::MAX)
}
