//! Gemini API クライアント（reqwest）

use crate::error::{PhotoMagicError, Result};
use photo_magic_common::gemini::{api_error, DEFAULT_MODEL};
use photo_magic_common::{build_edit_request, endpoint_url, parse_edit_response, EncodedImage, Error, ImageEditor};
use std::time::Duration;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PhotoMagicError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ImageEditor for GeminiClient {
    async fn edit(&self, image: &EncodedImage, instruction: &str) -> photo_magic_common::Result<String> {
        let request = build_edit_request(image, instruction);
        tracing::info!(model = %self.model, mime_type = %image.mime_type, "sending edit request");

        let response = self
            .http
            .post(endpoint_url(&self.model, &self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "edit request rejected");
            return Err(api_error(status.as_u16(), &body));
        }

        parse_edit_response(&body)
    }
}

// URLにAPIキーが含まれるのでメッセージからは外す
fn network_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Remote(e.without_url().to_string())
    }
}
