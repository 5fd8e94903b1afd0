//! edit コマンド
//!
//! ブラウザ版と同じ `EditorState` の遷移で1回分の編集を行い、
//! 結果をファイルに書き出す。

use crate::error::{PhotoMagicError, Result};
use crate::file_image::FileImage;
use indicatif::{ProgressBar, ProgressStyle};
use photo_magic_common::state::BUSY_LABEL;
use photo_magic_common::{decode_base64, submit, Completion, EditorState, ImageEditor, ImageSource};
use serde::Serialize;
use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EditRequest {
    pub input: PathBuf,
    pub instruction: String,
    pub output: PathBuf,
    /// スピナーを表示するか
    pub show_progress: bool,
}

/// 編集結果（`--json` で出力）
#[derive(Debug, Clone, Serialize)]
pub struct EditReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub instruction: String,
    pub source_mime_type: String,
    pub bytes_written: usize,
}

pub async fn edit_image<E: ImageEditor>(editor: &E, request: &EditRequest) -> Result<EditReport> {
    let source = FileImage::open(&request.input)?;
    let source_mime_type = source.mime_type().to_string();

    let state = RefCell::new(EditorState::new());
    {
        let mut state = state.borrow_mut();
        state.upload(source);
        state.set_instruction(request.instruction.as_str());
    }

    let spinner = request.show_progress.then(busy_spinner);
    let submitted = submit(&state, editor).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if submitted? == Completion::Stale {
        tracing::warn!("response discarded");
    }

    let state = state.into_inner();
    tracing::debug!(phase = state.phase().as_str(), "edit finished");
    if let Some(message) = state.error() {
        return Err(PhotoMagicError::Edit(message.to_string()));
    }
    let result = state
        .result()
        .ok_or_else(|| PhotoMagicError::Edit(photo_magic_common::Error::NoImage(None).to_string()))?;

    let bytes = decode_base64(result.base64())?;
    if let Some(parent) = request.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&request.output, &bytes).await?;
    tracing::info!(output = %request.output.display(), bytes = bytes.len(), "edited image saved");

    Ok(EditReport {
        input: request.input.clone(),
        output: request.output.clone(),
        instruction: request.instruction.clone(),
        source_mime_type,
        bytes_written: bytes.len(),
    })
}

fn busy_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(BUSY_LABEL);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
