//! 編集セッションの状態管理
//!
//! 状態遷移は名前付きの操作（upload / begin_edit / finish_edit）のみで行う。
//!
//! ```text
//! idle → requesting → (succeeded | failed) → idle
//! ```
//!
//! 新しいアップロードやリクエストのたびに世代番号を進め、
//! 古い世代のレスポンスは破棄する（ビジー表示だけは必ず解除）。

use std::cell::RefCell;

use crate::editor::{run_edit, ImageEditor};
use crate::encoder::ImageSource;
use crate::error::{Error, ValidationError};
use crate::types::{Download, ResultImage};

/// 実行ボタンのラベル
pub const GENERATE_LABEL: &str = "Generate";

/// リクエスト中の実行ボタンのラベル
pub const BUSY_LABEL: &str = "Conjuring Magic...";

/// 表示上のフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Requesting => "requesting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

/// `begin_edit` が発行するリクエスト情報
#[derive(Debug, Clone)]
pub struct EditTicket<S> {
    generation: u64,
    source: S,
    instruction: String,
}

impl<S> EditTicket<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

/// `finish_edit` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// 結果またはエラーを反映した
    Applied,
    /// 発行後にアップロードがあったため破棄した
    Stale,
}

/// 1セッション分の状態（元画像・編集指示・結果・ビジー・エラー）
#[derive(Debug, Clone)]
pub struct EditorState<S> {
    source: Option<S>,
    instruction: String,
    result: Option<ResultImage>,
    busy: bool,
    error: Option<String>,
    generation: u64,
}

impl<S> Default for EditorState<S> {
    fn default() -> Self {
        Self {
            source: None,
            instruction: String::new(),
            result: None,
            busy: false,
            error: None,
            generation: 0,
        }
    }
}

impl<S: Clone> EditorState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    // =============================================
    // 遷移
    // =============================================

    /// 元画像を差し替える（前回の結果とエラーは破棄）
    ///
    /// 実行中のリクエストは中断しない。その応答は古い世代として破棄される。
    pub fn upload(&mut self, source: S) {
        self.source = Some(source);
        self.result = None;
        self.error = None;
        self.generation += 1;
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    /// リクエスト開始
    ///
    /// 画像・指示が揃っていなければ入力エラーを表示して何もしない。
    pub fn begin_edit(&mut self) -> Result<EditTicket<S>, ValidationError> {
        if self.busy {
            return Err(ValidationError::Busy);
        }

        let validated = match &self.source {
            None => Err(ValidationError::MissingImage),
            Some(_) if self.instruction.trim().is_empty() => {
                Err(ValidationError::MissingInstruction)
            }
            Some(source) => Ok(source.clone()),
        };

        let source = match validated {
            Ok(source) => source,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.busy = true;
        self.error = None;
        self.result = None;
        self.generation += 1;

        Ok(EditTicket {
            generation: self.generation,
            source,
            instruction: self.instruction.clone(),
        })
    }

    /// リクエスト完了
    ///
    /// ビジーは常に解除する。結果の反映は世代が一致する場合のみ。
    pub fn finish_edit(
        &mut self,
        generation: u64,
        outcome: Result<String, Error>,
    ) -> Completion {
        self.busy = false;

        if generation != self.generation {
            return Completion::Stale;
        }

        match outcome {
            Ok(data) if data.trim().is_empty() => {
                self.error = Some(Error::NoImage(None).to_string());
            }
            Ok(data) => {
                self.result = Some(ResultImage::new(data));
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
            }
        }

        Completion::Applied
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

impl<S> EditorState<S> {
    // =============================================
    // 参照
    // =============================================

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn result(&self) -> Option<&ResultImage> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Requesting
        } else if self.result.is_some() {
            Phase::Succeeded
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }

    /// 結果画像の `src`（`data:image/png;base64,...`）
    pub fn result_src(&self) -> Option<String> {
        self.result.as_ref().map(ResultImage::src)
    }

    /// 結果がある時だけダウンロードを出す
    pub fn download(&self) -> Option<Download> {
        self.result.as_ref().map(ResultImage::download)
    }

    pub fn instruction_enabled(&self) -> bool {
        self.source.is_some() && !self.busy
    }

    pub fn can_submit(&self) -> bool {
        self.source.is_some() && !self.instruction.trim().is_empty() && !self.busy
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.busy {
            BUSY_LABEL
        } else {
            GENERATE_LABEL
        }
    }
}

/// 開始 → エンコード・送信 → 完了 を一通り実行する
///
/// await中は `RefCell` を借用しないので、待機中に `upload` が呼ばれてもよい。
pub async fn submit<S, E>(
    state: &RefCell<EditorState<S>>,
    editor: &E,
) -> Result<Completion, ValidationError>
where
    S: ImageSource + Clone,
    E: ImageEditor,
{
    let ticket = state.borrow_mut().begin_edit()?;
    let outcome = run_edit(ticket.source(), ticket.instruction(), editor).await;
    Ok(state.borrow_mut().finish_edit(ticket.generation(), outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::InMemoryImage;
    use crate::types::EncodedImage;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::join;
    use std::cell::Cell;

    fn photo(name: &str) -> InMemoryImage {
        InMemoryImage::new(name, "image/png", vec![1, 2, 3])
    }

    /// 固定の応答を返し、呼び出し回数を数えるエディタ
    struct StubEditor {
        reply: std::result::Result<&'static str, &'static str>,
        calls: Cell<usize>,
    }

    impl StubEditor {
        fn ok(data: &'static str) -> Self {
            Self { reply: Ok(data), calls: Cell::new(0) }
        }

        fn failing(message: &'static str) -> Self {
            Self { reply: Err(message), calls: Cell::new(0) }
        }
    }

    impl ImageEditor for StubEditor {
        async fn edit(&self, _image: &EncodedImage, _instruction: &str) -> crate::Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.reply
                .map(str::to_string)
                .map_err(|m| Error::Remote(m.to_string()))
        }
    }

    /// テスト側から応答タイミングを制御するエディタ
    struct GatedEditor {
        gate: RefCell<Option<oneshot::Receiver<String>>>,
    }

    impl ImageEditor for GatedEditor {
        async fn edit(&self, _image: &EncodedImage, _instruction: &str) -> crate::Result<String> {
            let rx = self.gate.borrow_mut().take().expect("一度だけ呼ばれる想定");
            rx.await.map_err(|_| Error::Remote("gate dropped".to_string()))
        }
    }

    fn ready_state() -> EditorState<InMemoryImage> {
        let mut state = EditorState::new();
        state.upload(photo("a.png"));
        state.set_instruction("add a rainbow");
        state
    }

    // =============================================
    // 入力チェック
    // =============================================

    #[test]
    fn test_begin_without_image() {
        let state = RefCell::new(EditorState::<InMemoryImage>::new());
        state.borrow_mut().set_instruction("add a rainbow");
        let editor = StubEditor::ok("Xg==");

        let result = block_on(submit(&state, &editor));

        assert_eq!(result, Err(ValidationError::MissingImage));
        assert_eq!(editor.calls.get(), 0);
        let state = state.borrow();
        assert!(!state.is_busy());
        assert_eq!(
            state.error(),
            Some("Please upload an image and provide an editing instruction.")
        );
    }

    #[test]
    fn test_begin_with_empty_instruction() {
        let mut initial = EditorState::new();
        initial.upload(photo("a.png"));
        initial.set_instruction("   ");
        let state = RefCell::new(initial);
        let editor = StubEditor::ok("Xg==");

        let result = block_on(submit(&state, &editor));

        assert_eq!(result, Err(ValidationError::MissingInstruction));
        assert_eq!(editor.calls.get(), 0);
        assert!(state.borrow().error().is_some());
        assert_eq!(state.borrow().phase(), Phase::Failed);
    }

    #[test]
    fn test_begin_while_busy_is_rejected() {
        let mut state = ready_state();
        let ticket = state.begin_edit().unwrap();

        assert_eq!(state.begin_edit().unwrap_err(), ValidationError::Busy);
        // 実行中の状態は変えない
        assert!(state.is_busy());
        assert!(state.error().is_none());
        assert_eq!(state.generation(), ticket.generation());
    }

    // =============================================
    // 成功・失敗
    // =============================================

    #[test]
    fn test_success_sets_png_data_url() {
        let state = RefCell::new(ready_state());
        let editor = StubEditor::ok("Xg==");

        let result = block_on(submit(&state, &editor));

        assert_eq!(result, Ok(Completion::Applied));
        assert_eq!(editor.calls.get(), 1);
        let state = state.borrow();
        assert_eq!(state.result_src().as_deref(), Some("data:image/png;base64,Xg=="));
        assert_eq!(state.error(), None);
        assert_eq!(state.phase(), Phase::Succeeded);
    }

    #[test]
    fn test_failure_shows_remote_message() {
        let state = RefCell::new(ready_state());
        let editor = StubEditor::failing("quota exceeded");

        block_on(submit(&state, &editor)).unwrap();

        let state = state.borrow();
        assert_eq!(state.error(), Some("quota exceeded"));
        assert_eq!(state.result(), None);
        assert_eq!(state.download(), None);
        assert_eq!(state.phase(), Phase::Failed);
    }

    #[test]
    fn test_empty_payload_is_failure() {
        let mut state = ready_state();
        let ticket = state.begin_edit().unwrap();

        state.finish_edit(ticket.generation(), Ok(String::new()));

        assert!(state.result().is_none());
        assert_eq!(state.error(), Some("The model did not return an image."));
    }

    #[test]
    fn test_busy_toggles_once_per_request() {
        for editor in [StubEditor::ok("Xg=="), StubEditor::failing("boom")] {
            let mut state = ready_state();
            let mut transitions = Vec::new();

            transitions.push(state.is_busy());
            let ticket = state.begin_edit().unwrap();
            transitions.push(state.is_busy());
            let outcome = block_on(run_edit(ticket.source(), ticket.instruction(), &editor));
            state.finish_edit(ticket.generation(), outcome);
            transitions.push(state.is_busy());

            assert_eq!(transitions, vec![false, true, false]);
        }
    }

    #[test]
    fn test_new_request_clears_previous_result_and_error() {
        let mut state = ready_state();
        let ticket = state.begin_edit().unwrap();
        state.finish_edit(ticket.generation(), Ok("Xg==".to_string()));
        assert!(state.result().is_some());

        state.begin_edit().unwrap();

        assert!(state.result().is_none());
        assert!(state.error().is_none());
        assert_eq!(state.phase(), Phase::Requesting);
    }

    // =============================================
    // アップロード
    // =============================================

    #[test]
    fn test_upload_clears_result_and_error() {
        let mut state = ready_state();
        let ticket = state.begin_edit().unwrap();
        state.finish_edit(ticket.generation(), Ok("Xg==".to_string()));

        state.upload(photo("b.png"));
        assert!(state.result().is_none());
        assert!(state.download().is_none());

        let ticket = state.begin_edit().unwrap();
        state.finish_edit(ticket.generation(), Err(Error::Remote("boom".to_string())));
        assert_eq!(state.error(), Some("boom"));

        state.upload(photo("c.png"));
        assert!(state.error().is_none());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.source().map(|s| s.file_name()), Some("c.png"));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = ready_state();
        let ticket = state.begin_edit().unwrap();

        // 応答前に別の画像をアップロード
        state.upload(photo("b.png"));
        let completion = state.finish_edit(ticket.generation(), Ok("Xg==".to_string()));

        assert_eq!(completion, Completion::Stale);
        assert!(!state.is_busy());
        assert!(state.result().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut state = ready_state();
        let ticket = state.begin_edit().unwrap();
        state.upload(photo("b.png"));

        let completion =
            state.finish_edit(ticket.generation(), Err(Error::Remote("late".to_string())));

        assert_eq!(completion, Completion::Stale);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_upload_during_submit_discards_response() {
        let (tx, rx) = oneshot::channel();
        let editor = GatedEditor { gate: RefCell::new(Some(rx)) };
        let state = RefCell::new(ready_state());

        let driver = async {
            // submit が編集待ちに入った後でアップロードし、応答を返す
            futures::future::ready(()).await;
            state.borrow_mut().upload(photo("b.png"));
            assert!(state.borrow().is_busy());
            tx.send("Xg==".to_string()).unwrap();
        };

        let (completion, ()) = block_on(join(submit(&state, &editor), driver));

        assert_eq!(completion, Ok(Completion::Stale));
        let state = state.borrow();
        assert!(!state.is_busy());
        assert!(state.result().is_none());
        assert_eq!(state.source().map(|s| s.file_name()), Some("b.png"));
    }

    // =============================================
    // 表示用の派生値
    // =============================================

    #[test]
    fn test_controls_enabled_state() {
        let mut state = EditorState::<InMemoryImage>::new();
        assert!(!state.instruction_enabled());
        assert!(!state.can_submit());

        state.upload(photo("a.png"));
        assert!(state.instruction_enabled());
        assert!(!state.can_submit());

        state.set_instruction("make it vintage");
        assert!(state.can_submit());
        assert_eq!(state.trigger_label(), "Generate");

        state.begin_edit().unwrap();
        assert!(!state.instruction_enabled());
        assert!(!state.can_submit());
        assert_eq!(state.trigger_label(), "Conjuring Magic...");
    }

    #[test]
    fn test_download_present_iff_result() {
        let mut state = ready_state();
        assert!(state.download().is_none());

        let ticket = state.begin_edit().unwrap();
        assert!(state.download().is_none());

        state.finish_edit(ticket.generation(), Ok("Xg==".to_string()));
        let download = state.download().expect("ダウンロードがない");
        assert_eq!(download.file_name, "edited-image.png");
        assert_eq!(download.href, "data:image/png;base64,Xg==");

        state.upload(photo("b.png"));
        assert!(state.download().is_none());
    }

    #[test]
    fn test_dismiss_error() {
        let mut state = EditorState::<InMemoryImage>::new();
        let _ = state.begin_edit();
        assert!(state.error().is_some());

        state.dismiss_error();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Idle.as_str(), "idle");
        assert_eq!(Phase::Requesting.as_str(), "requesting");
        assert_eq!(Phase::Succeeded.as_str(), "succeeded");
        assert_eq!(Phase::Failed.as_str(), "failed");
    }
}
