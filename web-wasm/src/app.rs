//! メインアプリケーションコンポーネント
//!
//! 状態は `EditorState` 1つにまとめ、名前付きの遷移だけで更新する。
//! 元画像ハンドル（web_sys::File）を持つためローカルシグナルに置く。

use leptos::prelude::*;
use photo_magic_common::{run_edit, Completion, EditorState, ImageFormat, ImageSource};
use wasm_bindgen_futures::spawn_local;

use crate::api::gemini::GeminiFetchClient;
use crate::api_key_store;
use crate::browser_image::BrowserImage;
use crate::components::{
    error_banner::ErrorBanner,
    generate_button::GenerateButton,
    header::Header,
    image_viewer::ImageViewer,
    instruction_input::InstructionInput,
    settings_panel::SettingsPanel,
    upload_area::UploadArea,
};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let state = RwSignal::new_local(EditorState::<BrowserImage>::new());
    let (api_key, set_api_key) = signal(api_key_store::load());
    let (api_key_status, set_api_key_status) = signal(String::new());

    // 表示用の派生値
    let original = Signal::derive(move || {
        state.with(|s| s.source().map(|img| img.preview_url().to_string()))
    });
    let edited = Signal::derive(move || state.with(|s| s.result_src()));
    let download = Signal::derive(move || state.with(|s| s.download()));
    let is_loading = Signal::derive(move || state.with(|s| s.is_busy()));
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));
    let instruction = Signal::derive(move || state.with(|s| s.instruction().to_string()));
    let instruction_enabled = Signal::derive(move || state.with(|s| s.instruction_enabled()));
    let can_submit = Signal::derive(move || state.with(|s| s.can_submit()));
    let trigger_label = Signal::derive(move || state.with(|s| s.trigger_label()));

    // 画像アップロードハンドラ（前回の結果・エラーはクリア）
    let on_upload = move |file: web_sys::File| {
        let image = BrowserImage::new(file);
        gloo::console::log!("uploaded", image.file_name(), image.mime_type());
        if ImageFormat::from_mime_type(image.mime_type()).is_none() {
            gloo::console::warn!("file type is outside the accept list:", image.mime_type());
        }
        state.update(|s| s.upload(image));
    };

    let on_instruction = move |text: String| {
        state.update(|s| s.set_instruction(text));
    };

    // 編集開始ハンドラ
    let on_generate = move |_| {
        let Some(Ok(ticket)) = state.try_update(|s| s.begin_edit()) else {
            return;
        };
        let editor = GeminiFetchClient::new(api_key.get_untracked());

        spawn_local(async move {
            let outcome = run_edit(ticket.source(), ticket.instruction(), &editor).await;
            if let Err(e) = &outcome {
                gloo::console::error!("edit failed:", e.to_string());
            }
            let completion = state
                .try_update(|s| s.finish_edit(ticket.generation(), outcome))
                .unwrap_or(Completion::Stale);
            if completion == Completion::Stale {
                gloo::console::warn!("discarded a response for a replaced image");
            }
        });
    };

    // APIキー保存・削除
    let on_save_api_key = move |_| match api_key_store::save(&api_key.get_untracked()) {
        Ok(()) => set_api_key_status.set("API key saved in this browser.".to_string()),
        Err(e) => set_api_key_status.set(e),
    };

    let on_clear_api_key = move |_| {
        api_key_store::clear();
        set_api_key.set(String::new());
        set_api_key_status.set("API key removed.".to_string());
    };

    view! {
        <div class="container">
            <Header />

            <main class="layout">
                <div class="sidebar">
                    <SettingsPanel
                        api_key=api_key
                        set_api_key=set_api_key
                        api_key_status=api_key_status
                        on_save_api_key=on_save_api_key
                        on_clear_api_key=on_clear_api_key
                    />

                    <UploadArea on_upload=on_upload />

                    <InstructionInput
                        instruction=instruction
                        enabled=instruction_enabled
                        on_change=on_instruction
                    />

                    <GenerateButton
                        can_submit=can_submit
                        label=trigger_label
                        on_generate=on_generate
                    />

                    <ErrorBanner error=error />
                </div>

                <ImageViewer
                    original=original
                    edited=edited
                    download=download
                    is_loading=is_loading
                />
            </main>
        </div>
    }
}
