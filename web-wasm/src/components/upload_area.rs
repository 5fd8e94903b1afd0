//! アップロードエリアコンポーネント
//!
//! クリックでファイル選択、またはドラッグ&ドロップで1枚受け付ける。
//! 形式の絞り込みは accept 属性のみ（送信前の再チェックはしない）。

use leptos::html;
use leptos::prelude::*;
use photo_magic_common::ImageFormat;
use web_sys::{DragEvent, File, FileList};

#[component]
pub fn UploadArea<F>(on_upload: F) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    let on_drop = {
        let on_upload = on_upload.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            set_is_dragover.set(false);

            if let Some(file) = ev.data_transfer().and_then(|dt| dt.files()).and_then(first_file) {
                on_upload(file);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        set_is_dragover.set(false);
    };

    // ファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = {
        let on_upload = on_upload.clone();
        move |ev: web_sys::Event| {
            let input = event_target::<web_sys::HtmlInputElement>(&ev);
            if let Some(file) = input.files().and_then(first_file) {
                on_upload(file);
            }
            // 同じファイルを選び直しても change が発火するように
            input.set_value("");
        }
    };

    view! {
        <div class="panel">
            <h2 class="panel-title">"1. Upload Photo"</h2>
            <input
                node_ref=input_ref
                type="file"
                class="hidden"
                accept=ImageFormat::accept_attribute()
                on:change=on_change
            />
            <div
                class=move || {
                    if is_dragover.get() {
                        "upload-area dragover"
                    } else {
                        "upload-area"
                    }
                }
                on:dragenter=on_dragover
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:drop=on_drop
                on:click=on_click
            >
                <div class="upload-icon">"📷"</div>
                <p>
                    <span class="upload-cta">"Click to upload"</span>
                    " or drag and drop"
                </p>
                <p class="text-muted">"PNG, JPG, or WEBP"</p>
            </div>
        </div>
    }
}

fn first_file(files: FileList) -> Option<File> {
    files.get(0)
}
