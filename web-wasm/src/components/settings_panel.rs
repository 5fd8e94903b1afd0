//! 設定パネルコンポーネント（Gemini APIキー）

use leptos::prelude::*;

#[component]
pub fn SettingsPanel<FS, FC>(
    api_key: ReadSignal<String>,
    set_api_key: WriteSignal<String>,
    api_key_status: ReadSignal<String>,
    on_save_api_key: FS,
    on_clear_api_key: FC,
) -> impl IntoView
where
    FS: Fn(()) + 'static + Clone,
    FC: Fn(()) + 'static + Clone,
{
    view! {
        <div class="panel settings-panel">
            <div class="form-group">
                <label for="api-key">"Gemini API Key"</label>
                <input
                    type="password"
                    id="api-key"
                    placeholder="Enter your API key..."
                    prop:value=move || api_key.get()
                    on:input=move |ev| {
                        set_api_key.set(event_target_value(&ev));
                    }
                />
                <a
                    href="https://aistudio.google.com/app/apikey"
                    target="_blank"
                    rel="noopener noreferrer"
                    class="api-key-link"
                >
                    "Get an API key →"
                </a>
                <div class="api-actions">
                    <button
                        class="btn btn-secondary btn-small"
                        on:click={
                            let on_save_api_key = on_save_api_key.clone();
                            move |_| on_save_api_key(())
                        }
                    >
                        "Save"
                    </button>
                    <button
                        class="btn btn-tertiary btn-small"
                        on:click={
                            let on_clear_api_key = on_clear_api_key.clone();
                            move |_| on_clear_api_key(())
                        }
                    >
                        "Clear"
                    </button>
                </div>
                <div class="api-key-status">
                    {move || api_key_status.get()}
                </div>
            </div>
        </div>
    }
}
