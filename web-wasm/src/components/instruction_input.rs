//! 編集指示の入力欄

use leptos::prelude::*;

const PLACEHOLDER: &str = "e.g., 'Remove the background', 'Make the product pop with a vibrant background', 'Add a retro cinematic filter'...";

#[component]
pub fn InstructionInput<F>(
    #[prop(into)] instruction: Signal<String>,
    #[prop(into)] enabled: Signal<bool>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(String) + 'static + Clone,
{
    view! {
        <div class="panel">
            <h2 class="panel-title">"2. Describe Your Edit"</h2>
            <textarea
                class="instruction-input"
                placeholder=PLACEHOLDER
                prop:value=move || instruction.get()
                disabled=move || !enabled.get()
                on:input={
                    let on_change = on_change.clone();
                    move |ev| on_change(event_target_value(&ev))
                }
            />
        </div>
    }
}
