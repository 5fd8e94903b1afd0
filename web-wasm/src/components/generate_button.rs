//! 実行ボタン

use leptos::prelude::*;

#[component]
pub fn GenerateButton<F>(
    #[prop(into)] can_submit: Signal<bool>,
    #[prop(into)] label: Signal<&'static str>,
    on_generate: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <button
            class="btn btn-primary btn-generate"
            disabled=move || !can_submit.get()
            on:click={
                let on_generate = on_generate.clone();
                move |_| on_generate(())
            }
        >
            <span class="magic-wand">"🪄"</span>
            {move || label.get()}
        </button>
    }
}
