//! エラーバナー（次のエラーで置き換わる）

use leptos::prelude::*;

#[component]
pub fn ErrorBanner(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! { <div class="error-banner" role="alert">{message}</div> }
        })
    }
}
