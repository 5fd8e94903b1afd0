//! 処理中オーバーレイ

use leptos::prelude::*;

#[component]
pub fn LoadingOverlay() -> impl IntoView {
    view! {
        <div class="loading-overlay">
            <div class="spinner"></div>
            <p class="loading-text">"Processing..."</p>
        </div>
    }
}
