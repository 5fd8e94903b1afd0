//! 元画像・編集結果の並列表示

use leptos::prelude::*;
use photo_magic_common::Download;

use crate::components::loading_overlay::LoadingOverlay;

#[component]
pub fn ImageViewer(
    #[prop(into)] original: Signal<Option<String>>,
    #[prop(into)] edited: Signal<Option<String>>,
    #[prop(into)] download: Signal<Option<Download>>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="panel viewer">
            <Show
                when=move || original.get().is_some()
                fallback=|| view! {
                    <div class="viewer-empty text-muted">"Upload an image to get started"</div>
                }
            >
                <div class="viewer-panels">
                    <ImagePanel title="Original" image_url=original show_placeholder=false />

                    <ImagePanel
                        title="Edited"
                        image_url=edited
                        show_placeholder=Signal::derive(move || !is_loading.get())
                    >
                        <Show when=move || is_loading.get()>
                            <LoadingOverlay />
                        </Show>
                        {move || download.get().map(|d| view! {
                            <a class="btn btn-download" href=d.href download=d.file_name>
                                "⬇ Download"
                            </a>
                        })}
                    </ImagePanel>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ImagePanel(
    title: &'static str,
    #[prop(into)] image_url: Signal<Option<String>>,
    #[prop(into)] show_placeholder: Signal<bool>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="image-panel">
            <h3 class="image-panel-title">{title}</h3>
            <div class="image-frame">
                {move || match image_url.get() {
                    Some(url) => view! { <img src=url alt=title class="image-content" /> }.into_any(),
                    None if show_placeholder.get() => {
                        view! { <div class="text-muted">"Your image will appear here."</div> }.into_any()
                    }
                    None => ().into_any(),
                }}
                {children.map(|c| c())}
            </div>
        </div>
    }
}
