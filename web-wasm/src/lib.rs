//! Photo Magic Web App (Leptos + WASM)

mod api;
mod api_key_store;
mod app;
mod browser_image;
mod components;
mod js_error;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}
