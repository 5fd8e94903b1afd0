//! UIコンポーネント

pub mod error_banner;
pub mod generate_button;
pub mod header;
pub mod image_viewer;
pub mod instruction_input;
pub mod loading_overlay;
pub mod settings_panel;
pub mod upload_area;
