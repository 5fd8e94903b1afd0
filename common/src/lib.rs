//! Photo Magic Common Library
//!
//! CLIとWeb(WASM)で共有される状態管理・エンコーダ・Gemini連携の型

pub mod editor;
pub mod encoder;
pub mod error;
pub mod gemini;
pub mod state;
pub mod types;

pub use editor::{run_edit, ImageEditor};
pub use encoder::{decode_base64, encode_bytes, split_data_url, to_data_url, ImageSource, InMemoryImage};
pub use error::{Error, Result, ValidationError};
pub use gemini::{build_edit_request, endpoint_url, parse_edit_response, GeminiRequest, GeminiResponse};
pub use state::{submit, Completion, EditTicket, EditorState, Phase};
pub use types::{Download, EncodedImage, ImageFormat, ResultImage};
