//! Photo Magic CLI
//!
//! 写真と編集指示をGeminiに送り、編集済み画像を保存する。
//! 状態管理・エンコード・ワイヤーフォーマットは photo_magic_common を使う。

pub mod cli;
pub mod config;
pub mod edit;
pub mod error;
pub mod file_image;
pub mod gemini;
