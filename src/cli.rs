use clap::{Parser, Subcommand};
use photo_magic_common::types::DOWNLOAD_FILE_NAME;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-magic")]
#[command(about = "写真をAIで編集するツール（Gemini）", long_about = None, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を編集指示に従って編集
    Edit {
        /// 入力画像（PNG/JPG/WEBP）
        #[arg(required = true)]
        input: PathBuf,

        /// 編集指示（省略時は対話入力）
        #[arg(short, long)]
        instruction: Option<String>,

        /// 出力ファイル
        #[arg(short, long, default_value = DOWNLOAD_FILE_NAME)]
        output: PathBuf,

        /// 使用するモデル（設定値を上書き）
        #[arg(long)]
        model: Option<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を管理
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
