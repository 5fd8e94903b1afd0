use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use photo_magic::{cli, config, edit, gemini};
use cli::{Cli, Commands};
use config::Config;
use edit::EditRequest;
use gemini::GeminiClient;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;

    match cli.command {
        Commands::Edit { input, instruction, output, model, json } => {
            if !json {
                println!("🪄 photo-magic - 画像編集\n");
            }

            let instruction = match instruction {
                Some(instruction) => instruction,
                None => prompt_instruction()?,
            };

            let api_key = config.get_api_key()?;
            let model = model.unwrap_or_else(|| config.model.clone());
            let client = GeminiClient::new(api_key, Some(model), Duration::from_secs(config.timeout_seconds))?;

            let request = EditRequest {
                input,
                instruction,
                output,
                show_progress: !json,
            };
            let report = edit::edit_image(&client, &request)
                .await
                .with_context(|| format!("{} の編集に失敗しました", request.input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("✔ 編集済み画像を保存: {} ({} bytes)", report.output.display(), report.bytes_written);
                println!("\n✅ 完了");
            }
        }

        Commands::Config { set_api_key, set_model, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ファイル: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    config.masked_api_key().unwrap_or_else(|| "未設定".into())
                );
                if std::env::var(config::API_KEY_ENV).is_ok() {
                    println!("  ({} が設定されているため、こちらが優先されます)", config::API_KEY_ENV);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_instruction() -> anyhow::Result<String> {
    let instruction: String = Input::new()
        .with_prompt("編集指示 (例: 帽子をかぶせて)")
        .allow_empty(true)
        .interact_text()
        .context("編集指示の入力に失敗しました")?;
    Ok(instruction)
}
