//! Translates stdin line by line with the project's dictionary and built-in rules.

use std::path::PathBuf;
use std::process::ExitCode;

use dom_i18n_sync::TranslationPipeline;
use dom_i18n_sync::config::{
    ConfigError,
    ConfigManager,
};
use dom_i18n_sync::pipeline::{
    Dictionary,
    PipelineError,
    RuleSet,
};
use thiserror::Error;
use tokio::io::{
    AsyncBufReadExt,
    AsyncWriteExt,
    BufReader,
};
use tracing_subscriber::EnvFilter;

/// Errors that end the process.
#[derive(Error, Debug)]
enum CliError {
    /// 設定の読み込み失敗
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 辞書・ルールの構築失敗
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// 標準入出力の失敗
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// 設定と辞書を読み込み、標準入力を翻訳して標準出力に書く
async fn run() -> Result<(), CliError> {
    let project_root = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir()?,
    };

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(project_root))?;
    let settings = config_manager.get_settings();

    let dictionary = match &settings.dictionary_path {
        Some(path) => Dictionary::load(&config_manager.resolve_path(path))?,
        None => {
            tracing::info!("No dictionary configured, using built-in rules only");
            Dictionary::default()
        }
    };
    let pipeline = TranslationPipeline::new(dictionary, RuleSet::portuguese_to_spanish()?);
    tracing::info!(
        phrases = pipeline.phrase_count(),
        rules = pipeline.rules().len(),
        "Translation pipeline ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        let translated = pipeline.translate_text(&line);
        stdout.write_all(translated.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
