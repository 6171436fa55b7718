//! 設定の読み込みとバリデーション
/// 設定ファイルローダー
mod loader;
/// 設定マネージャー
mod manager;
/// 設定の型定義
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    I18nSettings,
    SkipSettings,
    ValidationError,
};
