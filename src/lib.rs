//! dom-i18n-sync
//!
//! 実行中のドキュメントのテキストを翻訳し、ドキュメントの変更に追従して翻訳状態を保つエンジン

pub mod chart;
pub mod config;
pub mod declarative;
pub mod dialog;
pub mod dom;
pub mod engine;
pub mod locale;
pub mod pipeline;
pub mod sync;

#[cfg(test)]
mod test_utils;

pub use engine::LiveTranslator;
pub use pipeline::TranslationPipeline;
