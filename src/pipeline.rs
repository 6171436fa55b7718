//! 翻訳パイプライン
//!
//! 実行時の任意の文字列を、次の優先順位で翻訳する:
//! 1. 完全一致フレーズ
//! 2. 順序付きパターンルール（最初に一致したルールのみ適用）
//! 3. 単語単位のトークン置換

/// フレーズ・トークン辞書
mod dictionary;
/// パイプラインのエラー型
mod error;
/// パターンルール
mod rules;
/// トークン置換
mod tokens;

use std::collections::HashMap;
use std::fmt::Display;

use serde_json::Value;

pub use dictionary::Dictionary;
pub use error::{
    PipelineError,
    RewriteError,
};
pub use rules::{
    PatternRule,
    RewriteScope,
    Rewriter,
    RuleSet,
    capture,
};
use tokens::CompiledToken;

/// 翻訳パイプライン
///
/// 構築後は不変で、同じ入力には常に同じ出力を返す。
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    /// 完全一致フレーズ
    phrases: HashMap<String, String>,
    /// 評価順のパターンルール
    rules: RuleSet,
    /// 辞書順のトークン
    tokens: Vec<CompiledToken>,
}

impl TranslationPipeline {
    /// 辞書とルールからパイプラインを構築
    ///
    /// トークンの単語境界パターンはここで一度だけ構築する。
    #[must_use]
    pub fn new(dictionary: Dictionary, rules: RuleSet) -> Self {
        let Dictionary { phrases, tokens } = dictionary;
        let tokens = tokens.into_iter().map(|(key, value)| CompiledToken::new(key, value)).collect();
        Self { phrases, rules, tokens }
    }

    /// 辞書もルールも持たない（すべてを素通しする）パイプライン
    #[must_use]
    pub fn passthrough() -> Self {
        Self::new(Dictionary::default(), RuleSet::default())
    }

    /// 値を翻訳する
    ///
    /// `None` は「値なし」としてそのまま返す（空文字列とは区別する）。
    #[must_use]
    pub fn translate(&self, input: Option<&str>) -> Option<String> {
        input.map(|text| self.translate_text(text))
    }

    /// 任意の値をテキストに変換してから翻訳する
    #[must_use]
    pub fn translate_display(&self, input: impl Display) -> String {
        self.translate_text(&input.to_string())
    }

    /// JSON 値を翻訳する。文字列以外はそのまま返す。
    #[must_use]
    pub fn translate_value(&self, input: &Value) -> Value {
        match input {
            Value::String(text) => Value::String(self.translate_text(text)),
            other => other.clone(),
        }
    }

    /// テキストを翻訳する
    #[must_use]
    pub fn translate_text(&self, input: &str) -> String {
        if input.trim().is_empty() {
            return input.to_string();
        }

        if let Some(exact) = self.phrases.get(input) {
            return exact.clone();
        }

        if let Some(rewritten) = self.rules.rewrite(input) {
            return rewritten;
        }

        tokens::substitute(input, &self.tokens)
    }

    /// パターンルール
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 登録済みフレーズ数
    #[must_use]
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }
}
