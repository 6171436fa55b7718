//! フレーズ・トークン辞書

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{
    Map,
    Value,
};

use super::PipelineError;

/// 翻訳辞書
///
/// `phrases` は入力全体との完全一致、`tokens` は単語単位の置換に使う。
/// トークンは辞書ドキュメントの記述順を保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// 完全一致フレーズ
    pub phrases: HashMap<String, String>,
    /// 置換トークン（記述順）
    pub tokens: Vec<(String, String)>,
}

/// 辞書ドキュメントの JSON 表現
#[derive(Debug, Deserialize)]
struct RawDictionary {
    /// 完全一致フレーズ
    #[serde(default)]
    phrases: Map<String, Value>,
    /// 置換トークン
    #[serde(default)]
    tokens: Map<String, Value>,
}

impl Dictionary {
    /// フレーズとトークンから辞書を作成
    pub fn new(
        phrases: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
        tokens: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            phrases: phrases.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            tokens: tokens.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// `{ "phrases": {...}, "tokens": {...} }` 形式の JSON から辞書を作成
    ///
    /// 文字列以外の値と空のトークンキーは無視する。
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let raw: RawDictionary = serde_json::from_str(json)?;

        let phrases = string_entries(raw.phrases, "phrase").collect();
        let tokens = string_entries(raw.tokens, "token")
            .filter(|(key, _)| {
                if key.is_empty() {
                    tracing::debug!("Ignoring empty token key");
                }
                !key.is_empty()
            })
            .collect();

        Ok(Self { phrases, tokens })
    }

    /// 辞書ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        tracing::debug!("Loading dictionary from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// 文字列値のエントリのみを取り出す
fn string_entries(
    map: Map<String, Value>,
    kind: &'static str,
) -> impl Iterator<Item = (String, String)> {
    map.into_iter().filter_map(move |(key, value)| match value {
        Value::String(text) => Some((key, text)),
        other => {
            tracing::debug!(kind, key = %key, value = %other, "Ignoring non-string dictionary entry");
            None
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn from_json_keeps_token_order() {
        let json = r#"{
            "phrases": {"Salvar": "Guardar"},
            "tokens": {"tarefa": "tarea", "projeto": "proyecto", "equipe": "equipo"}
        }"#;

        let dictionary = Dictionary::from_json(json).unwrap();

        expect_that!(dictionary.phrases.get("Salvar"), some(eq("Guardar")));
        assert_eq!(
            dictionary.tokens,
            vec![
                ("tarefa".to_string(), "tarea".to_string()),
                ("projeto".to_string(), "proyecto".to_string()),
                ("equipe".to_string(), "equipo".to_string()),
            ]
        );
    }

    #[googletest::test]
    fn from_json_ignores_non_string_values_and_empty_tokens() {
        let json = r#"{"phrases": {"a": 1, "b": "B"}, "tokens": {"": "x", "c": null}}"#;

        let dictionary = Dictionary::from_json(json).unwrap();

        expect_that!(dictionary.phrases.len(), eq(1));
        expect_that!(dictionary.tokens, is_empty());
    }

    #[googletest::test]
    fn from_json_allows_missing_sections() {
        let dictionary = Dictionary::from_json("{}").unwrap();

        assert_eq!(dictionary, Dictionary::default());
    }

    #[googletest::test]
    fn from_json_rejects_invalid_documents() {
        expect_that!(Dictionary::from_json("[1, 2]"), err(anything()));
    }
}
