//! `{{name}}` プレースホルダーの置換

use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};
use serde_json::{
    Map,
    Value,
};

/// プレースホルダーに埋め込む値
pub type Params = Map<String, Value>;

/// `{{ name }}` プレースホルダー
static PLACEHOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(\w+)\s*\}\}")
        .inspect_err(|err| tracing::error!(%err, "Invalid placeholder pattern"))
        .ok()
});

/// テンプレート中の `{{name}}` をパラメータで置換する
///
/// 括弧内の前後の空白は許容する。対応するパラメータがない場合は空文字列になる。
#[must_use]
pub fn format(template: &str, params: &Params) -> String {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };
    placeholder
        .replace_all(template, |captures: &Captures<'_>| {
            captures
                .get(1)
                .and_then(|name| params.get(name.as_str()))
                .map(value_text)
                .unwrap_or_default()
        })
        .into_owned()
}

/// 値をテキストに変換する
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    /// JSON オブジェクトからパラメータを作成
    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[rstest]
    #[case("Olá, {{name}}!", "Olá, Ana!")]
    #[case("Olá, {{ name }}!", "Olá, Ana!")]
    #[case("{{count}} tarefas", "3 tarefas")]
    #[case("Faltando: [{{missing}}]", "Faltando: []")]
    #[case("Sem placeholders", "Sem placeholders")]
    #[case("Aberto {{name", "Aberto {{name")]
    #[case("{{ {{name}}", "{{ Ana")]
    #[case("{{a-b}}", "{{a-b}}")]
    #[case("{{{name}}}", "{Ana}")]
    #[case("{{name}}{{count}}", "Ana3")]
    fn formats_placeholders(#[case] template: &str, #[case] expected: &str) {
        let params = params(json!({"name": "Ana", "count": 3}));

        assert_that!(format(template, &params), eq(expected));
    }
}
