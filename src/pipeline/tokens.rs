//! 単語単位のトークン置換

use regex::Regex;

/// 置換トークン
#[derive(Debug, Clone)]
pub(super) struct CompiledToken {
    /// 置換後の文字列
    value: String,
    /// 一致判定
    matcher: TokenMatcher,
}

/// トークンの一致判定方法
#[derive(Debug, Clone)]
enum TokenMatcher {
    /// 大文字小文字を無視した単語境界付きの一致
    WordBoundary(Regex),
    /// 単語境界パターンを構築できなかったトークンの部分文字列一致
    Literal(String),
}

impl CompiledToken {
    /// トークンを構築する
    ///
    /// 単語境界パターンが構築できない場合は部分文字列一致にフォールバックする。
    pub(super) fn new(key: String, value: String) -> Self {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(&key));
        let matcher = match Regex::new(&pattern) {
            Ok(re) => TokenMatcher::WordBoundary(re),
            Err(err) => {
                tracing::debug!(token = %key, %err, "Falling back to literal token replacement");
                TokenMatcher::Literal(key)
            }
        };
        Self { value, matcher }
    }

    /// 入力中の一致範囲を列挙する
    fn find_all(&self, input: &str) -> Vec<(usize, usize)> {
        match &self.matcher {
            TokenMatcher::WordBoundary(re) => {
                re.find_iter(input).map(|m| (m.start(), m.end())).collect()
            }
            TokenMatcher::Literal(key) if key.is_empty() => Vec::new(),
            TokenMatcher::Literal(key) => {
                input.match_indices(key.as_str()).map(|(start, s)| (start, start + s.len())).collect()
            }
        }
    }
}

/// 置換対象の範囲
#[derive(Debug, Clone, Copy)]
struct Replacement {
    /// 開始位置（バイト）
    start: usize,
    /// 終了位置（バイト）
    end: usize,
    /// トークンの添字
    token: usize,
}

impl Replacement {
    /// 範囲が重なるか
    const fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// トークンを辞書順に適用する
///
/// 一致は入力文字列に対して判定し、先のトークンで置換済みの範囲には後のトークンを適用しない。
pub(super) fn substitute(input: &str, tokens: &[CompiledToken]) -> String {
    let mut replacements: Vec<Replacement> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        for (start, end) in token.find_all(input) {
            if replacements.iter().all(|r| !r.overlaps(start, end)) {
                replacements.push(Replacement { start, end, token: index });
            }
        }
    }

    if replacements.is_empty() {
        return input.to_string();
    }

    replacements.sort_unstable_by_key(|r| r.start);

    let mut output = String::with_capacity(input.len());
    let mut last_end = 0;
    for replacement in replacements {
        let Some(token) = tokens.get(replacement.token) else {
            continue;
        };
        output.push_str(input.get(last_end..replacement.start).unwrap_or_default());
        output.push_str(&token.value);
        last_end = replacement.end;
    }
    output.push_str(input.get(last_end..).unwrap_or_default());
    output
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    /// テスト用のトークン列を構築
    fn compile(pairs: &[(&str, &str)]) -> Vec<CompiledToken> {
        pairs.iter().map(|(k, v)| CompiledToken::new((*k).to_string(), (*v).to_string())).collect()
    }

    #[rstest]
    #[case("A e B", "A y B")]
    #[case("rest", "rest")]
    #[case("e", "y")]
    #[case("E-mail e senha", "y-mail y senha")]
    fn single_letter_token_respects_word_boundaries(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        let tokens = compile(&[("e", "y")]);

        assert_that!(substitute(input, &tokens), eq(expected));
    }

    #[rstest]
    fn replacement_is_case_insensitive_and_global() {
        let tokens = compile(&[("tarefa", "tarea")]);

        assert_that!(substitute("Tarefa, TAREFA e tarefa", &tokens), eq("tarea, tarea e tarea"));
    }

    #[rstest]
    fn replaced_text_is_not_rescanned() {
        let tokens = compile(&[("projeto", "proyecto de equipe"), ("equipe", "equipo")]);

        assert_that!(
            substitute("projeto da equipe", &tokens),
            eq("proyecto de equipe da equipo")
        );
    }

    #[rstest]
    fn earlier_token_wins_overlapping_region() {
        let tokens = compile(&[("data de entrega", "fecha de entrega"), ("data", "dato")]);

        assert_that!(
            substitute("data de entrega e data", &tokens),
            eq("fecha de entrega e dato")
        );
    }

    #[rstest]
    fn punctuation_in_token_is_escaped() {
        let tokens = compile(&[("c/c", "con")]);

        assert_that!(substitute("pago c/c banco", &tokens), eq("pago con banco"));
        assert_that!(substitute("abc/cd", &tokens), eq("abc/cd"));
    }

    #[rstest]
    fn literal_fallback_replaces_substrings() {
        let token = CompiledToken {
            value: "Y".to_string(),
            matcher: TokenMatcher::Literal("ab".to_string()),
        };

        assert_that!(substitute("xabyab", &[token]), eq("xYyY"));
    }

    #[rstest]
    fn no_tokens_returns_input() {
        assert_that!(substitute("Equipe", &[]), eq("Equipe"));
    }
}
