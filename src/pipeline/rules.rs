//! 順序付きパターンルール
//!
//! 各ルールはマッチャー（正規表現）とリライター（キャプチャから置換文字列を作る純粋関数）の組。
//! ルールはリストの順に評価され、最初に一致したルールだけが適用される。

use regex::{
    Captures,
    Regex,
};

use super::{
    PipelineError,
    RewriteError,
};

/// キャプチャから置換文字列を作る関数
///
/// 関数ポインタなので状態を持てない。
pub type Rewriter = fn(&Captures<'_>) -> Result<String, RewriteError>;

/// 置換範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteScope {
    /// 最初の一致箇所のみ
    First,
    /// すべての一致箇所
    All,
}

/// パターンルール
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// ログ用のルール名
    name: &'static str,
    /// 入力全体に対して評価されるパターン
    matcher: Regex,
    /// 置換範囲
    scope: RewriteScope,
    /// 置換関数
    rewriter: Rewriter,
}

impl PatternRule {
    /// ルールを作成
    pub fn new(
        name: &'static str,
        pattern: &str,
        scope: RewriteScope,
        rewriter: Rewriter,
    ) -> Result<Self, PipelineError> {
        let matcher = Regex::new(pattern)
            .map_err(|source| PipelineError::InvalidPattern { rule: name, source })?;
        Ok(Self { name, matcher, scope, rewriter })
    }

    /// ルール名
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// 入力がこのルールに一致するか
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.matcher.is_match(input)
    }

    /// 一致した範囲だけを書き換える。範囲外の文字列はそのまま残る。
    pub fn apply(&self, input: &str) -> Result<String, RewriteError> {
        let mut output = String::with_capacity(input.len());
        let mut last_end = 0;

        for captures in self.matcher.captures_iter(input) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            output.push_str(input.get(last_end..whole.start()).unwrap_or_default());
            output.push_str(&(self.rewriter)(&captures)?);
            last_end = whole.end();

            if self.scope == RewriteScope::First {
                break;
            }
        }

        output.push_str(input.get(last_end..).unwrap_or_default());
        Ok(output)
    }
}

/// キャプチャグループの文字列を取得する
///
/// グループがマッチに参加していない場合はエラー。
pub fn capture<'h>(captures: &Captures<'h>, index: usize) -> Result<&'h str, RewriteError> {
    captures.get(index).map(|m| m.as_str()).ok_or(RewriteError::MissingGroup(index))
}

/// 順序付きルールリスト
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// 評価順のルール
    rules: Vec<PatternRule>,
}

impl RuleSet {
    /// ルールリストを作成
    #[must_use]
    pub const fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// 末尾にルールを追加
    #[must_use]
    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// ルール数
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// ルールが空か
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// ルール名を評価順に列挙
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(PatternRule::name)
    }

    /// 最初に一致したルールで書き換える
    ///
    /// リライターが失敗したルールは一致しなかったものとして次のルールを試す。
    /// どのルールも適用できなければ `None`。
    #[must_use]
    pub fn rewrite(&self, input: &str) -> Option<String> {
        for rule in &self.rules {
            if !rule.is_match(input) {
                continue;
            }
            match rule.apply(input) {
                Ok(output) => {
                    tracing::trace!(rule = rule.name, "Pattern rule applied");
                    return Some(output);
                }
                Err(err) => {
                    tracing::debug!(rule = rule.name, %err, "Rewriter failed, trying next rule");
                }
            }
        }
        None
    }

    /// ポルトガル語 → スペイン語の組み込みルール
    pub fn portuguese_to_spanish() -> Result<Self, PipelineError> {
        use RewriteScope::{
            All,
            First,
        };

        Ok(Self::new(vec![
            PatternRule::new(
                "weights-below-total",
                r"A soma dos pesos das tarefas está abaixo de 100% \(atual: (\d+)%\)\.",
                First,
                |c| {
                    Ok(format!(
                        "La suma de los pesos de las tareas está por debajo del 100% (actual: {}%).",
                        capture(c, 1)?
                    ))
                },
            )?,
            PatternRule::new(
                "weights-above-total",
                r"A soma dos pesos das tarefas ultrapassa 100% \(atual: (\d+)%\)\.",
                First,
                |c| {
                    Ok(format!(
                        "La suma de los pesos de las tareas supera el 100% (actual: {}%).",
                        capture(c, 1)?
                    ))
                },
            )?,
            PatternRule::new("total-weight", r"Peso total das tarefas:\s*(.*)", First, |c| {
                Ok(format!("Peso total de las tareas: {}", capture(c, 1)?))
            })?,
            PatternRule::new(
                "weekly-capacity",
                r"(\d+)% da capacidade semanal utilizada",
                First,
                |c| Ok(format!("{}% de la capacidad semanal utilizada", capture(c, 1)?)),
            )?,
            PatternRule::new(
                "remaining-time",
                r"Tempo estimado restante:\s*(\d+(?:[.,]\d+)?)\s*sem\s*\((\d+(?:[.,]\d+)?)\s*dias\s*/\s*(\d+(?:[.,]\d+)?)\s*h\)",
                First,
                |c| {
                    Ok(format!(
                        "Tiempo estimado restante: {} semanas ({} días / {} h)",
                        capture(c, 1)?,
                        capture(c, 2)?,
                        capture(c, 3)?
                    ))
                },
            )?,
            PatternRule::new(
                "developers-missing-hours",
                r"^Aviso: os seguintes desenvolvedores ativos ainda não possuem horas de trabalho por semana cadastradas: (.*)\.$",
                First,
                |c| {
                    Ok(format!(
                        "Aviso: los siguientes desarrolladores activos aún no poseen horas de trabajo por semana registradas: {}.",
                        capture(c, 1)?
                    ))
                },
            )?,
            PatternRule::new(
                "no-developer-hours",
                r"^Nenhum desenvolvedor ativo possui horas de trabalho por semana cadastradas\. Edite os membros para preencher esse dado \((.*)\)\.$",
                First,
                |c| {
                    Ok(format!(
                        "Ningún desarrollador activo posee horas de trabajo por semana registradas. Edite los miembros para completar ese dato ({}).",
                        capture(c, 1)?
                    ))
                },
            )?,
            PatternRule::new(
                "left-the-team",
                r"\s*\(não está mais na equipe\)",
                All,
                |_| Ok(" (ya no está en el equipo)".to_string()),
            )?,
            PatternRule::new(
                "project-weights-alert",
                r"A soma dos pesos de todas as tarefas deste projeto precisa ser exatamente 100%\.[\s\S]*?Soma atual: (\d+)%\.",
                First,
                |c| {
                    Ok(format!(
                        "La suma de los pesos de todas las tareas de este proyecto debe ser exactamente 100%.\n\nSuma actual: {}%.",
                        capture(c, 1)?
                    ))
                },
            )?,
            // Matches the standalone word anywhere, including inside names.
            PatternRule::new("conjunction-e", r"(?i)\be\b", All, |_| Ok("y".to_string()))?,
        ]))
    }
}
