//! チャートラベルの翻訳
//!
//! Chart.js 形式の設定（`data.datasets[].label`, `data.labels`, `options.scales.*.title.text`）を翻訳して再描画する。

use serde_json::Value;
use thiserror::Error;

use crate::pipeline::TranslationPipeline;

/// Errors raised while translating a chart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("Chart update failed: {0}")]
    Update(String),
    #[error("Unexpected chart shape at '{path}': found {found}")]
    Shape { path: &'static str, found: &'static str },
}

/// 翻訳対象のチャート
pub trait ChartSurface {
    /// 変更可能な設定
    fn config_mut(&mut self) -> &mut Value;

    /// 設定の変更を反映して再描画する
    fn update(&mut self) -> Result<(), ChartError>;
}

/// チャートの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartVariant {
    #[default]
    Standard,
    /// カテゴリラベルが開発者名のチャート。カテゴリラベルは翻訳しない。
    PerDeveloper,
}

impl From<&str> for ChartVariant {
    fn from(kind: &str) -> Self {
        match kind {
            "dev" => Self::PerDeveloper,
            _ => Self::Standard,
        }
    }
}

/// JSON 設定だけを持つチャート
#[derive(Debug, Clone, Default)]
pub struct JsonChart {
    /// Chart.js 形式の設定
    config: Value,
    /// `update` の呼び出し回数
    updates: usize,
}

impl JsonChart {
    #[must_use]
    pub const fn new(config: Value) -> Self {
        Self { config, updates: 0 }
    }

    #[must_use]
    pub const fn config(&self) -> &Value {
        &self.config
    }

    #[must_use]
    pub const fn update_count(&self) -> usize {
        self.updates
    }

    #[must_use]
    pub fn into_config(self) -> Value {
        self.config
    }
}

impl ChartSurface for JsonChart {
    fn config_mut(&mut self) -> &mut Value {
        &mut self.config
    }

    fn update(&mut self) -> Result<(), ChartError> {
        self.updates += 1;
        Ok(())
    }
}

/// JSON 値の種類名
const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `path` にある配列を取得する。存在しなければ `None`、配列でなければエラー。
fn array_at<'a>(
    config: &'a mut Value,
    pointer: &str,
    path: &'static str,
) -> Result<Option<&'a mut Vec<Value>>, ChartError> {
    match config.pointer_mut(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(ChartError::Shape { path, found: kind_of(other) }),
    }
}

/// データセットのラベルを翻訳する
fn translate_dataset_labels(
    pipeline: &TranslationPipeline,
    config: &mut Value,
) -> Result<(), ChartError> {
    let Some(datasets) = array_at(config, "/data/datasets", "data.datasets")? else {
        return Ok(());
    };
    for dataset in datasets {
        if let Some(Value::String(label)) = dataset.get_mut("label") {
            *label = pipeline.translate_text(label);
        }
    }
    Ok(())
}

/// カテゴリラベルを翻訳する。文字列以外はそのまま。
fn translate_category_labels(
    pipeline: &TranslationPipeline,
    config: &mut Value,
) -> Result<(), ChartError> {
    let Some(labels) = array_at(config, "/data/labels", "data.labels")? else {
        return Ok(());
    };
    for label in labels {
        *label = pipeline.translate_value(label);
    }
    Ok(())
}

/// すべての軸タイトルを翻訳する
fn translate_scale_titles(
    pipeline: &TranslationPipeline,
    config: &mut Value,
) -> Result<(), ChartError> {
    let scales = match config.pointer_mut("/options/scales") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(scales)) => scales,
        Some(other) => {
            return Err(ChartError::Shape { path: "options.scales", found: kind_of(other) });
        }
    };
    for scale in scales.values_mut() {
        if let Some(Value::String(text)) = scale.pointer_mut("/title/text") {
            *text = pipeline.translate_text(text);
        }
    }
    Ok(())
}

/// チャートのラベルを翻訳して再描画する
///
/// 各段階の失敗は記録して次の段階へ進む。
pub fn apply_chart_translations(
    pipeline: &TranslationPipeline,
    chart: &mut impl ChartSurface,
    variant: ChartVariant,
) -> Vec<ChartError> {
    let mut errors = Vec::new();
    let config = chart.config_mut();

    if let Err(err) = translate_dataset_labels(pipeline, config) {
        errors.push(err);
    }
    if variant == ChartVariant::PerDeveloper {
        tracing::trace!("Keeping per-developer category labels");
    } else if let Err(err) = translate_category_labels(pipeline, config) {
        errors.push(err);
    }
    if let Err(err) = translate_scale_titles(pipeline, config) {
        errors.push(err);
    }
    if let Err(err) = chart.update() {
        errors.push(err);
    }

    for err in &errors {
        tracing::warn!(%err, "Chart translation step failed");
    }
    errors
}
