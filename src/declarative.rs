//! 宣言的キー翻訳
//!
//! `data-i18n` 属性でキーを指定された要素に、ロケールバンドルの文字列を書き込む。
//! パイプライン（フレーズ・パターン・トークン）は通さない。

use crate::dom::{
    Document,
    DomError,
    NodeId,
};
use crate::locale::{
    KeyTranslator,
    Params,
};
use crate::sync::SyncReport;

/// 翻訳キーを指定する属性
pub const KEY_ATTRIBUTE: &str = "data-i18n";
/// 書き込み先を `|` 区切りで指定する属性
pub const TARGET_ATTRIBUTE: &str = "data-i18n-attr";
/// フォーマット用パラメータ（JSON オブジェクト）を指定する属性
pub const PARAMS_ATTRIBUTE: &str = "data-i18n-params";
/// 書き込み先としてテキスト内容を表す名前
pub const TEXT_TARGET: &str = "text";

/// `root` 以下（`root` を含む）のキー指定要素を翻訳し、ドキュメント要素の `lang` を更新する
///
/// スキップ指定は参照しない。
pub fn apply_declarative(
    translator: &impl KeyTranslator,
    doc: &mut Document,
    root: NodeId,
) -> SyncReport {
    let mut report = SyncReport::default();

    let html = doc.document_element();
    if let Err(err) = doc.set_attribute(html, "lang", translator.html_lang()) {
        report.record_failure(html, err);
    }

    let elements = match doc.elements_with_attribute(root, KEY_ATTRIBUTE) {
        Ok(elements) => elements,
        Err(err) => {
            report.record_failure(root, err);
            return report;
        }
    };

    for element in elements {
        if let Err(err) = apply_element(translator, doc, element, &mut report) {
            report.record_failure(element, err);
        }
    }

    tracing::debug!(
        %root,
        texts = report.texts_translated,
        attributes = report.attributes_translated,
        "Declarative translations applied"
    );
    report
}

/// 要素 1 つにキー翻訳を書き込む
fn apply_element(
    translator: &impl KeyTranslator,
    doc: &mut Document,
    element: NodeId,
    report: &mut SyncReport,
) -> Result<(), DomError> {
    let Some(key) = doc.attribute(element, KEY_ATTRIBUTE)? else {
        return Ok(());
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Ok(());
    }

    let params = doc.attribute(element, PARAMS_ATTRIBUTE)?.and_then(|raw| parse_params(element, raw));
    let value = translator.t(&key, params.as_ref());
    let targets = parse_targets(doc.attribute(element, TARGET_ATTRIBUTE)?);

    for target in targets {
        if target == TEXT_TARGET {
            if doc.text_content(element)? != value {
                doc.set_text_content(element, value.clone())?;
                report.texts_translated += 1;
            }
        } else if doc.attribute(element, &target)? != Some(value.as_str()) {
            doc.set_attribute(element, &target, value.clone())?;
            report.attributes_translated += 1;
        }
    }
    Ok(())
}

/// 書き込み先の一覧。指定がなければテキスト内容。
fn parse_targets(raw: Option<&str>) -> Vec<String> {
    let targets: Vec<String> = raw
        .unwrap_or_default()
        .split('|')
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .map(str::to_string)
        .collect();

    if targets.is_empty() { vec![TEXT_TARGET.to_string()] } else { targets }
}

/// パラメータ属性を読む。JSON オブジェクトでなければ無視する。
fn parse_params(element: NodeId, raw: &str) -> Option<Params> {
    match serde_json::from_str::<Params>(raw) {
        Ok(params) => Some(params),
        Err(err) => {
            tracing::warn!(%element, %err, "Ignoring invalid {PARAMS_ATTRIBUTE}");
            None
        }
    }
}
