//! サブツリーの走査

use super::{
    SkipRules,
    SyncReport,
};
use crate::dom::{
    Document,
    NodeId,
    NodeKind,
};
use crate::pipeline::TranslationPipeline;

/// 走査中のノードの扱い
enum Visit {
    /// テキストノードを翻訳する
    Text,
    /// 属性を翻訳して子を訪問する
    Descend,
    /// 何もしない
    Skip,
}

/// サブツリーを文書順（前順）に翻訳する
///
/// 翻訳対象外のタグとスキップ指定を持つ要素はサブツリーごと飛ばす。
/// ノード単位の失敗は結果に記録し、走査を続ける。
pub fn translate_subtree(
    pipeline: &TranslationPipeline,
    rules: &SkipRules,
    doc: &mut Document,
    root: NodeId,
) -> SyncReport {
    let mut report = SyncReport::default();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let visit = match doc.kind(node) {
            Ok(NodeKind::Text(_)) => Visit::Text,
            Ok(NodeKind::Element(element)) if rules.excludes(element) => Visit::Skip,
            Ok(NodeKind::Element(_)) => Visit::Descend,
            Ok(NodeKind::Comment(_)) => Visit::Skip,
            Err(err) => {
                report.record_failure(node, err);
                continue;
            }
        };

        match visit {
            Visit::Text => translate_text_node(pipeline, doc, node, &mut report),
            Visit::Descend => {
                translate_attributes(pipeline, rules, doc, node, &mut report);
                match doc.children(node) {
                    Ok(children) => stack.extend(children.iter().rev()),
                    Err(err) => report.record_failure(node, err),
                }
            }
            Visit::Skip => {}
        }
    }

    tracing::debug!(
        %root,
        texts = report.texts_translated,
        attributes = report.attributes_translated,
        failures = report.failures.len(),
        "Subtree translated"
    );
    report
}

/// テキストノードを翻訳し、変化した場合だけ書き換える
pub fn translate_text_node(
    pipeline: &TranslationPipeline,
    doc: &mut Document,
    node: NodeId,
    report: &mut SyncReport,
) {
    let translated = match doc.text(node) {
        Ok(text) => {
            let translated = pipeline.translate_text(text);
            if translated == text {
                return;
            }
            translated
        }
        Err(err) => {
            report.record_failure(node, err);
            return;
        }
    };

    match doc.set_text(node, translated) {
        Ok(()) => report.texts_translated += 1,
        Err(err) => report.record_failure(node, err),
    }
}

/// 要素の翻訳対象属性をすべて翻訳する
pub fn translate_attributes(
    pipeline: &TranslationPipeline,
    rules: &SkipRules,
    doc: &mut Document,
    node: NodeId,
    report: &mut SyncReport,
) {
    for name in rules.translated_attributes() {
        translate_attribute(pipeline, doc, node, name, report);
    }
}

/// 属性を翻訳し、変化した場合だけ書き換える
pub(super) fn translate_attribute(
    pipeline: &TranslationPipeline,
    doc: &mut Document,
    node: NodeId,
    name: &str,
    report: &mut SyncReport,
) {
    let translated = match doc.attribute(node, name) {
        Ok(Some(value)) => {
            let translated = pipeline.translate_text(value);
            if translated == value {
                return;
            }
            translated
        }
        Ok(None) => return,
        Err(err) => {
            report.record_failure(node, err);
            return;
        }
    };

    match doc.set_attribute(node, name, translated) {
        Ok(()) => report.attributes_translated += 1,
        Err(err) => report.record_failure(node, err),
    }
}
