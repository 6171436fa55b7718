//! 変更記録への追従

use super::walker::{
    translate_attribute,
    translate_subtree,
    translate_text_node,
};
use super::{
    SkipRules,
    SyncReport,
};
use crate::dom::{
    Document,
    MutationRecord,
    NodeId,
};
use crate::pipeline::TranslationPipeline;

/// 1 回の `pump` で変更記録を処理する最大ラウンド数
///
/// 翻訳結果の書き込み自体も記録されるため、冪等な翻訳なら 2 ラウンド目で収束する。
pub const MAX_PUMP_ROUNDS: usize = 8;

/// ドキュメントの変更に追従して翻訳する
#[derive(Debug, Clone)]
pub struct Observer {
    /// 翻訳対象外の判定
    rules: SkipRules,
    /// 監視するサブツリーのルート
    root: NodeId,
}

impl Observer {
    /// `root` のサブツリーの変更記録を開始する
    pub fn start(doc: &mut Document, rules: SkipRules, root: NodeId) -> Self {
        doc.observe(root, rules.mutation_filter());
        tracing::debug!(%root, "Started observing document mutations");
        Self { rules, root }
    }

    /// 監視するサブツリーのルート
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// 溜まった変更記録に反応する
    ///
    /// 記録が空になるまで繰り返す。上限ラウンドに達した場合は残りを次回に持ち越す。
    pub fn pump(&self, pipeline: &TranslationPipeline, doc: &mut Document) -> SyncReport {
        let mut report = SyncReport::default();

        for round in 0..MAX_PUMP_ROUNDS {
            let records = doc.take_records();
            if records.is_empty() {
                return report;
            }
            tracing::trace!(round, records = records.len(), "Reacting to mutations");
            for record in records {
                self.react(pipeline, doc, record, &mut report);
            }
        }

        let pending = doc.pending_records();
        if pending > 0 {
            tracing::warn!(
                pending,
                rounds = MAX_PUMP_ROUNDS,
                "Mutation reactions did not settle, deferring remaining records"
            );
        }
        report
    }

    /// 変更記録 1 件に反応する
    fn react(
        &self,
        pipeline: &TranslationPipeline,
        doc: &mut Document,
        record: MutationRecord,
        report: &mut SyncReport,
    ) {
        match record {
            MutationRecord::ChildList { added, .. } => {
                for node in added {
                    if doc.element(node).is_err() || !self.is_live(doc, node) {
                        continue;
                    }
                    report.merge(translate_subtree(pipeline, &self.rules, doc, node));
                }
            }
            MutationRecord::CharacterData { target } => {
                if self.is_live(doc, target) {
                    translate_text_node(pipeline, doc, target, report);
                }
            }
            MutationRecord::Attributes { target, name } => {
                if self.rules.is_translated_attribute(&name) && self.is_live(doc, target) {
                    translate_attribute(pipeline, doc, target, &name, report);
                }
            }
        }
    }

    /// 監視範囲内にあり、翻訳対象外の領域に入っていないか
    fn is_live(&self, doc: &Document, node: NodeId) -> bool {
        doc.is_inclusive_descendant(node, self.root) && !self.rules.is_within_skip_zone(doc, node)
    }

    /// 変更記録を停止する
    pub fn stop(self, doc: &mut Document) {
        doc.disconnect();
        tracing::debug!(root = %self.root, "Stopped observing document mutations");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::test_utils::pipeline;

    /// 監視を開始したドキュメント
    fn observed() -> (Document, Observer) {
        let mut doc = Document::new();
        let root = doc.body();
        let observer = Observer::start(&mut doc, SkipRules::default(), root);
        (doc, observer)
    }

    #[rstest]
    fn inserted_elements_are_translated(pipeline: TranslationPipeline) {
        let (mut doc, observer) = observed();
        let div = doc.create_element("div");
        let text = doc.create_text("Equipe");
        doc.append_child(div, text).unwrap();
        doc.set_attribute(div, "placeholder", "Salvar").unwrap();

        doc.append_child(doc.body(), div).unwrap();
        let report = observer.pump(&pipeline, &mut doc);

        assert_that!(doc.text(text).unwrap(), eq("Equipo"));
        assert_that!(doc.attribute(div, "placeholder").unwrap(), some(eq("Guardar")));
        assert_that!(report.changes(), eq(2));
        assert_that!(doc.pending_records(), eq(0));
    }

    #[rstest]
    fn inserted_text_nodes_wait_for_character_changes(pipeline: TranslationPipeline) {
        let (mut doc, observer) = observed();
        let text = doc.create_text("Equipe");

        doc.append_child(doc.body(), text).unwrap();
        observer.pump(&pipeline, &mut doc);
        assert_that!(doc.text(text).unwrap(), eq("Equipe"));

        doc.set_text(text, "Salvar").unwrap();
        observer.pump(&pipeline, &mut doc);
        assert_that!(doc.text(text).unwrap(), eq("Guardar"));
    }

    #[rstest]
    fn watched_attribute_changes_are_translated(pipeline: TranslationPipeline) {
        let (mut doc, observer) = observed();
        let input = doc.create_element("input");
        doc.append_child(doc.body(), input).unwrap();
        observer.pump(&pipeline, &mut doc);

        doc.set_attribute(input, "aria-label", "Equipe").unwrap();
        doc.set_attribute(input, "value", "Equipe").unwrap();
        observer.pump(&pipeline, &mut doc);

        assert_that!(doc.attribute(input, "aria-label").unwrap(), some(eq("Equipo")));
        assert_that!(doc.attribute(input, "value").unwrap(), some(eq("Equipe")));
    }

    #[rstest]
    fn changes_inside_skip_zone_are_ignored(pipeline: TranslationPipeline) {
        let (mut doc, observer) = observed();
        let zone = doc.create_element("div");
        doc.set_attribute(zone, "class", "no-translate").unwrap();
        let text = doc.create_text("Equipe");
        doc.append_child(zone, text).unwrap();
        doc.append_child(doc.body(), zone).unwrap();
        observer.pump(&pipeline, &mut doc);

        doc.set_text(text, "Salvar").unwrap();
        doc.set_attribute(zone, "title", "Equipe").unwrap();
        let report = observer.pump(&pipeline, &mut doc);

        assert_that!(doc.text(text).unwrap(), eq("Salvar"));
        assert_that!(doc.attribute(zone, "title").unwrap(), some(eq("Equipe")));
        assert_that!(report.is_unchanged(), eq(true));
    }

    #[rstest]
    fn pump_reaches_quiescence(pipeline: TranslationPipeline) {
        let (mut doc, observer) = observed();
        let p = doc.create_element("p");
        let text = doc.create_text("Ana e Bruno");
        doc.append_child(p, text).unwrap();
        doc.append_child(doc.body(), p).unwrap();

        observer.pump(&pipeline, &mut doc);
        let again = observer.pump(&pipeline, &mut doc);

        assert_that!(doc.text(text).unwrap(), eq("Ana y Bruno"));
        assert_that!(again.is_unchanged(), eq(true));
        assert_that!(doc.pending_records(), eq(0));
    }

    #[rstest]
    fn stop_disconnects(pipeline: TranslationPipeline) {
        let (mut doc, observer) = observed();
        observer.stop(&mut doc);
        let text = doc.create_text("Equipe");
        doc.append_child(doc.body(), text).unwrap();

        assert_that!(doc.is_observed(), eq(false));
        assert_that!(doc.text(text).unwrap(), eq("Equipe"));
        assert_that!(pipeline.translate_text("Equipe"), eq("Equipo"));
    }
}
