//! ライブ翻訳エンジン
//!
//! パイプライン・スキップ判定・変更監視をまとめた公開窓口。
//! グローバル状態は持たず、利用側が生成して参照を渡す。

use std::sync::Arc;

use crate::chart::{
    self,
    ChartError,
    ChartSurface,
    ChartVariant,
};
use crate::config::I18nSettings;
use crate::dialog::{
    DialogHost,
    TranslatingDialogs,
};
use crate::dom::{
    Document,
    NodeId,
};
use crate::pipeline::TranslationPipeline;
use crate::sync::{
    Observer,
    SkipRules,
    SyncReport,
    translate_subtree,
};

/// ドキュメントの翻訳状態を保つエンジン
///
/// ライフサイクル: [`new`](Self::new) → [`init`](Self::init)（初回翻訳と監視開始）→
/// [`pump`](Self::pump)（変更への追従）→ [`stop_observing`](Self::stop_observing)
#[derive(Debug, Clone)]
pub struct LiveTranslator {
    /// 翻訳パイプライン
    pipeline: Arc<TranslationPipeline>,
    /// 翻訳対象外の判定
    rules: SkipRules,
    /// 監視中の場合のオブザーバー
    observer: Option<Observer>,
}

impl LiveTranslator {
    #[must_use]
    pub fn new(pipeline: Arc<TranslationPipeline>, settings: &I18nSettings) -> Self {
        Self::with_rules(pipeline, SkipRules::from_settings(settings))
    }

    #[must_use]
    pub const fn with_rules(pipeline: Arc<TranslationPipeline>, rules: SkipRules) -> Self {
        Self { pipeline, rules, observer: None }
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Arc<TranslationPipeline> {
        &self.pipeline
    }

    #[must_use]
    pub const fn rules(&self) -> &SkipRules {
        &self.rules
    }

    /// 値を翻訳する。`None` はそのまま。
    #[must_use]
    pub fn translate(&self, value: Option<&str>) -> Option<String> {
        self.pipeline.translate(value)
    }

    /// サブツリー（省略時は `body`）とドキュメントタイトルを翻訳する
    pub fn scan_and_translate(&self, doc: &mut Document, root: Option<NodeId>) -> SyncReport {
        let root = root.unwrap_or_else(|| doc.body());
        let report = translate_subtree(&self.pipeline, &self.rules, doc, root);

        let title = self.pipeline.translate_text(doc.title());
        if !title.is_empty() && title != doc.title() {
            tracing::debug!(title = %title, "Document title translated");
            doc.set_title(title);
        }
        report
    }

    /// 初回翻訳を行い、`body` の変更監視を開始する
    ///
    /// 監視中に呼ばれた場合は監視をやり直す。
    pub fn init(&mut self, doc: &mut Document) -> SyncReport {
        if let Some(observer) = self.observer.take() {
            observer.stop(doc);
        }

        let report = self.scan_and_translate(doc, None);
        let root = doc.body();
        self.observer = Some(Observer::start(doc, self.rules.clone(), root));

        tracing::info!(
            texts = report.texts_translated,
            attributes = report.attributes_translated,
            failures = report.failures.len(),
            "Live translation started"
        );
        report
    }

    /// 溜まった変更に反応する。監視していなければ何もしない。
    pub fn pump(&self, doc: &mut Document) -> SyncReport {
        self.observer
            .as_ref()
            .map(|observer| observer.pump(&self.pipeline, doc))
            .unwrap_or_default()
    }

    pub fn stop_observing(&mut self, doc: &mut Document) {
        if let Some(observer) = self.observer.take() {
            observer.stop(doc);
        }
    }

    #[must_use]
    pub const fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// メッセージを翻訳してから表示するダイアログでホストを包む
    #[must_use]
    pub fn intercept_dialogs<H: DialogHost>(&self, host: H) -> TranslatingDialogs<H> {
        TranslatingDialogs::new(Arc::clone(&self.pipeline), host)
    }

    pub fn apply_chart_translations(
        &self,
        chart: &mut impl ChartSurface,
        variant: ChartVariant,
    ) -> Vec<ChartError> {
        chart::apply_chart_translations(&self.pipeline, chart, variant)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::chart::JsonChart;
    use crate::test_utils::pipeline;

    /// パイプラインとデフォルト設定のエンジン
    #[fixture]
    fn translator(pipeline: TranslationPipeline) -> LiveTranslator {
        LiveTranslator::new(Arc::new(pipeline), &I18nSettings::default())
    }

    /// `body` に段落を追加する
    fn add_paragraph(doc: &mut Document, text: &str) -> NodeId {
        let p = doc.create_element("p");
        let t = doc.create_text(text);
        doc.append_child(p, t).unwrap();
        let body = doc.body();
        doc.append_child(body, p).unwrap();
        t
    }

    #[rstest]
    fn translate_keeps_none(translator: LiveTranslator) {
        assert_that!(translator.translate(None), none());
        assert_that!(translator.translate(Some("Equipe")), some(eq("Equipo")));
    }

    #[rstest]
    fn scan_translates_body_and_title(translator: LiveTranslator) {
        let mut doc = Document::new();
        doc.set_title("Equipe");
        let text = add_paragraph(&mut doc, "Salvar");

        let report = translator.scan_and_translate(&mut doc, None);

        assert_that!(doc.text(text).unwrap(), eq("Guardar"));
        assert_that!(doc.title(), eq("Equipo"));
        assert_that!(report.texts_translated, eq(1));
    }

    #[rstest]
    fn init_translates_then_follows_mutations(mut translator: LiveTranslator) {
        let mut doc = Document::new();
        let existing = add_paragraph(&mut doc, "Equipe");

        translator.init(&mut doc);
        let inserted = add_paragraph(&mut doc, "Salvar");
        let report = translator.pump(&mut doc);

        assert_that!(translator.is_observing(), eq(true));
        assert_that!(doc.text(existing).unwrap(), eq("Equipo"));
        assert_that!(doc.text(inserted).unwrap(), eq("Guardar"));
        assert_that!(report.texts_translated, eq(1));
    }

    #[rstest]
    fn stopped_translator_ignores_mutations(mut translator: LiveTranslator) {
        let mut doc = Document::new();
        translator.init(&mut doc);
        translator.stop_observing(&mut doc);

        let inserted = add_paragraph(&mut doc, "Salvar");
        let report = translator.pump(&mut doc);

        assert_that!(translator.is_observing(), eq(false));
        assert_that!(doc.text(inserted).unwrap(), eq("Salvar"));
        assert_that!(report.is_unchanged(), eq(true));
    }

    #[rstest]
    fn instances_are_independent(translator: LiveTranslator) {
        let passthrough = LiveTranslator::new(
            Arc::new(TranslationPipeline::passthrough()),
            &I18nSettings::default(),
        );

        assert_that!(translator.translate(Some("Salvar")), some(eq("Guardar")));
        assert_that!(passthrough.translate(Some("Salvar")), some(eq("Salvar")));
    }

    #[rstest]
    fn chart_translation_delegates_to_pipeline(translator: LiveTranslator) {
        let mut chart = JsonChart::new(json!({"data": {"labels": ["Equipe"]}}));

        let errors = translator.apply_chart_translations(&mut chart, ChartVariant::Standard);

        assert_that!(errors, is_empty());
        assert_eq!(chart.config().pointer("/data/labels/0"), Some(&json!("Equipo")));
    }
}
