//! 翻訳対象外の判定

use crate::config::I18nSettings;
use crate::dom::{
    Document,
    Element,
    MutationFilter,
    NodeId,
};

/// 翻訳対象外の要素と翻訳対象の属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRules {
    /// この属性を持つ要素のサブツリーは翻訳しない
    skip_attributes: Vec<String>,
    /// このクラスを持つ要素のサブツリーは翻訳しない
    skip_classes: Vec<String>,
    /// このタグのサブツリーは翻訳しない（小文字）
    excluded_tags: Vec<String>,
    /// 訪問した要素ごとに翻訳する属性
    translated_attributes: Vec<String>,
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::from_settings(&I18nSettings::default())
    }
}

impl SkipRules {
    #[must_use]
    pub fn from_settings(settings: &I18nSettings) -> Self {
        Self {
            skip_attributes: settings.skip.attributes.clone(),
            skip_classes: settings.skip.classes.clone(),
            excluded_tags: settings
                .skip
                .excluded_tags
                .iter()
                .map(|tag| tag.trim().to_ascii_lowercase())
                .collect(),
            translated_attributes: settings.translated_attributes.clone(),
        }
    }

    #[must_use]
    pub fn is_excluded_tag(&self, tag: &str) -> bool {
        self.excluded_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// スキップ属性またはスキップクラスを持つか
    #[must_use]
    pub fn has_skip_marker(&self, element: &Element) -> bool {
        self.skip_attributes.iter().any(|a| element.has_attribute(a))
            || self.skip_classes.iter().any(|c| element.has_class(c))
    }

    /// サブツリーごと翻訳対象外の要素か
    #[must_use]
    pub fn excludes(&self, element: &Element) -> bool {
        self.is_excluded_tag(element.tag()) || self.has_skip_marker(element)
    }

    /// ノード自身または祖先が翻訳対象外の要素か
    #[must_use]
    pub fn is_within_skip_zone(&self, doc: &Document, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(doc.ancestors(node))
            .filter_map(|id| doc.element(id).ok())
            .any(|element| self.excludes(element))
    }

    /// 翻訳対象の属性
    #[must_use]
    pub fn translated_attributes(&self) -> &[String] {
        &self.translated_attributes
    }

    #[must_use]
    pub fn is_translated_attribute(&self, name: &str) -> bool {
        self.translated_attributes.iter().any(|a| a == name)
    }

    /// 翻訳対象の属性の変更を記録するフィルタ
    #[must_use]
    pub fn mutation_filter(&self) -> MutationFilter {
        MutationFilter::with_attributes(self.translated_attributes.iter().cloned())
    }
}
