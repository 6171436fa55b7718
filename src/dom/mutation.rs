//! 変更記録

use super::NodeId;

/// ドキュメントの変更 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// 子ノードの追加
    ChildList { target: NodeId, added: Vec<NodeId> },
    /// テキストノードの内容変更
    CharacterData { target: NodeId },
    /// 監視対象属性の変更
    Attributes { target: NodeId, name: String },
}

/// 記録する変更の範囲
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationFilter {
    /// 変更を記録する属性名
    pub attributes: Vec<String>,
}

impl MutationFilter {
    /// 指定した属性の変更を記録するフィルタ
    #[must_use]
    pub fn with_attributes(attributes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { attributes: attributes.into_iter().map(Into::into).collect() }
    }

    /// 属性の変更を記録するか
    #[must_use]
    pub fn watches_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}
