use crate::dom::{
    DomError,
    NodeId,
};

/// 1 ノードの処理失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub node: NodeId,
    pub error: DomError,
}

/// 同期処理の結果
///
/// ノード単位の失敗は記録するだけで、処理全体は継続する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// 書き換えたテキストノード数
    pub texts_translated: usize,
    /// 書き換えた属性数
    pub attributes_translated: usize,
    pub failures: Vec<NodeFailure>,
}

impl SyncReport {
    /// 失敗を記録してログに出す
    pub(crate) fn record_failure(&mut self, node: NodeId, error: DomError) {
        tracing::warn!(%node, %error, "Failed to translate node");
        self.failures.push(NodeFailure { node, error });
    }

    /// 別の結果を合算する
    pub fn merge(&mut self, other: Self) {
        self.texts_translated += other.texts_translated;
        self.attributes_translated += other.attributes_translated;
        self.failures.extend(other.failures);
    }

    /// 何も変更していないか
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.texts_translated == 0 && self.attributes_translated == 0
    }

    /// 変更の総数
    #[must_use]
    pub const fn changes(&self) -> usize {
        self.texts_translated + self.attributes_translated
    }
}
