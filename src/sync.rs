//! ドキュメント同期
//!
//! テキストノードと監視対象属性をパイプラインで翻訳し、変更記録に追従して翻訳状態を保つ。

/// 変更記録への追従
mod observer;
/// 同期結果
mod report;
/// 翻訳対象外の判定
mod skip;
/// サブツリーの走査
mod walker;

pub use observer::{
    MAX_PUMP_ROUNDS,
    Observer,
};
pub use report::{
    NodeFailure,
    SyncReport,
};
pub use skip::SkipRules;
pub use walker::{
    translate_attributes,
    translate_subtree,
    translate_text_node,
};
