//! ドキュメントモデル
//!
//! 同期処理が操作する、アリーナ方式の要素・テキストノードツリーと変更記録

/// ドキュメントとノード
mod document;
/// DOM 操作のエラー型
mod error;
/// 変更記録
mod mutation;

pub use document::{
    Document,
    Element,
    NodeId,
    NodeKind,
};
pub use error::DomError;
pub use mutation::{
    MutationFilter,
    MutationRecord,
};
