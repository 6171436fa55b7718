//! ロケールバンドルの読み込み・キー解決・パラメータ埋め込みと現在言語の管理

/// ロケール関連のエラー型
mod error;
/// `{{name}}` プレースホルダーの置換
mod format;
/// 現在言語とキー翻訳
mod localizer;
/// 言語設定の永続化
mod preference;
/// ドット区切りキーの解決
mod resolve;
/// バンドルの取得元
mod source;
/// バンドルのキャッシュ
mod store;

pub use error::{
    LocaleError,
    PreferenceError,
};
pub use format::{
    Params,
    format,
};
pub use localizer::{
    InitOptions,
    KeyTranslator,
    LanguageChanged,
    Localizer,
};
pub use preference::{
    FilePreferences,
    MemoryPreferences,
    PreferenceStore,
};
pub use resolve::{
    KEY_SEPARATOR,
    resolve,
};
pub use source::{
    FileLocaleSource,
    LocaleSource,
    MemoryLocaleSource,
};
pub use store::LocaleStore;
