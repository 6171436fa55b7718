//! 現在言語とキー翻訳

use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

use tokio::sync::{
    broadcast,
    watch,
};

use super::{
    LocaleError,
    LocaleSource,
    LocaleStore,
    Params,
    PreferenceStore,
    format,
    resolve,
};
use crate::config::I18nSettings;
use crate::declarative::apply_declarative;
use crate::dom::Document;
use crate::sync::SyncReport;

/// 言語変更通知のバッファ長
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// キーから表示文字列を引く
pub trait KeyTranslator {
    /// キーを翻訳する。見つからない場合はキーそのものを返す。
    fn t(&self, key: &str, params: Option<&Params>) -> String;

    /// ドキュメント要素の `lang` 属性に書き込む値
    fn html_lang(&self) -> String;
}

/// 言語変更通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChanged {
    pub lang: String,
}

/// 初期化オプション
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// 設定のデフォルト言語を上書きする
    pub default_lang: Option<String>,
    /// `?lang=xx` を含むクエリ文字列。保存済みの言語より優先され、保存はされない。
    pub query: Option<String>,
}

/// 現在言語の状態とバンドルキャッシュ
///
/// 言語を変更したら必ずドキュメント全体に再適用する（[`Localizer::set_lang`]）。
#[derive(Debug)]
pub struct Localizer<S, P> {
    /// バンドルキャッシュ
    store: LocaleStore<S>,
    /// 言語設定の保存先
    preferences: P,
    /// 設定
    settings: I18nSettings,
    /// 現在言語（最後に読み込みが完了した要求が勝つ）
    current: watch::Sender<String>,
    /// フォールバックと選択言語の読み込みが完了したか
    ready: AtomicBool,
    /// 言語変更通知
    changes: broadcast::Sender<LanguageChanged>,
}

impl<S: LocaleSource, P: PreferenceStore> Localizer<S, P> {
    /// 作成する。現在言語は読み込み完了までフォールバック言語。
    #[must_use]
    pub fn new(source: S, preferences: P, settings: I18nSettings) -> Self {
        let (current, _) = watch::channel(settings.fallback_language.clone());
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            store: LocaleStore::new(source),
            preferences,
            settings,
            current,
            ready: AtomicBool::new(false),
            changes,
        }
    }

    /// バンドルキャッシュ
    #[must_use]
    pub const fn store(&self) -> &LocaleStore<S> {
        &self.store
    }

    /// 言語設定の保存先
    #[must_use]
    pub const fn preferences(&self) -> &P {
        &self.preferences
    }

    /// 現在言語
    #[must_use]
    pub fn current_language(&self) -> String {
        self.current.borrow().clone()
    }

    /// フォールバック言語
    #[must_use]
    pub fn fallback_language(&self) -> &str {
        &self.settings.fallback_language
    }

    /// 初期化が完了したか
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// 対応言語か
    #[must_use]
    pub fn is_supported(&self, lang: &str) -> bool {
        self.settings.supported_languages.iter().any(|l| l == lang)
    }

    /// 言語変更通知を購読する
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.changes.subscribe()
    }

    /// 現在言語を監視する
    #[must_use]
    pub fn watch_language(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// 初期言語を決める（クエリ → 保存済み → デフォルト）
    async fn initial_language(&self, options: &InitOptions) -> String {
        let default = options.default_lang.as_deref().unwrap_or(&self.settings.default_language);
        let requested = match options.query.as_deref().and_then(query_language) {
            Some(lang) => lang,
            None => self
                .preferences
                .get(&self.settings.storage_key)
                .await
                .unwrap_or_else(|| default.to_string()),
        };

        if self.is_supported(&requested) {
            requested
        } else {
            tracing::debug!(lang = %requested, "Unsupported language, using default");
            self.settings.default_language.clone()
        }
    }

    /// フォールバックと初期言語のバンドルを読み込み、ドキュメントに適用する
    ///
    /// 両方の読み込みが成功するまで準備完了にはならない。
    pub async fn init(&self, options: InitOptions, doc: &mut Document) -> Result<String, LocaleError> {
        let lang = self.initial_language(&options).await;
        tracing::debug!(lang = %lang, fallback = %self.settings.fallback_language, "Initializing localizer");

        futures::future::try_join(
            self.store.load(&self.settings.fallback_language),
            self.store.load(&lang),
        )
        .await?;

        self.current.send_replace(lang.clone());
        self.ready.store(true, Ordering::SeqCst);
        tracing::info!(lang = %lang, "Localizer ready");

        let root = doc.document_element();
        apply_declarative(self, doc, root);
        Ok(lang)
    }

    /// 言語を読み込んで現在言語にし、保存して通知する
    ///
    /// 非対応の言語はフォールバック言語に置き換える。
    /// 複数の要求が並行した場合、最後に読み込みが完了したものが現在言語になる。
    /// ドキュメントへの再適用は行わないため、通知は現在言語の更新直後に送られる。
    pub async fn activate(&self, lang: &str) -> Result<String, LocaleError> {
        let lang = self.switch(lang).await?;
        self.notify(&lang);
        Ok(lang)
    }

    /// 言語を切り替えてドキュメント全体にキー翻訳を再適用する
    ///
    /// 変更通知は再適用の完了後に送られる。
    pub async fn set_lang(&self, lang: &str, doc: &mut Document) -> Result<SyncReport, LocaleError> {
        let lang = self.switch(lang).await?;
        let root = doc.document_element();
        let report = apply_declarative(self, doc, root);
        self.notify(&lang);
        Ok(report)
    }

    /// 言語を読み込んで現在言語にし、保存する
    async fn switch(&self, lang: &str) -> Result<String, LocaleError> {
        let lang = if self.is_supported(lang) {
            lang.to_string()
        } else {
            tracing::debug!(lang, "Unsupported language, using fallback");
            self.settings.fallback_language.clone()
        };

        self.store.load(&lang).await?;
        self.current.send_replace(lang.clone());

        if let Err(err) = self.preferences.set(&self.settings.storage_key, &lang).await {
            tracing::warn!(%err, "Failed to persist language preference");
        }

        tracing::debug!(lang = %lang, "Language activated");
        Ok(lang)
    }

    /// 言語変更を通知する
    fn notify(&self, lang: &str) {
        if self.changes.send(LanguageChanged { lang: lang.to_string() }).is_err() {
            tracing::trace!("No language change subscribers");
        }
    }
}

impl<S: LocaleSource, P: PreferenceStore> KeyTranslator for Localizer<S, P> {
    fn t(&self, key: &str, params: Option<&Params>) -> String {
        let current = self.current_language();
        for lang in [current.as_str(), self.settings.fallback_language.as_str()] {
            if let Some(bundle) = self.store.cached(lang)
                && let Some(text) = resolve(&bundle, key)
            {
                return params.map_or_else(|| text.to_string(), |p| format(text, p));
            }
        }

        tracing::debug!(key, "Translation key not found");
        key.to_string()
    }

    fn html_lang(&self) -> String {
        self.settings.html_lang_for(&self.current_language()).to_string()
    }
}

/// クエリ文字列から `lang` パラメータを取り出す（パーセント・`+` デコード済み）
fn query_language(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(name, _)| name == "lang")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
