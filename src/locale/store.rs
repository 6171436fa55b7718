//! ロケールバンドルのキャッシュ

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use serde_json::Value;
use tokio::sync::OnceCell;

use super::{
    LocaleError,
    LocaleSource,
};

/// 言語ごとのバンドルセル
type BundleCell = Arc<OnceCell<Arc<Value>>>;

/// 言語コードをキーにしたバンドルキャッシュ
///
/// 一度読み込んだバンドルはプロセスの生存期間中キャッシュされる。
/// 同じ言語の同時読み込みは 1 回の取得を共有し、異なる言語は並行して読み込まれる。
/// 読み込みに失敗した場合はキャッシュに残らず、次の要求で再取得する。
#[derive(Debug)]
pub struct LocaleStore<S> {
    /// 取得元
    source: S,
    /// 言語コード → バンドルセル
    cells: Mutex<HashMap<String, BundleCell>>,
}

impl<S: LocaleSource> LocaleStore<S> {
    /// キャッシュを作成
    pub fn new(source: S) -> Self {
        Self { source, cells: Mutex::new(HashMap::new()) }
    }

    /// 取得元
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// セル表を取得
    fn cells(&self) -> MutexGuard<'_, HashMap<String, BundleCell>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 言語のセルを取得（なければ作成）
    fn cell(&self, lang: &str) -> BundleCell {
        Arc::clone(self.cells().entry(lang.to_string()).or_default())
    }

    /// バンドルを読み込む
    ///
    /// キャッシュ済みならそれを返し、読み込み中なら完了を待つ。
    pub async fn load(&self, lang: &str) -> Result<Arc<Value>, LocaleError> {
        let cell = self.cell(lang);
        let bundle = cell.get_or_try_init(|| self.fetch_bundle(lang)).await?;
        Ok(Arc::clone(bundle))
    }

    /// 取得元からバンドルを取得してパースする
    async fn fetch_bundle(&self, lang: &str) -> Result<Arc<Value>, LocaleError> {
        tracing::debug!(lang, "Loading locale bundle");
        let text = self.source.fetch(lang).await.inspect_err(|err| {
            tracing::warn!(lang, %err, "Locale fetch failed");
        })?;

        let bundle: Value = serde_json::from_str(&text)
            .map_err(|source| LocaleError::Parse { lang: lang.to_string(), source })?;
        if !bundle.is_object() {
            return Err(LocaleError::NotAnObject { lang: lang.to_string() });
        }

        tracing::debug!(lang, "Locale bundle loaded");
        Ok(Arc::new(bundle))
    }

    /// キャッシュ済みのバンドル
    #[must_use]
    pub fn cached(&self, lang: &str) -> Option<Arc<Value>> {
        self.cells().get(lang).and_then(|cell| cell.get().cloned())
    }

    /// キャッシュ済みか
    #[must_use]
    pub fn is_loaded(&self, lang: &str) -> bool {
        self.cached(lang).is_some()
    }
}
