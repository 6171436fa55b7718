//! ロケールバンドルの取得元

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use super::LocaleError;

/// 言語コードからバンドルの JSON テキストを取得する
pub trait LocaleSource: Send + Sync {
    /// バンドルを取得する
    fn fetch(&self, lang: &str) -> impl Future<Output = Result<String, LocaleError>> + Send;
}

/// `<dir>/<lang>.json` を読み込む取得元
#[derive(Debug, Clone)]
pub struct FileLocaleSource {
    /// ロケールファイルのディレクトリ
    dir: PathBuf,
}

impl FileLocaleSource {
    /// 取得元を作成
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 言語のファイルパス
    #[must_use]
    pub fn path_for(&self, lang: &str) -> PathBuf {
        self.dir.join(format!("{lang}.json"))
    }
}

impl LocaleSource for FileLocaleSource {
    async fn fetch(&self, lang: &str) -> Result<String, LocaleError> {
        let path = self.path_for(lang);
        tracing::debug!("Fetching locale from: {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LocaleError::Fetch { lang: lang.to_string(), source })
    }
}

/// メモリ上の JSON テキストを返す取得元
///
/// 取得回数を数える。
#[derive(Debug, Default)]
pub struct MemoryLocaleSource {
    /// 言語コード → JSON テキスト
    documents: HashMap<String, String>,
    /// `fetch` の呼び出し回数
    fetches: AtomicUsize,
}

impl MemoryLocaleSource {
    /// 取得元を作成
    pub fn new(documents: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            documents: documents.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// `fetch` の呼び出し回数
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl LocaleSource for MemoryLocaleSource {
    async fn fetch(&self, lang: &str) -> Result<String, LocaleError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Suspend once so concurrent loads overlap like a real fetch.
        tokio::task::yield_now().await;
        self.documents
            .get(lang)
            .cloned()
            .ok_or_else(|| LocaleError::NotFound { lang: lang.to_string() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn file_source_reads_language_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("es.json"), r#"{"a": "b"}"#).unwrap();
        let source = FileLocaleSource::new(temp_dir.path());

        let content = source.fetch("es").await.unwrap();

        assert_that!(content, eq(r#"{"a": "b"}"#));
    }

    #[tokio::test]
    async fn file_source_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileLocaleSource::new(temp_dir.path());

        let result = source.fetch("pt").await;

        assert!(matches!(result, Err(LocaleError::Fetch { lang, .. }) if lang == "pt"));
    }

    #[tokio::test]
    async fn memory_source_counts_fetches() {
        let source = MemoryLocaleSource::new([("pt", "{}")]);

        let _ = source.fetch("pt").await;
        let missing = source.fetch("es").await;

        assert!(matches!(missing, Err(LocaleError::NotFound { .. })));
        assert_that!(source.fetch_count(), eq(2));
    }
}
