//! 言語設定の永続化

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{
    Mutex,
    PoisonError,
};

use serde_json::{
    Map,
    Value,
};

use super::PreferenceError;

/// クライアントローカルのキー・値ストア
pub trait PreferenceStore: Send + Sync {
    /// 値を取得する。読み込めない場合は `None`。
    fn get(&self, key: &str) -> impl Future<Output = Option<String>> + Send;

    /// 値を保存する
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), PreferenceError>> + Send;
}

/// メモリ上のストア
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    /// キー → 値
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    /// 初期値を持つストアを作成
    pub fn with_values(values: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON オブジェクトファイルに保存するストア
#[derive(Debug, Clone)]
pub struct FilePreferences {
    /// 保存先ファイル
    path: PathBuf,
}

impl FilePreferences {
    /// ストアを作成
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ファイルを読み込む。存在しない場合は空。
    async fn read(&self) -> Result<Map<String, Value>, PreferenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for FilePreferences {
    async fn get(&self, key: &str) -> Option<String> {
        match self.read().await {
            Ok(values) => values.get(key).and_then(Value::as_str).map(str::to_string),
            Err(err) => {
                tracing::warn!("Failed to read preferences {:?}: {}", self.path, err);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.read().await.unwrap_or_else(|err| {
            tracing::warn!("Replacing unreadable preferences {:?}: {}", self.path, err);
            Map::new()
        });
        values.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&values)?).await?;
        Ok(())
    }
}
