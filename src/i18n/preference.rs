//! 言語設定の永続化

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{
    Mutex,
    PoisonError,
};

use super::error::PreferenceError;

/// 再起動後も残る小さな文字列のキーバリューストア
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// - 値を保存できなかった
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// 1 つのファイルに JSON オブジェクトとして保存する
///
/// ファイルがない、または読めない場合は空として扱う
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    /// 読み込み・変更・書き込みを直列化する
    write_lock: Mutex<()>,
}

impl FilePreferences {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read preferences");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed preferences");
            BTreeMap::new()
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut all = self.read_all();
        all.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), key, value, "Saved preference");
        Ok(())
    }
}

/// メモリ上のみで保持する
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `key` に `value` を設定した状態で作成する
    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let preferences = Self::new();
        preferences
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        preferences
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
