//! リソースの取得
//!
//! リソースは `i18n/en.json` のような相対パスで指定する

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use super::error::FetchError;

/// リソースの取得元
pub trait ResourceFetcher: Send + Sync {
    /// `path` の内容を取得する。呼び出しごとに新しく取得する
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// ディスク上のディレクトリからリソースを読む
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub const fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl ResourceFetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full_path = self.root.join(path);
        tracing::debug!(path = %full_path.display(), "Fetching resource");

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound { path: path.to_string() })
            }
            Err(source) => Err(FetchError::Io { path: path.to_string(), source }),
        }
    }
}

/// メモリ上のリソース（組み込み・テスト用）
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    /// パスごとの内容、または失敗時のステータスコード
    resources: HashMap<String, Result<String, u16>>,
}

impl StaticFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `path` で `body` を返す
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    /// `path` の取得を `status` で失敗させる
    #[must_use]
    pub fn with_status(mut self, path: impl Into<String>, status: u16) -> Self {
        self.resources.insert(path.into(), Err(status));
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, body: impl Into<String>) {
        self.resources.insert(path.into(), Ok(body.into()));
    }
}

impl ResourceFetcher for StaticFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        match self.resources.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status { path: path.to_string(), status: *status }),
            None => Err(FetchError::NotFound { path: path.to_string() }),
        }
    }
}
