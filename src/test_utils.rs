//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
};

use tokio::sync::Semaphore;

use crate::i18n::error::FetchError;
use crate::i18n::fetch::{
    ResourceFetcher,
    StaticFetcher,
};

/// Default storage key of the language preference.
pub(crate) const PREFERENCE_KEY: &str = "userLangPreference";

pub(crate) const EN_JSON: &str = r#"{
    "title": "A question",
    "confirmButton": "Confirm",
    "yesButton": "Yes",
    "noButton": "No",
    "questionTemplate": "{username}, will you be my valentine?",
    "loveMessage": "I knew it, {username}! ❤",
    "noTexts": ["Are you sure?", "Think again!", "Last chance!", "Pretty please?", "I'll be sad..."]
}"#;

pub(crate) const ZH_JSON: &str = r#"{
    "title": "一个问题",
    "confirmButton": "确认",
    "yesButton": "愿意",
    "noButton": "不要",
    "questionTemplate": "{username}，你愿意做我的恋人吗？",
    "loveMessage": "我就知道，{username}！❤",
    "noTexts": ["你确定吗？", "再想想！"]
}"#;

pub(crate) const LANGUAGES_JSON: &str = r#"{
    "en": { "label": "English" },
    "zh": { "label": "中文" }
}"#;

/// `en`, `zh`, a malformed `broken` resource and the catalog.
pub(crate) fn sample_fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with("i18n/en.json", EN_JSON)
        .with("i18n/zh.json", ZH_JSON)
        .with("i18n/broken.json", "{ \"title\": ")
        .with("languages.json", LANGUAGES_JSON)
}

/// Gate for one path: fetches announce themselves and then wait to be opened.
#[derive(Debug)]
struct Gate {
    requested: Semaphore,
    open: Semaphore,
}

/// Wraps a fetcher so tests decide when individual fetches complete.
#[derive(Debug, Clone)]
pub(crate) struct GatedFetcher {
    inner: StaticFetcher,
    gates: Arc<Mutex<HashMap<String, Arc<Gate>>>>,
}

impl GatedFetcher {
    pub(crate) fn new(inner: StaticFetcher) -> Self {
        Self { inner, gates: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Holds fetches of `path` until [`Self::open`] is called.
    pub(crate) fn gated(self, path: &str) -> Self {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner).insert(
            path.to_string(),
            Arc::new(Gate { requested: Semaphore::new(0), open: Semaphore::new(0) }),
        );
        self
    }

    fn gate(&self, path: &str) -> Option<Arc<Gate>> {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner).get(path).cloned()
    }

    /// Waits until a fetch of `path` has started.
    #[allow(clippy::unwrap_used)]
    pub(crate) async fn requested(&self, path: &str) {
        let gate = self.gate(path).unwrap();
        gate.requested.acquire().await.unwrap().forget();
    }

    /// Lets one pending fetch of `path` complete.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn open(&self, path: &str) {
        self.gate(path).unwrap().open.add_permits(1);
    }
}

impl ResourceFetcher for GatedFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        if let Some(gate) = self.gate(path) {
            gate.requested.add_permits(1);
            if let Ok(permit) = gate.open.acquire().await {
                permit.forget();
            }
        }
        self.inner.fetch(path).await
    }
}
