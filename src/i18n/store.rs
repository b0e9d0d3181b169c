//! 現在の言語と翻訳データを保持するストア

use std::sync::Arc;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use tokio::sync::RwLock;

use super::catalog::LanguageCatalog;
use super::error::LoadError;
use super::fetch::ResourceFetcher;
use super::loader::Loader;
use super::locale::{
    LocaleSource,
    resolve_candidate,
};
use super::preference::PreferenceStore;
use super::types::{
    LanguageCode,
    Snapshot,
    TranslationMapping,
};
use crate::config::PageSettings;

/// 読み込みに成功した言語切り替えの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// 新しい言語が現在の言語になった
    Applied(Snapshot),
    /// 読み込み中に後続のリクエストが発行されたため、結果を破棄した
    Superseded,
}

/// 現在の言語と翻訳マッピングを保持する
///
/// 読み込みごとに単調増加のリクエストトークンを発行する。状態を置き換えられる
/// のは最後に発行されたリクエストの結果だけなので、切り替えが重なっても
/// 取得の完了順に関係なく最後に選ばれた言語が残る。
pub struct ResourceStore<F, P> {
    loader: Loader<F>,
    preferences: P,
    preference_key: String,
    default_language: LanguageCode,
    state: RwLock<Snapshot>,
    latest_request: AtomicU64,
}

impl<F, P> std::fmt::Debug for ResourceStore<F, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("preference_key", &self.preference_key)
            .field("default_language", &self.default_language)
            .field("latest_request", &self.latest_request)
            .finish_non_exhaustive()
    }
}

impl<F: ResourceFetcher, P: PreferenceStore> ResourceStore<F, P> {
    /// 空のストアを作成する。読み込みが成功するまでは `default_language` が現在の言語
    #[must_use]
    pub fn new(
        loader: Loader<F>,
        preferences: P,
        preference_key: impl Into<String>,
        default_language: LanguageCode,
    ) -> Self {
        let state = Snapshot {
            language: default_language.clone(),
            translations: Arc::new(TranslationMapping::new()),
        };
        Self {
            loader,
            preferences,
            preference_key: preference_key.into(),
            default_language,
            state: RwLock::new(state),
            latest_request: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn from_settings(fetcher: F, preferences: P, settings: &PageSettings) -> Self {
        let loader =
            Loader::new(fetcher, settings.translation_dir.as_str(), settings.catalog_path.as_str());
        Self::new(
            loader,
            preferences,
            settings.preference_key.as_str(),
            LanguageCode::new(settings.default_language.as_str()),
        )
    }

    /// 起動時に最初に試す言語
    ///
    /// 実行環境のロケール、保存された設定、デフォルト言語の順に決める
    pub fn candidate_language(&self, locale: &impl LocaleSource) -> LanguageCode {
        let detected = locale.locale();
        tracing::info!(locale = ?detected, "Detected runtime language");
        let preference = self.preferences.get(&self.preference_key);
        resolve_candidate(detected.as_deref(), preference.as_deref(), &self.default_language)
    }

    /// 起動時の言語を読み込む。失敗した場合はデフォルト言語にフォールバックする
    ///
    /// 失敗を返すことはない。デフォルト言語も読み込めない場合は、デフォルト言語の
    /// 空のマッピングを保持する
    pub async fn initialize(&self, locale: &impl LocaleSource) -> Snapshot {
        tracing::info!("Starting to initialize the language environment");
        let token = self.issue_request();
        let candidate = self.candidate_language(locale);
        tracing::info!(language = %candidate, "Final language to be used");

        let (language, mapping) = match self.loader.load(&candidate).await {
            Ok(mapping) => (candidate, mapping),
            Err(e) => {
                tracing::warn!(
                    language = %candidate,
                    fallback = %self.default_language,
                    error = %e,
                    "Failed to load the language file, loading the default language"
                );
                match self.loader.load(&self.default_language).await {
                    Ok(mapping) => (self.default_language.clone(), mapping),
                    Err(e) => {
                        tracing::error!(
                            language = %self.default_language,
                            error = %e,
                            "Failed to load the default language, continuing without translations"
                        );
                        (self.default_language.clone(), TranslationMapping::new())
                    }
                }
            }
        };

        match self.install(token, language, mapping).await {
            Some(snapshot) => snapshot,
            None => self.snapshot().await,
        }
    }

    /// ユーザーの操作で `code` に切り替える
    ///
    /// 選択は読み込み前に保存する。現在の状態を置き換えるのは、読み込みに成功し
    /// かつ後続のリクエストが発行されていない場合のみ
    ///
    /// # Errors
    /// - `code` のリソースを読み込めなかった（以前の言語のまま）
    pub async fn switch_language(&self, code: LanguageCode) -> Result<SwitchOutcome, LoadError> {
        tracing::info!(language = %code, "Starting to switch the language");
        let token = self.issue_request();

        if let Err(e) = self.preferences.set(&self.preference_key, code.as_str()) {
            tracing::warn!(language = %code, error = %e, "Failed to persist language preference");
        }

        let mapping = self.loader.load(&code).await.inspect_err(|e| {
            tracing::error!(language = %code, error = %e, "Failed to switch language");
        })?;

        Ok(match self.install(token, code, mapping).await {
            Some(snapshot) => {
                tracing::info!(language = %snapshot.language, "Successfully switched the language");
                SwitchOutcome::Applied(snapshot)
            }
            None => SwitchOutcome::Superseded,
        })
    }

    /// セレクターに表示する言語一覧を読み込む
    ///
    /// # Errors
    /// - 取得またはパースに失敗した
    pub async fn load_catalog(&self) -> Result<LanguageCatalog, LoadError> {
        self.loader.load_catalog().await
    }

    /// 現在の言語とマッピングをまとめて取得
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub async fn current_language(&self) -> LanguageCode {
        self.state.read().await.language.clone()
    }

    pub async fn translations(&self) -> Arc<TranslationMapping> {
        Arc::clone(&self.state.read().await.translations)
    }

    #[must_use]
    pub const fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    /// 保存されている言語設定
    pub fn preference(&self) -> Option<String> {
        self.preferences.get(&self.preference_key)
    }

    fn issue_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// `token` が最新のリクエストであれば状態を置き換える
    async fn install(
        &self,
        token: u64,
        language: LanguageCode,
        mapping: TranslationMapping,
    ) -> Option<Snapshot> {
        let mut state = self.state.write().await;
        let latest = self.latest_request.load(Ordering::SeqCst);
        if token != latest {
            tracing::debug!(
                language = %language,
                token,
                latest,
                "Discarding translations from a superseded request"
            );
            return None;
        }
        let snapshot = Snapshot { language, translations: Arc::new(mapping) };
        *state = snapshot.clone();
        Some(snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::i18n::fetch::StaticFetcher;
    use crate::i18n::locale::FixedLocale;
    use crate::i18n::preference::MemoryPreferences;
    use crate::test_utils::{
        GatedFetcher,
        PREFERENCE_KEY,
        sample_fetcher,
    };

    fn store_with<F: ResourceFetcher>(
        fetcher: F,
        preferences: MemoryPreferences,
    ) -> ResourceStore<F, MemoryPreferences> {
        ResourceStore::from_settings(fetcher, preferences, &PageSettings::default())
    }

    #[tokio::test]
    async fn new_store_is_empty_with_default_language() {
        let store = store_with(StaticFetcher::new(), MemoryPreferences::new());

        let snapshot = store.snapshot().await;

        assert_eq!(snapshot.language.as_str(), "en");
        assert!(snapshot.translations.is_empty());
        assert_eq!(store.default_language().as_str(), "en");
    }

    #[tokio::test]
    async fn initialize_loads_detected_locale() {
        let store = store_with(sample_fetcher(), MemoryPreferences::new());

        let snapshot = store.initialize(&FixedLocale::new("zh")).await;

        assert_eq!(snapshot.language.as_str(), "zh");
        assert_eq!(snapshot.translations.text("title"), Some("一个问题"));
        assert_eq!(store.current_language().await.as_str(), "zh");
    }

    #[rstest]
    #[case::missing_resource("xx")]
    #[case::malformed_resource("broken")]
    #[tokio::test]
    async fn initialize_falls_back_to_default(#[case] locale: &str) {
        let store = store_with(sample_fetcher(), MemoryPreferences::new());

        let snapshot = store.initialize(&FixedLocale::new(locale)).await;

        assert_eq!(snapshot.language.as_str(), "en");
        assert_eq!(snapshot.translations.text("title"), Some("A question"));
    }

    #[tokio::test]
    async fn initialize_uses_preference_without_locale() {
        let store = store_with(
            sample_fetcher(),
            MemoryPreferences::with(PREFERENCE_KEY, "zh"),
        );

        let snapshot = store.initialize(&FixedLocale::unavailable()).await;

        assert_eq!(snapshot.language.as_str(), "zh");
    }

    #[tokio::test]
    async fn initialize_without_any_resource_leaves_store_empty() {
        let store = store_with(StaticFetcher::new(), MemoryPreferences::new());

        let snapshot = store.initialize(&FixedLocale::new("fr")).await;

        assert_eq!(snapshot.language.as_str(), "en");
        assert!(snapshot.translations.is_empty());
    }

    #[tokio::test]
    async fn switch_language_replaces_mapping_and_persists_choice() {
        let store = store_with(sample_fetcher(), MemoryPreferences::new());
        store.initialize(&FixedLocale::new("en")).await;

        let outcome = store.switch_language(LanguageCode::from("zh")).await.unwrap();

        let SwitchOutcome::Applied(snapshot) = outcome else {
            panic!("switch should apply");
        };
        assert_eq!(snapshot.language.as_str(), "zh");
        assert_eq!(store.translations().await.text("title"), Some("一个问题"));
        assert_eq!(store.preference().as_deref(), Some("zh"));
    }

    #[tokio::test]
    async fn failed_switch_keeps_previous_mapping() {
        let store = store_with(sample_fetcher(), MemoryPreferences::new());
        let before = store.initialize(&FixedLocale::new("en")).await;

        let result = store.switch_language(LanguageCode::from("xx")).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().resource(), "xx");
        let after = store.snapshot().await;
        assert_eq!(after, before);
        assert!(Arc::ptr_eq(&after.translations, &before.translations));
    }

    #[tokio::test]
    async fn failed_switch_does_not_fall_back_to_default() {
        let store = store_with(sample_fetcher(), MemoryPreferences::new());
        store.initialize(&FixedLocale::new("zh")).await;

        let result = store.switch_language(LanguageCode::from("broken")).await;

        assert!(matches!(result, Err(LoadError::Parse { .. })));
        assert_eq!(store.current_language().await.as_str(), "zh");
    }

    #[tokio::test]
    async fn last_requested_language_wins_when_fetches_resolve_out_of_order() {
        let fetcher = GatedFetcher::new(sample_fetcher())
            .gated("i18n/en.json")
            .gated("i18n/zh.json");
        let store = Arc::new(store_with(fetcher.clone(), MemoryPreferences::new()));

        let first = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.switch_language(LanguageCode::from("en")).await })
        };
        fetcher.requested("i18n/en.json").await;
        let second = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.switch_language(LanguageCode::from("zh")).await })
        };
        fetcher.requested("i18n/zh.json").await;

        // 後のリクエストを先に完了させ、その後に前のリクエストを完了させる
        fetcher.open("i18n/zh.json");
        let second = second.await.unwrap().unwrap();
        fetcher.open("i18n/en.json");
        let first = first.await.unwrap().unwrap();

        assert!(matches!(second, SwitchOutcome::Applied(_)));
        assert_eq!(first, SwitchOutcome::Superseded);
        assert_eq!(store.current_language().await.as_str(), "zh");
        assert_eq!(store.preference().as_deref(), Some("zh"));
    }

    #[tokio::test]
    async fn initialize_does_not_override_a_later_switch() {
        let fetcher = GatedFetcher::new(sample_fetcher()).gated("i18n/en.json");
        let store = Arc::new(store_with(fetcher.clone(), MemoryPreferences::new()));

        let init = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.initialize(&FixedLocale::new("en")).await })
        };
        fetcher.requested("i18n/en.json").await;
        let switched = store.switch_language(LanguageCode::from("zh")).await.unwrap();
        fetcher.open("i18n/en.json");
        let init = init.await.unwrap();

        assert!(matches!(switched, SwitchOutcome::Applied(_)));
        assert_eq!(init.language.as_str(), "zh");
    }

    #[tokio::test]
    async fn load_catalog_delegates_to_loader() {
        let store = store_with(sample_fetcher(), MemoryPreferences::new());

        let catalog = store.load_catalog().await.unwrap();

        assert_eq!(catalog.label("zh"), Some("中文"));
    }
}
