//! 言語セレクター（言語一覧の各エントリを 1 つの選択肢にする）

use super::dom::{
    Document,
    SelectOption,
};
use super::events::{
    Action,
    EventKind,
    EventRegistry,
    Subscription,
};
use crate::i18n::{
    LanguageCatalog,
    LanguageCode,
    LoadError,
    PreferenceStore,
    ResourceFetcher,
    ResourceStore,
    SwitchOutcome,
};

/// Element id of the selector on the confession page.
pub const LANGUAGE_SELECT_ID: &str = "languageSelect";

/// Drives the `<select>` element listing the available languages.
#[derive(Debug, Clone)]
pub struct LanguageSelector {
    element_id: String,
}

impl Default for LanguageSelector {
    fn default() -> Self {
        Self::new(LANGUAGE_SELECT_ID)
    }
}

impl LanguageSelector {
    #[must_use]
    pub fn new(element_id: &str) -> Self {
        Self { element_id: element_id.to_string() }
    }

    #[must_use]
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// 言語一覧の順に選択肢を追加し、`initial` を選択状態にする
    ///
    /// 追加した選択肢の数を返す
    pub fn populate<D: Document + ?Sized>(
        &self,
        document: &mut D,
        catalog: &LanguageCatalog,
        initial: &LanguageCode,
    ) -> usize {
        tracing::info!("Starting to initialize the language selector");
        let Some(select) = document.element_by_id(&self.element_id) else {
            tracing::warn!(element = %self.element_id, "Language selector element not found");
            return 0;
        };

        for (code, entry) in catalog.iter() {
            document.append_option(
                select,
                SelectOption {
                    value: code.to_string(),
                    label: entry.label.clone(),
                    selected: code == initial,
                },
            );
            tracing::debug!(code = %code, label = %entry.label, "Added language option");
        }
        tracing::info!("Language selector initialization completed");
        catalog.len()
    }

    /// `code` を選択状態にする
    pub fn show_selected<D: Document + ?Sized>(&self, document: &mut D, code: &LanguageCode) {
        if let Some(select) = document.element_by_id(&self.element_id) {
            document.select_option(select, code.as_str());
        }
    }

    /// Routes change events of the selector to [`Action::SelectLanguage`].
    #[must_use = "dropping the subscription removes the binding"]
    pub fn bind(&self, registry: &EventRegistry) -> Subscription {
        registry.listen(&self.element_id, EventKind::Change, Action::SelectLanguage)
    }

    /// ユーザーの選択をストアに渡す
    ///
    /// # Errors
    /// - 選択された言語を読み込めなかった
    pub async fn on_change<F: ResourceFetcher, P: PreferenceStore>(
        &self,
        store: &ResourceStore<F, P>,
        code: &str,
    ) -> Result<SwitchOutcome, LoadError> {
        tracing::info!(language = code, "User selected the language");
        store.switch_language(LanguageCode::from(code)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::PageSettings;
    use crate::i18n::MemoryPreferences;
    use crate::page::dom::HeadlessDocument;
    use crate::page::events::UiEvent;
    use crate::test_utils::sample_fetcher;

    fn catalog() -> LanguageCatalog {
        let value = json!({
            "en": { "label": "English" },
            "zh": { "label": "中文" },
            "ja": { "label": "日本語" }
        });
        LanguageCatalog::from_json_object(value.as_object().unwrap()).unwrap()
    }

    #[test]
    fn populate_adds_options_in_catalog_order() {
        let mut document = HeadlessDocument::confession_page();
        let selector = LanguageSelector::default();

        let added = selector.populate(&mut document, &catalog(), &LanguageCode::from("zh"));

        assert_eq!(added, 3);
        let options = &document.get(LANGUAGE_SELECT_ID).unwrap().options;
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        let selected: Vec<&str> =
            options.iter().filter(|o| o.selected).map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["en", "zh", "ja"]);
        assert_eq!(labels, vec!["English", "中文", "日本語"]);
        assert_eq!(selected, vec!["zh"]);
    }

    #[test]
    fn unknown_initial_language_selects_nothing() {
        let mut document = HeadlessDocument::confession_page();

        LanguageSelector::default().populate(&mut document, &catalog(), &LanguageCode::from("en-US"));

        let options = &document.get(LANGUAGE_SELECT_ID).unwrap().options;
        assert!(options.iter().all(|o| !o.selected));
    }

    #[test]
    fn missing_select_element_adds_nothing() {
        let mut document = HeadlessDocument::new(Vec::new());

        let added = LanguageSelector::default().populate(
            &mut document,
            &catalog(),
            &LanguageCode::from("en"),
        );

        assert_eq!(added, 0);
    }

    #[test]
    fn bind_routes_change_events() {
        let registry = EventRegistry::new();
        let _subscription = LanguageSelector::default().bind(&registry);

        let actions = registry.actions_for(&UiEvent::change(LANGUAGE_SELECT_ID, "zh"));

        assert_eq!(actions, vec![Action::SelectLanguage]);
    }

    #[tokio::test]
    async fn on_change_switches_store_language() {
        let store = ResourceStore::from_settings(
            sample_fetcher(),
            MemoryPreferences::new(),
            &PageSettings::default(),
        );

        let outcome = LanguageSelector::default().on_change(&store, "zh").await.unwrap();

        assert!(matches!(outcome, SwitchOutcome::Applied(_)));
        assert_eq!(store.current_language().await.as_str(), "zh");
    }
}
