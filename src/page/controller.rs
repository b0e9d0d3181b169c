//! ページコントローラー
//!
//! ドキュメントとローカライズ処理をつなぎ、名前入力、質問、回答の流れを進める

use std::sync::Arc;

use super::dom::{
    Document,
    ElementSpec,
};
use super::effects::{
    HUG_IMAGE,
    NoClickEffects,
};
use super::events::{
    Action,
    EventKind,
    EventRegistry,
    Subscription,
    UiEvent,
};
use super::selector::LanguageSelector;
use super::translate::apply_translations;
use crate::config::PageSettings;
use crate::i18n::{
    LoadError,
    LocaleSource,
    PreferenceStore,
    ResourceFetcher,
    ResourceStore,
    Snapshot,
    SwitchOutcome,
    render_username,
};

/// Element ids of the confession page.
pub mod ids {
    pub const USERNAME_INPUT: &str = "usernameInput";
    pub const CONFIRM_BUTTON: &str = "confirmNameButton";
    pub const QUESTION: &str = "question";
    pub const YES_BUTTON: &str = "yes";
    pub const NO_BUTTON: &str = "no";
    pub const NAME_CONTAINER: &str = "nameInputContainer";
    pub const CONFESSION_CONTAINER: &str = "confessionContainer";
    pub const MAIN_IMAGE: &str = "mainImage";
}

/// Translation keys the page reads directly.
pub mod keys {
    pub const QUESTION_TEMPLATE: &str = "questionTemplate";
    pub const LOVE_MESSAGE: &str = "loveMessage";
    pub const NO_TEXTS: &str = "noTexts";
}

/// Where the visitor is in the page flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    NameEntry,
    Question,
    Accepted,
}

/// ドキュメント・リソースストア・イベント登録を保持する
pub struct Page<F, P, L, D> {
    store: Arc<ResourceStore<F, P>>,
    locale: L,
    document: D,
    selector: LanguageSelector,
    registry: EventRegistry,
    subscriptions: Vec<Subscription>,
    stage: Stage,
    no_clicks: u32,
    username_max_chars: usize,
}

impl<F, P, L, D> std::fmt::Debug for Page<F, P, L, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("store", &"<ResourceStore>")
            .field("document", &"<Document>")
            .field("subscriptions", &self.subscriptions.len())
            .field("stage", &self.stage)
            .field("no_clicks", &self.no_clicks)
            .finish_non_exhaustive()
    }
}

impl<F, P, L, D> Page<F, P, L, D>
where
    F: ResourceFetcher,
    P: PreferenceStore,
    L: LocaleSource,
    D: Document,
{
    #[must_use]
    pub fn new(
        store: Arc<ResourceStore<F, P>>,
        locale: L,
        document: D,
        settings: &PageSettings,
    ) -> Self {
        Self {
            store,
            locale,
            document,
            selector: LanguageSelector::default(),
            registry: EventRegistry::new(),
            subscriptions: Vec::new(),
            stage: Stage::NotStarted,
            no_clicks: 0,
            username_max_chars: settings.username_max_chars,
        }
    }

    /// 言語を読み込んでページを翻訳し、セレクターとハンドラーを用意して
    /// 名前入力を表示する
    pub async fn start(&mut self) -> Snapshot {
        tracing::info!("Page loaded, starting initialization");
        let snapshot = self.store.initialize(&self.locale).await;
        apply_translations(&mut self.document, &snapshot.translations);
        tracing::info!("Applied language translations to the page");

        match self.store.load_catalog().await {
            Ok(catalog) => {
                let initial = self.store.candidate_language(&self.locale);
                self.selector.populate(&mut self.document, &catalog, &initial);
            }
            Err(e) => tracing::error!(error = %e, "Failed to load the language list"),
        }

        self.wire();

        if let Some(container) = self.document.element_by_id(ids::NAME_CONTAINER) {
            self.document.set_visible(container, true);
            tracing::info!("Displayed the name input container");
        }
        self.stage = Stage::NameEntry;
        snapshot
    }

    fn wire(&mut self) {
        self.subscriptions.clear();
        let bindings = [
            (ids::CONFIRM_BUTTON, Action::ConfirmName),
            (ids::NO_BUTTON, Action::Decline),
            (ids::YES_BUTTON, Action::Accept),
        ];
        for (target, action) in bindings {
            self.subscriptions.push(self.registry.listen(target, EventKind::Click, action));
        }
        self.subscriptions.push(self.selector.bind(&self.registry));
    }

    /// `event` に登録されたハンドラーを実行する
    ///
    /// # Errors
    /// - 選択された言語を読み込めなかった
    pub async fn dispatch(&mut self, event: &UiEvent) -> Result<(), LoadError> {
        let actions = self.registry.actions_for(event);
        if actions.is_empty() {
            tracing::debug!(target_id = %event.target, kind = ?event.kind, "No handler for event");
        }
        for action in actions {
            match action {
                Action::ConfirmName => self.confirm_name().await,
                Action::Decline => self.decline().await,
                Action::Accept => self.accept().await,
                Action::SelectLanguage => {
                    if let Some(code) = event.value.as_deref() {
                        self.select_language(code).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// 入力されたユーザー名（設定された文字数で切り詰める）
    #[must_use]
    pub fn username(&self) -> String {
        self.document
            .element_by_id(ids::USERNAME_INPUT)
            .and_then(|input| self.document.input_value(input))
            .map(|value| value.chars().take(self.username_max_chars).collect())
            .unwrap_or_default()
    }

    /// 入力された名前宛ての質問を表示する
    pub async fn confirm_name(&mut self) {
        if self.stage != Stage::NameEntry {
            tracing::debug!(stage = ?self.stage, "Ignoring name confirmation");
            return;
        }
        tracing::info!("User clicked the confirm button");
        let username = self.username();
        let translations = self.store.translations().await;
        let template = translations.text(keys::QUESTION_TEMPLATE).unwrap_or_default();

        if let Some(question) = self.document.element_by_id(ids::QUESTION) {
            self.document.set_text(question, &render_username(template, &username));
            tracing::info!(username = %username, "Inserted the username into the question");
        }
        if let Some(container) = self.document.element_by_id(ids::NAME_CONTAINER) {
            self.document.set_visible(container, false);
        }
        if let Some(container) = self.document.element_by_id(ids::CONFESSION_CONTAINER) {
            self.document.set_visible(container, true);
        }
        if let Some(buttons) = self.document.first_by_class("buttons") {
            self.document.add_class(buttons, "slide-up-fade-in");
        }
        self.stage = Stage::Question;
    }

    /// 「いいえ」: Yes ボタンが大きくなり、No ボタンが逃げ、画像が反応する
    pub async fn decline(&mut self) {
        if self.stage != Stage::Question {
            tracing::debug!(stage = ?self.stage, "Ignoring No click");
            return;
        }
        self.no_clicks = self.no_clicks.saturating_add(1);
        tracing::info!(click_count = self.no_clicks, "User clicked the No button");

        let translations = self.store.translations().await;
        let effects = NoClickEffects::for_click(self.no_clicks, translations.variants(keys::NO_TEXTS));

        if let Some(yes) = self.document.element_by_id(ids::YES_BUTTON) {
            self.document.set_transform(yes, &effects.yes_transform);
        }
        if let Some(no) = self.document.element_by_id(ids::NO_BUTTON) {
            self.document.set_transform(no, &effects.no_transform);
            if let Some(label) = &effects.no_label {
                self.document.set_text(no, label);
                tracing::info!(label = %label, "Updated the text of the No button");
            }
        }
        for id in [ids::MAIN_IMAGE, ids::QUESTION] {
            if let Some(element) = self.document.element_by_id(id) {
                self.document.set_transform(element, &effects.lift_transform);
            }
        }
        if let Some(image) = self.document.element_by_id(ids::MAIN_IMAGE) {
            self.document.set_image_source(image, effects.image);
            tracing::info!(image = effects.image, "Updated the main image");
        }
    }

    /// 「はい」: ページを成功画面に置き換える
    pub async fn accept(&mut self) {
        if self.stage != Stage::Question {
            tracing::debug!(stage = ?self.stage, "Ignoring Yes click");
            return;
        }
        tracing::info!("User clicked the Yes button");
        let username = self.username();
        let translations = self.store.translations().await;
        let message = render_username(
            translations.text(keys::LOVE_MESSAGE).unwrap_or_default(),
            &username,
        );

        self.document.replace_body(vec![
            ElementSpec::new("div")
                .class("yes-screen")
                .child(ElementSpec::new("h1").class("yes-text"))
                .child(ElementSpec::new("img").class("yes-image").image(HUG_IMAGE, "Hug")),
        ]);
        if let Some(heading) = self.document.first_by_class("yes-text") {
            self.document.set_text(heading, &message);
        }
        self.document.set_scroll_locked(true);
        if let Some(screen) = self.document.first_by_class("yes-screen") {
            self.document.add_class(screen, "fade-in");
        }
        tracing::info!("Replaced the page content with the success screen");

        // ボタンごとハンドラーも不要になる
        self.subscriptions.clear();
        self.stage = Stage::Accepted;
    }

    /// 言語を切り替えてページを再翻訳する
    ///
    /// # Errors
    /// - 言語を読み込めなかった（ページの表示は変わらない）
    pub async fn select_language(&mut self, code: &str) -> Result<SwitchOutcome, LoadError> {
        let outcome = self.selector.on_change(self.store.as_ref(), code).await?;
        match &outcome {
            SwitchOutcome::Applied(snapshot) => {
                apply_translations(&mut self.document, &snapshot.translations);
                self.selector.show_selected(&mut self.document, &snapshot.language);
            }
            SwitchOutcome::Superseded => {
                tracing::debug!(language = code, "Language switch superseded by a later one");
            }
        }
        Ok(outcome)
    }

    /// すべてのハンドラーを解除する
    pub fn detach(&mut self) {
        self.subscriptions.clear();
    }

    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    pub const fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<ResourceStore<F, P>> {
        &self.store
    }

    #[must_use]
    pub const fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn no_clicks(&self) -> u32 {
        self.no_clicks
    }
}
