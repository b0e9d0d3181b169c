//! ローカライズ処理
//!
//! 翻訳の読み込み・フォールバック・テンプレート置換・言語切り替えを扱う
/// Language catalog for the selector
pub mod catalog;
/// Error types
pub mod error;
/// Resource fetching
pub mod fetch;
/// Translation resource loader
pub mod loader;
/// Runtime locale detection
pub mod locale;
/// Persisted language preference
pub mod preference;
/// Current language and translations
pub mod store;
/// Placeholder substitution
pub mod template;
/// Translation data types
pub mod types;

pub use catalog::{
    LanguageCatalog,
    LanguageEntry,
};
pub use error::{
    FetchError,
    LoadError,
    PreferenceError,
};
pub use fetch::{
    FsFetcher,
    ResourceFetcher,
    StaticFetcher,
};
pub use loader::Loader;
pub use locale::{
    FixedLocale,
    LocaleSource,
    SystemLocale,
};
pub use preference::{
    FilePreferences,
    MemoryPreferences,
    PreferenceStore,
};
pub use store::{
    ResourceStore,
    SwitchOutcome,
};
pub use template::{
    render,
    render_username,
};
pub use types::{
    LanguageCode,
    Snapshot,
    TranslationMapping,
    TranslationValue,
};
