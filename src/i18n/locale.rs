//! 実行環境のロケール検出と起動時の言語決定

use super::types::LanguageCode;

/// 実行環境のロケールを返す
pub trait LocaleSource: Send + Sync {
    fn locale(&self) -> Option<String>;
}

/// The operating system locale, via `sys-locale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl LocaleSource for SystemLocale {
    fn locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// A fixed locale, or none at all.
#[derive(Debug, Clone, Default)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self(Some(locale.into()))
    }

    #[must_use]
    pub const fn unavailable() -> Self {
        Self(None)
    }
}

impl LocaleSource for FixedLocale {
    fn locale(&self) -> Option<String> {
        self.0.clone()
    }
}

/// 起動時に最初に試す言語を決める
///
/// 優先順位: 実行環境のロケール、保存された設定、`default`
/// 空白のみの値は未設定とみなす
#[must_use]
pub fn resolve_candidate(
    locale: Option<&str>,
    preference: Option<&str>,
    default: &LanguageCode,
) -> LanguageCode {
    /// 空白のみの値を未設定として扱う
    fn non_blank(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    non_blank(locale)
        .or_else(|| non_blank(preference))
        .map_or_else(|| default.clone(), LanguageCode::from)
}
