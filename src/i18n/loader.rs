//! 翻訳リソースと言語一覧の取得・パース

use serde_json::{
    Map,
    Value,
};

use super::catalog::LanguageCatalog;
use super::error::{
    FetchError,
    LoadError,
};
use super::fetch::ResourceFetcher;
use super::types::{
    LanguageCode,
    TranslationMapping,
};

/// [`ResourceFetcher`] 経由で翻訳リソースを読み込む
///
/// リトライもキャッシュもしない。呼び出しごとに取得し直す
#[derive(Debug, Clone)]
pub struct Loader<F> {
    fetcher: F,
    translation_dir: String,
    catalog_path: String,
}

impl<F: ResourceFetcher> Loader<F> {
    #[must_use]
    pub fn new(fetcher: F, translation_dir: impl Into<String>, catalog_path: impl Into<String>) -> Self {
        Self { fetcher, translation_dir: translation_dir.into(), catalog_path: catalog_path.into() }
    }

    /// `code` の翻訳リソースのパス
    ///
    /// # Errors
    /// - 空のコード、または翻訳ディレクトリの外を指しうるコード
    pub fn resource_path(&self, code: &LanguageCode) -> Result<String, FetchError> {
        let raw = code.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw.contains("..") {
            return Err(FetchError::InvalidCode(raw.to_string()));
        }
        let dir = self.translation_dir.trim_end_matches('/');
        Ok(format!("{dir}/{raw}.json"))
    }

    /// `code` のマッピングを取得してパースする
    ///
    /// # Errors
    /// - 取得に失敗した
    /// - JSON オブジェクトではない
    pub async fn load(&self, code: &LanguageCode) -> Result<TranslationMapping, LoadError> {
        let path = self
            .resource_path(code)
            .map_err(|source| LoadError::Fetch { resource: code.to_string(), source })?;
        tracing::info!(path = %path, "Trying to load the language file");

        let object = self.fetch_object(code.as_str(), &path).await?;
        let mapping = TranslationMapping::from_json_object(&object);
        tracing::info!(language = %code, keys = mapping.len(), "Successfully loaded language");
        Ok(mapping)
    }

    /// 言語一覧を取得してパースする
    ///
    /// # Errors
    /// - 取得に失敗した
    /// - `{ "label": ... }` エントリのオブジェクトではない
    pub async fn load_catalog(&self) -> Result<LanguageCatalog, LoadError> {
        let object = self.fetch_object(&self.catalog_path, &self.catalog_path).await?;
        let catalog = LanguageCatalog::from_json_object(&object).map_err(|(code, e)| {
            LoadError::InvalidShape {
                resource: self.catalog_path.clone(),
                message: format!("entry '{code}': {e}"),
            }
        })?;
        tracing::info!(languages = catalog.len(), "Successfully retrieved the language list");
        Ok(catalog)
    }

    async fn fetch_object(&self, resource: &str, path: &str) -> Result<Map<String, Value>, LoadError> {
        let body = self.fetcher.fetch(path).await.map_err(|source| {
            tracing::error!(resource, error = %source, "Failed to fetch resource");
            LoadError::Fetch { resource: resource.to_string(), source }
        })?;

        let value: Value = serde_json::from_str(&body).map_err(|source| {
            tracing::error!(resource, error = %source, "Error parsing resource");
            LoadError::Parse { resource: resource.to_string(), source }
        })?;

        match value {
            Value::Object(object) => Ok(object),
            other => {
                tracing::error!(resource, "Resource is not a JSON object");
                Err(LoadError::InvalidShape {
                    resource: resource.to_string(),
                    message: format!("expected an object, found {}", json_kind(&other)),
                })
            }
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::i18n::fetch::StaticFetcher;

    fn loader(fetcher: StaticFetcher) -> Loader<StaticFetcher> {
        Loader::new(fetcher, "i18n", "languages.json")
    }

    #[tokio::test]
    async fn loads_translation_resource() {
        let loader = loader(
            StaticFetcher::new()
                .with("i18n/en.json", r#"{"questionTemplate": "{username}, will you?"}"#),
        );

        let mapping = loader.load(&LanguageCode::from("en")).await.unwrap();

        assert_eq!(mapping.text("questionTemplate"), Some("{username}, will you?"));
    }

    #[tokio::test]
    async fn missing_resource_is_a_fetch_error() {
        let loader = loader(StaticFetcher::new());

        let error = loader.load(&LanguageCode::from("xx")).await.unwrap_err();

        assert!(error.is_fetch_error());
        assert_eq!(error.resource(), "xx");
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let loader = loader(StaticFetcher::new().with_status("i18n/de.json", 404));

        let error = loader.load(&LanguageCode::from("de")).await.unwrap_err();

        assert!(matches!(
            error,
            LoadError::Fetch { source: FetchError::Status { status: 404, .. }, .. }
        ));
    }

    #[rstest]
    #[case::malformed("{ not json")]
    #[case::html("<html>404</html>")]
    #[tokio::test]
    async fn malformed_payload_is_a_parse_error(#[case] body: &str) {
        let loader = loader(StaticFetcher::new().with("i18n/ja.json", body));

        let error = loader.load(&LanguageCode::from("ja")).await.unwrap_err();

        assert!(matches!(error, LoadError::Parse { .. }));
    }

    #[tokio::test]
    async fn non_object_payload_is_rejected() {
        let loader = loader(StaticFetcher::new().with("i18n/ko.json", r#"["a", "b"]"#));

        let error = loader.load(&LanguageCode::from("ko")).await.unwrap_err();

        assert!(error.to_string().contains("expected an object, found an array"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::traversal("../secrets")]
    #[case::nested("en/us")]
    #[case::backslash("en\\us")]
    fn unsafe_codes_have_no_resource_path(#[case] code: &str) {
        let loader = loader(StaticFetcher::new());

        let result = loader.resource_path(&LanguageCode::from(code));

        assert!(matches!(result, Err(FetchError::InvalidCode(_))));
    }

    #[rstest]
    fn trailing_separator_in_directory_is_ignored() {
        let loader = Loader::new(StaticFetcher::new(), "locales/", "languages.json");

        let path = loader.resource_path(&LanguageCode::from("zh-CN")).unwrap();

        assert_eq!(path, "locales/zh-CN.json");
    }

    #[tokio::test]
    async fn loads_catalog() {
        let loader = loader(StaticFetcher::new().with(
            "languages.json",
            r#"{"en": {"label": "English"}, "zh": {"label": "中文"}}"#,
        ));

        let catalog = loader.load_catalog().await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.label("zh"), Some("中文"));
    }

    #[tokio::test]
    async fn catalog_entry_without_label_is_rejected() {
        let loader = loader(StaticFetcher::new().with("languages.json", r#"{"en": {}}"#));

        let error = loader.load_catalog().await.unwrap_err();

        assert!(matches!(error, LoadError::InvalidShape { .. }));
        assert!(error.to_string().contains("entry 'en'"));
    }
}
