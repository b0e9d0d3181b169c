//! `{placeholder}` substitution.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

/// Matches `{identifier}` where the identifier is a run of ASCII word
/// characters (`[A-Za-z0-9_]`). Braces around other text are literal.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Replaces every `{key}` in `template` with `data[key]`.
///
/// A placeholder is substituted only when the key is present and its value
/// is a non-empty string; otherwise it becomes the empty string. Values such
/// as `"0"` are kept. Single pass: substituted text is not scanned again, and
/// braces that do not form a placeholder are left as they are.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use confession_page::i18n::render;
///
/// let data = HashMap::from([("username".to_string(), "Sam".to_string())]);
/// assert_eq!(render("Hello {username}!", &data), "Hello Sam!");
/// assert_eq!(render("Hello {username}!", &HashMap::new()), "Hello !");
/// ```
#[must_use]
pub fn render<S: BuildHasher>(template: &str, data: &HashMap<String, String, S>) -> String {
    tracing::debug!("Starting the template replacement operation");
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            let value = data.get(key).filter(|value| !value.is_empty()).map_or("", String::as_str);
            tracing::trace!(key, value, "Replaced template placeholder");
            value.to_string()
        })
        .into_owned()
}

/// Shorthand for the single `{username}` substitution the page performs.
#[must_use]
pub fn render_username(template: &str, username: &str) -> String {
    render(template, &HashMap::from([("username".to_string(), username.to_string())]))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[rstest]
    #[case::present("Hello {username}!", &[("username", "Sam")], "Hello Sam!")]
    #[case::absent("Hello {username}!", &[], "Hello !")]
    #[case::empty_value("Hello {username}!", &[("username", "")], "Hello !")]
    #[case::zero_is_kept("{count} left", &[("count", "0")], "0 left")]
    #[case::repeated("{a}{a}-{b}", &[("a", "x"), ("b", "y")], "xx-y")]
    #[case::no_placeholders("plain text", &[("a", "x")], "plain text")]
    #[case::unicode_around("亲爱的{username}，你愿意吗？", &[("username", "小明")], "亲爱的小明，你愿意吗？")]
    fn substitutes_placeholders(
        #[case] template: &str,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        assert_eq!(render(template, &data(pairs)), expected);
    }

    #[rstest]
    #[case::non_word("{user name}")]
    #[case::empty("{}")]
    #[case::unclosed("{username")]
    #[case::dash("{user-name}")]
    #[case::non_ascii("你好{名前}!")]
    #[case::accented("{usérname}")]
    fn non_placeholder_braces_are_untouched(#[case] template: &str) {
        assert_eq!(render(template, &data(&[("username", "Sam"), ("user", "x")])), template);
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let result = render("{a}", &data(&[("a", "{b}"), ("b", "nope")]));

        assert_eq!(result, "{b}");
    }

    #[test]
    fn doubled_braces_wrap_the_value() {
        let result = render("{{username}}", &data(&[("username", "Sam")]));

        assert_eq!(result, "{Sam}");
    }

    #[test]
    fn render_username_fills_only_username() {
        assert_eq!(render_username("{username} & {other}", "Kim"), "Kim & ");
    }
}
