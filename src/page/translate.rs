//! Writing translations into marked elements.

use super::dom::Document;
use crate::i18n::TranslationMapping;

/// Sets the text of every element carrying a translation key marker.
///
/// Elements whose key is missing, maps to a sequence, or maps to an empty
/// string keep their current text. Unmarked elements are never touched.
/// Returns the number of elements updated.
pub fn apply_translations<D: Document + ?Sized>(
    document: &mut D,
    translations: &TranslationMapping,
) -> usize {
    tracing::info!("Starting to apply language translations to page elements");
    let mut applied = 0;
    for (element, key) in document.translatable_elements() {
        match translations.text(&key) {
            Some(text) if !text.is_empty() => {
                document.set_text(element, text);
                applied += 1;
                tracing::debug!(key = %key, "Applied translation to element");
            }
            _ => tracing::debug!(key = %key, "No text translation for element, leaving it unchanged"),
        }
    }
    applied
}
