//! Minimal document model the page logic drives.
//!
//! [`Document`] is the seam between the page controller and whatever renders
//! the page. [`HeadlessDocument`] is an in-memory tree used by the terminal
//! driver and by tests.

use std::fmt::Write as _;

/// Handle to an element. Handles are never reused, so a handle to a removed
/// element stays dangling instead of aliasing a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

/// An `<option>` of a select element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Operations the page performs on its document.
///
/// Mutations addressed to a handle that no longer exists are ignored.
pub trait Document {
    fn element_by_id(&self, dom_id: &str) -> Option<ElementId>;
    /// First element, in document order, carrying `class`.
    fn first_by_class(&self, class: &str) -> Option<ElementId>;
    /// Elements carrying a translation key marker, with their key.
    fn translatable_elements(&self) -> Vec<(ElementId, String)>;

    fn text(&self, element: ElementId) -> Option<&str>;
    fn set_text(&mut self, element: ElementId, text: &str);
    fn input_value(&self, element: ElementId) -> Option<&str>;
    fn set_input_value(&mut self, element: ElementId, value: &str);
    fn set_visible(&mut self, element: ElementId, visible: bool);
    fn set_transform(&mut self, element: ElementId, transform: &str);
    fn set_image_source(&mut self, element: ElementId, src: &str);
    fn add_class(&mut self, element: ElementId, class: &str);
    fn append_option(&mut self, element: ElementId, option: SelectOption);
    /// Marks the option with `value` selected and every other one unselected.
    fn select_option(&mut self, element: ElementId, value: &str);

    /// Replaces the whole body with freshly built elements.
    fn replace_body(&mut self, body: Vec<ElementSpec>);
    fn set_scroll_locked(&mut self, locked: bool);
}

/// Description of an element to build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    tag: String,
    dom_id: Option<String>,
    i18n_key: Option<String>,
    text: String,
    classes: Vec<String>,
    hidden: bool,
    src: Option<String>,
    alt: Option<String>,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string(), ..Self::default() }
    }

    #[must_use]
    pub fn id(mut self, dom_id: &str) -> Self {
        self.dom_id = Some(dom_id.to_string());
        self
    }

    /// Adds the translation key marker.
    #[must_use]
    pub fn i18n(mut self, key: &str) -> Self {
        self.i18n_key = Some(key.to_string());
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn image(mut self, src: &str, alt: &str) -> Self {
        self.src = Some(src.to_string());
        self.alt = Some(alt.to_string());
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// One element of a [`HeadlessDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub handle: ElementId,
    pub parent: Option<ElementId>,
    pub tag: String,
    pub dom_id: Option<String>,
    pub i18n_key: Option<String>,
    pub text: String,
    pub value: String,
    pub classes: Vec<String>,
    pub visible: bool,
    pub transform: Option<String>,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub options: Vec<SelectOption>,
}

/// In-memory document.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    /// Elements in document order.
    elements: Vec<Element>,
    next_handle: u64,
    scroll_locked: bool,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new(body: Vec<ElementSpec>) -> Self {
        let mut document = Self::default();
        document.build(body);
        document
    }

    /// The layout of the confession page.
    #[must_use]
    pub fn confession_page() -> Self {
        Self::new(vec![
            ElementSpec::new("select").id("languageSelect"),
            ElementSpec::new("h1").i18n("title").text("A question"),
            ElementSpec::new("div")
                .id("nameInputContainer")
                .hidden()
                .child(ElementSpec::new("label").i18n("namePrompt").text("Your name"))
                .child(ElementSpec::new("input").id("usernameInput"))
                .child(
                    ElementSpec::new("button")
                        .id("confirmNameButton")
                        .i18n("confirmButton")
                        .text("Confirm"),
                ),
            ElementSpec::new("div")
                .id("confessionContainer")
                .hidden()
                .child(
                    ElementSpec::new("img")
                        .id("mainImage")
                        .image("assets/images/hi.webp", "Main"),
                )
                .child(ElementSpec::new("h2").id("question"))
                .child(
                    ElementSpec::new("div")
                        .class("buttons")
                        .child(ElementSpec::new("button").id("yes").i18n("yesButton").text("Yes"))
                        .child(ElementSpec::new("button").id("no").i18n("noButton").text("No")),
                ),
        ])
    }

    #[must_use]
    pub fn element(&self, handle: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.handle == handle)
    }

    /// Looks an element up by its `id` attribute.
    #[must_use]
    pub fn get(&self, dom_id: &str) -> Option<&Element> {
        self.element_by_id(dom_id).and_then(|handle| self.element(handle))
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub const fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Whether the element and all its ancestors are shown.
    #[must_use]
    pub fn is_displayed(&self, handle: ElementId) -> bool {
        let mut current = self.element(handle);
        while let Some(element) = current {
            if !element.visible {
                return false;
            }
            current = element.parent.and_then(|parent| self.element(parent));
        }
        true
    }

    /// Plain-text view of the displayed elements, one per line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            if !self.is_displayed(element.handle) {
                continue;
            }
            let depth = self.depth(element.handle);
            let indent = "  ".repeat(depth);
            let line = match element.tag.as_str() {
                "select" => {
                    let options: Vec<String> = element
                        .options
                        .iter()
                        .map(|option| {
                            if option.selected {
                                format!("[{}]", option.label)
                            } else {
                                option.label.clone()
                            }
                        })
                        .collect();
                    format!("language: {}", options.join(" | "))
                }
                "input" => format!("input: {}", element.value),
                "img" => format!("image: {}", element.src.as_deref().unwrap_or_default()),
                "button" => format!("({}){}", element.text, transform_suffix(element)),
                "div" if element.text.is_empty() => continue,
                _ => format!("{}{}", element.text, transform_suffix(element)),
            };
            let _ = writeln!(out, "{indent}{line}");
        }
        out
    }

    fn depth(&self, handle: ElementId) -> usize {
        let mut depth = 0;
        let mut current = self.element(handle).and_then(|element| element.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.element(parent).and_then(|element| element.parent);
        }
        depth
    }

    fn element_mut(&mut self, handle: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.handle == handle)
    }

    fn build(&mut self, body: Vec<ElementSpec>) {
        for spec in body {
            self.build_element(spec, None);
        }
    }

    fn build_element(&mut self, spec: ElementSpec, parent: Option<ElementId>) {
        let handle = ElementId(self.next_handle);
        self.next_handle += 1;
        self.elements.push(Element {
            handle,
            parent,
            tag: spec.tag,
            dom_id: spec.dom_id,
            i18n_key: spec.i18n_key,
            text: spec.text,
            value: String::new(),
            classes: spec.classes,
            visible: !spec.hidden,
            transform: None,
            src: spec.src,
            alt: spec.alt,
            options: Vec::new(),
        });
        for child in spec.children {
            self.build_element(child, Some(handle));
        }
    }

    fn update(&mut self, handle: ElementId, apply: impl FnOnce(&mut Element)) {
        match self.element_mut(handle) {
            Some(element) => apply(element),
            None => tracing::trace!(?handle, "Ignoring update of a removed element"),
        }
    }
}

fn transform_suffix(element: &Element) -> String {
    element.transform.as_ref().map_or_else(String::new, |transform| format!("  <{transform}>"))
}

impl Document for HeadlessDocument {
    fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|element| element.dom_id.as_deref() == Some(dom_id))
            .map(|element| element.handle)
    }

    fn first_by_class(&self, class: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|element| element.classes.iter().any(|c| c == class))
            .map(|element| element.handle)
    }

    fn translatable_elements(&self) -> Vec<(ElementId, String)> {
        self.elements
            .iter()
            .filter_map(|element| element.i18n_key.clone().map(|key| (element.handle, key)))
            .collect()
    }

    fn text(&self, element: ElementId) -> Option<&str> {
        self.element(element).map(|element| element.text.as_str())
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.update(element, |element| text.clone_into(&mut element.text));
    }

    fn input_value(&self, element: ElementId) -> Option<&str> {
        self.element(element).map(|element| element.value.as_str())
    }

    fn set_input_value(&mut self, element: ElementId, value: &str) {
        self.update(element, |element| value.clone_into(&mut element.value));
    }

    fn set_visible(&mut self, element: ElementId, visible: bool) {
        self.update(element, |element| element.visible = visible);
    }

    fn set_transform(&mut self, element: ElementId, transform: &str) {
        self.update(element, |element| element.transform = Some(transform.to_string()));
    }

    fn set_image_source(&mut self, element: ElementId, src: &str) {
        self.update(element, |element| element.src = Some(src.to_string()));
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.update(element, |element| {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        });
    }

    fn append_option(&mut self, element: ElementId, option: SelectOption) {
        self.update(element, |element| element.options.push(option));
    }

    fn select_option(&mut self, element: ElementId, value: &str) {
        self.update(element, |element| {
            for option in &mut element.options {
                option.selected = option.value == value;
            }
        });
    }

    fn replace_body(&mut self, body: Vec<ElementSpec>) {
        self.elements.clear();
        self.build(body);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn confession_page_has_expected_elements() {
        let document = HeadlessDocument::confession_page();

        for id in [
            "languageSelect",
            "usernameInput",
            "confirmNameButton",
            "question",
            "yes",
            "no",
            "nameInputContainer",
            "confessionContainer",
            "mainImage",
        ] {
            expect_that!(document.element_by_id(id).is_some(), eq(true));
        }
        expect_that!(document.first_by_class("buttons").is_some(), eq(true));
        expect_that!(document.translatable_elements().len(), eq(5));
    }

    #[test]
    fn children_of_hidden_containers_are_not_displayed() {
        let mut document = HeadlessDocument::confession_page();
        let yes = document.element_by_id("yes").unwrap();
        let container = document.element_by_id("confessionContainer").unwrap();

        assert!(!document.is_displayed(yes));
        document.set_visible(container, true);
        assert!(document.is_displayed(yes));
    }

    #[test]
    fn replaced_body_invalidates_old_handles() {
        let mut document = HeadlessDocument::confession_page();
        let old_question = document.element_by_id("question").unwrap();

        document.replace_body(vec![ElementSpec::new("h1").class("yes-text")]);
        document.set_text(old_question, "ignored");

        assert!(document.text(old_question).is_none());
        assert!(document.element_by_id("question").is_none());
        let heading = document.first_by_class("yes-text").unwrap();
        assert_eq!(document.text(heading), Some(""));
    }

    #[test]
    fn select_option_marks_only_the_chosen_value() {
        let mut document = HeadlessDocument::new(vec![ElementSpec::new("select").id("s")]);
        let select = document.element_by_id("s").unwrap();
        for (value, label) in [("en", "English"), ("zh", "中文")] {
            document.append_option(
                select,
                SelectOption { value: value.to_string(), label: label.to_string(), selected: value == "en" },
            );
        }

        document.select_option(select, "zh");

        let selected: Vec<&str> = document
            .element(select)
            .unwrap()
            .options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.value.as_str())
            .collect();
        assert_eq!(selected, vec!["zh"]);
        assert!(document.render_text().contains("English | [中文]"));
    }

    #[test]
    fn add_class_is_idempotent() {
        let mut document = HeadlessDocument::new(vec![ElementSpec::new("div").id("d")]);
        let div = document.element_by_id("d").unwrap();

        document.add_class(div, "fade-in");
        document.add_class(div, "fade-in");

        assert_eq!(document.element(div).unwrap().classes, vec!["fade-in".to_string()]);
    }

    #[test]
    fn render_text_shows_only_displayed_elements() {
        let document = HeadlessDocument::confession_page();

        let text = document.render_text();

        assert!(text.contains("A question"));
        assert!(!text.contains("(Yes)"));
        assert!(!text.contains("(Confirm)"));
    }
}
