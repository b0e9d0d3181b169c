//! The confession page on top of the localization core.
/// Page controller
pub mod controller;
/// Document model
pub mod dom;
/// "No" button escalation
pub mod effects;
/// Event handler registration
pub mod events;
/// Language selector
pub mod selector;
/// Applying translations to marked elements
pub mod translate;

pub use controller::{
    Page,
    Stage,
};
pub use dom::{
    Document,
    ElementId,
    ElementSpec,
    HeadlessDocument,
    SelectOption,
};
pub use events::{
    Action,
    EventKind,
    EventRegistry,
    Subscription,
    UiEvent,
};
pub use selector::LanguageSelector;
pub use translate::apply_translations;
