//! Handler registration for UI events.
//!
//! Bindings map an element id and an event kind to a page [`Action`].
//! Registering returns a [`Subscription`]; dropping it removes the binding.

use std::sync::{
    Arc,
    Mutex,
    PoisonError,
    Weak,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    /// Value change of a form control.
    Change,
}

/// What the page does in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ConfirmName,
    /// The "No" button.
    Decline,
    /// The "Yes" button.
    Accept,
    SelectLanguage,
}

/// An event raised by the user on a page element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    /// `id` of the element the event targets.
    pub target: String,
    pub kind: EventKind,
    /// New value for change events.
    pub value: Option<String>,
}

impl UiEvent {
    #[must_use]
    pub fn click(target: &str) -> Self {
        Self { target: target.to_string(), kind: EventKind::Click, value: None }
    }

    #[must_use]
    pub fn change(target: &str, value: &str) -> Self {
        Self { target: target.to_string(), kind: EventKind::Change, value: Some(value.to_string()) }
    }
}

#[derive(Debug)]
struct Binding {
    id: u64,
    target: String,
    kind: EventKind,
    action: Action,
}

#[derive(Debug, Default)]
struct Bindings {
    next_id: u64,
    entries: Vec<Binding>,
}

/// Registry of event bindings.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    bindings: Arc<Mutex<Bindings>>,
}

impl EventRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `action` to `kind` events on the element with id `target`.
    #[must_use = "dropping the subscription removes the binding"]
    pub fn listen(&self, target: &str, kind: EventKind, action: Action) -> Subscription {
        let mut bindings = self.bindings.lock().unwrap_or_else(PoisonError::into_inner);
        bindings.next_id += 1;
        let id = bindings.next_id;
        bindings.entries.push(Binding { id, target: target.to_string(), kind, action });
        tracing::debug!(element = target, ?kind, ?action, "Registered event handler");
        Subscription { id, bindings: Arc::downgrade(&self.bindings) }
    }

    /// Actions bound to the event's target and kind, in registration order.
    #[must_use]
    pub fn actions_for(&self, event: &UiEvent) -> Vec<Action> {
        self.bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .filter(|binding| binding.target == event.target && binding.kind == event.kind)
            .map(|binding| binding.action)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a binding alive; dropping it unregisters the binding.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bindings: Weak<Mutex<Bindings>>,
}

impl Subscription {
    /// Removes the binding now.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bindings) = self.bindings.upgrade() {
            bindings
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|binding| binding.id != self.id);
        }
    }
}
