//!
//! Binds a field to a value owned by someone else.
//!
//! The owner keeps the value, the field asks for changes
//! with `on_request_change`. New values from the owner are
//! pushed in with [MaskedFieldState::set_value](crate::masked_field::MaskedFieldState::set_value).
//!

use std::fmt::{Debug, Formatter};

/// Change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent<'a> {
    /// Field id, if any.
    pub id: Option<&'a str>,
    /// Field name, if any.
    pub name: Option<&'a str>,
    /// New value.
    pub value: &'a str,
}

/// Current value and change callbacks.
pub struct ValueLink {
    value: String,
    on_request_change: Box<dyn FnMut(&ChangeEvent<'_>)>,
    on_complete: Option<Box<dyn FnMut(&str)>>,
}

impl Debug for ValueLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueLink")
            .field("value", &self.value)
            .field("on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}

impl ValueLink {
    /// New link with the current value of the owner.
    pub fn new(
        value: impl Into<String>,
        on_request_change: impl FnMut(&ChangeEvent<'_>) + 'static,
    ) -> Self {
        Self {
            value: value.into(),
            on_request_change: Box::new(on_request_change),
            on_complete: None,
        }
    }

    /// Called once every time the mask becomes full.
    pub fn on_complete(mut self, on_complete: impl FnMut(&str) + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Last known value of the owner.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Owner pushed a new value.
    pub(crate) fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value.clear();
            self.value.push_str(value);
        }
    }

    /// Ask the owner to take the new value.
    ///
    /// The owner is expected to accept it, so it becomes the
    /// last known value too.
    pub(crate) fn request_change(&mut self, event: &ChangeEvent<'_>) {
        self.set_value(event.value);
        (self.on_request_change)(event);
    }

    pub(crate) fn complete(&mut self, value: &str) {
        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete(value);
        }
    }
}
