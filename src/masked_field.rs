//!
//! Session state for one masked input field.
//!
//! [MaskedFieldState] holds everything an edit session needs:
//! the buffer, the selection, focus, the caller visible value,
//! and the link to whoever owns the value.
//!
//! The display reports edits with [MaskedFieldState::apply_edit] or
//! one of the shortcuts. Afterwards it shows [MaskedFieldState::value]
//! and applies the [CursorRequest] from [MaskedFieldState::cursor_request].
//!
//! The visible value is not always the buffer. As long as nothing
//! has been entered and the field doesn't have the focus it's the
//! empty string, not the skeleton of the mask.
//!
//! With an empty mask the field works as plain text input.
//!

use crate::char_class::Translations;
use crate::cursor::{CursorRequest, PendingCursor};
use crate::event::MaskOutcome;
use crate::mask::Mask;
use crate::masked_core::{MaskedCore, mask_op};
use crate::value_link::{ChangeEvent, ValueLink};
use crate::{MaskError, upos_type};
use log::debug;
use std::ops::Range;

/// Edit as reported by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEdit<'a> {
    /// Typed a char.
    Insert(char),
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Pasted some text.
    Paste(&'a str),
    /// The owner of the value changed it.
    /// The selection is ignored for this one.
    ExternalPush(&'a str),
}

/// The edits that work on the selection.
#[derive(Debug, Clone, Copy)]
enum BufferEdit<'a> {
    Insert(char),
    Paste(&'a str),
    Backspace,
    Delete,
}

/// State of a masked field.
#[derive(Debug)]
pub struct MaskedFieldState {
    /// Editing core.
    /// __read only__ use the methods of the state for any edit.
    pub core: MaskedCore,

    /// Id, sent with every change.
    /// __read+write__
    pub id: Option<String>,
    /// Name, sent with every change.
    /// __read+write__
    pub name: Option<String>,

    mask: String,
    translations: Translations,
    format: Option<String>,
    placeholder: Option<String>,

    // caller visible value
    text: String,
    anchor: upos_type,
    cursor: upos_type,
    focused: bool,
    // completion latch
    was_full: bool,

    link: Option<ValueLink>,
    pending: PendingCursor,
}

impl Default for MaskedFieldState {
    fn default() -> Self {
        Self {
            core: Default::default(),
            id: Default::default(),
            name: Default::default(),
            mask: Default::default(),
            translations: Default::default(),
            format: Default::default(),
            placeholder: Default::default(),
            text: Default::default(),
            anchor: Default::default(),
            cursor: Default::default(),
            focused: Default::default(),
            was_full: Default::default(),
            link: Default::default(),
            pending: Default::default(),
        }
    }
}

impl Drop for MaskedFieldState {
    fn drop(&mut self) {
        self.pending.cancel();
    }
}

impl MaskedFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        let mut s = Self::default();
        s.name = Some(name.into());
        s
    }

    /// With an id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With input mask.
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.set_mask(mask);
        self
    }

    /// With translations for the mask chars.
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.set_translations(translations);
        self
    }

    /// With a format for the blank slots.
    ///
    /// Must be set after the mask, the length is checked against it.
    pub fn with_format(mut self, format: impl Into<String>) -> Result<Self, MaskError> {
        self.set_format(format)?;
        Ok(self)
    }

    /// With a placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Bind to an outside value.
    pub fn with_value_link(mut self, link: ValueLink) -> Self {
        self.set_value_link(link);
        self
    }

    /// Set the input mask.
    ///
    /// Starts over with the current value of the owner, or the
    /// current value if there is no link. A format that doesn't
    /// fit the new mask is dropped.
    pub fn set_mask(&mut self, mask: impl Into<String>) {
        self.mask = mask.into();
        let external = self.external_value();
        self.restart(external, false);
    }

    /// Set the translations. Starts over like [Self::set_mask].
    pub fn set_translations(&mut self, translations: Translations) {
        self.translations = translations;
        let external = self.external_value();
        self.restart(external, false);
    }

    /// Set the format for blank slots.
    ///
    /// Either a single char for every slot, or as long as
    /// the mask. Starts over like [Self::set_mask].
    pub fn set_format(&mut self, format: impl Into<String>) -> Result<(), MaskError> {
        let format = format.into();
        Mask::with_format(&self.mask, &self.translations, &format)?;
        self.format = Some(format);
        let external = self.external_value();
        self.restart(external, false);
        Ok(())
    }

    /// Back to the default blank char.
    pub fn clear_format(&mut self) {
        if self.format.take().is_some() {
            let external = self.external_value();
            self.restart(external, false);
        }
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = Some(placeholder.into());
    }

    /// Bind to an outside value.
    ///
    /// Adopts the value of the link. If the masked result differs,
    /// the owner gets a change request with it.
    pub fn set_value_link(&mut self, link: ValueLink) {
        let external = link.value().to_string();
        self.link = Some(link);
        self.restart(external, true);
    }

    /// Remove the link.
    pub fn take_value_link(&mut self) -> Option<ValueLink> {
        self.link.take()
    }

    /// Start a new session with the mask, the translations and
    /// the external value.
    ///
    /// Without translations the current ones are kept, without an
    /// external value the value of the link or the current value
    /// is used.
    ///
    /// If the masked value differs from the external value the owner
    /// gets a change request. Completion is not reported, but a
    /// value that fills the mask counts as completed.
    ///
    /// Returns the buffer and the cursor.
    pub fn initialize(
        &mut self,
        mask: &str,
        translations: Option<Translations>,
        external: Option<&str>,
    ) -> (String, upos_type) {
        self.mask = mask.into();
        if let Some(translations) = translations {
            self.translations = translations;
        }
        let external = match external {
            Some(v) => {
                if let Some(link) = self.link.as_mut() {
                    link.set_value(v);
                }
                v.to_string()
            }
            None => self.external_value(),
        };
        let cursor = self.restart(external, true);
        (self.text(), cursor)
    }

    /// Cancel any pending cursor request.
    ///
    /// Call this when the display goes away before it applied
    /// the last request. Dropping the state does the same.
    pub fn dispose(&mut self) {
        self.pending.cancel();
    }
}

impl MaskedFieldState {
    /// Masking is active. False for an empty mask.
    #[inline]
    pub fn is_masked(&self) -> bool {
        !self.core.is_void()
    }

    /// The mask.
    #[inline]
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// The translations.
    #[inline]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// The format, if any.
    #[inline]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// First slot of the mask.
    #[inline]
    pub fn first_slot(&self) -> Option<upos_type> {
        self.core.mask().first_slot()
    }

    /// Placeholder text. Defaults to the skeleton of the mask.
    pub fn placeholder(&self) -> String {
        match &self.placeholder {
            Some(v) => v.clone(),
            None => self.core.mask().skeleton(),
        }
    }

    /// Buffer as string.
    ///
    /// In plain text mode this is the same as [Self::value].
    pub fn text(&self) -> String {
        if self.is_masked() {
            self.core.text()
        } else {
            self.text.clone()
        }
    }

    /// Value as the caller should see it.
    #[inline]
    pub fn value(&self) -> &str {
        &self.text
    }

    /// Length of the buffer.
    pub fn len(&self) -> upos_type {
        if self.is_masked() {
            self.core.len()
        } else {
            self.text.chars().count() as upos_type
        }
    }

    /// Every slot is filled. Always false in plain text mode.
    pub fn is_full(&self) -> bool {
        self.is_masked() && self.core.is_full()
    }

    /// Nothing entered.
    pub fn is_empty(&self) -> bool {
        if self.is_masked() {
            self.core.is_empty()
        } else {
            self.text.is_empty()
        }
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Cursor position.
    #[inline]
    pub fn cursor(&self) -> upos_type {
        self.cursor
    }

    /// Selection anchor.
    #[inline]
    pub fn anchor(&self) -> upos_type {
        self.anchor
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Selection.
    pub fn selection(&self) -> Range<upos_type> {
        if self.anchor < self.cursor {
            self.anchor..self.cursor
        } else {
            self.cursor..self.anchor
        }
    }

    /// Selection as reported by the display.
    /// Both positions are limited to the buffer.
    pub fn set_selection(&mut self, anchor: upos_type, cursor: upos_type) -> bool {
        let len = self.len();
        let old = (self.anchor, self.cursor);
        self.anchor = anchor.min(len);
        self.cursor = cursor.min(len);
        old != (self.anchor, self.cursor)
    }

    /// Cursor as reported by the display.
    pub fn set_cursor(&mut self, cursor: upos_type) -> bool {
        self.set_selection(cursor, cursor)
    }

    /// Cursor position that has yet to be applied by the display.
    ///
    /// Take it once the display shows the current value.
    pub fn cursor_request(&mut self) -> Option<CursorRequest> {
        self.pending.take()
    }

    /// Position of the cursor request that hasn't been taken yet.
    pub fn pending_cursor(&self) -> Option<upos_type> {
        self.pending.peek()
    }
}

impl MaskedFieldState {
    /// Apply an edit of the display.
    ///
    /// Fails only if the selection is out of bounds. Rejected
    /// chars are dropped and give [MaskOutcome::Unchanged] if
    /// nothing else changes.
    pub fn apply_edit(
        &mut self,
        edit: RawEdit<'_>,
        selection: Range<upos_type>,
    ) -> Result<MaskOutcome, MaskError> {
        let edit = match edit {
            RawEdit::ExternalPush(value) => return Ok(self.set_value(value)),
            RawEdit::Insert(c) => BufferEdit::Insert(c),
            RawEdit::Paste(text) => BufferEdit::Paste(text),
            RawEdit::Backspace => BufferEdit::Backspace,
            RawEdit::Delete => BufferEdit::Delete,
        };

        let len = self.len();
        if selection.start > selection.end || selection.end > len {
            return Err(MaskError::SelectionOutOfBounds(
                selection.start,
                selection.end,
                len,
            ));
        }

        if self.is_masked() {
            self.masked_edit(edit, selection)
        } else {
            Ok(self.plain_edit(edit, selection))
        }
    }

    /// Insert a char at the current selection.
    pub fn insert_char(&mut self, c: char) -> MaskOutcome {
        self.apply_edit(RawEdit::Insert(c), self.selection()).expect("valid_selection")
    }

    /// Paste at the current selection.
    pub fn paste(&mut self, text: &str) -> MaskOutcome {
        self.apply_edit(RawEdit::Paste(text), self.selection()).expect("valid_selection")
    }

    /// Backspace at the current selection.
    pub fn delete_prev_char(&mut self) -> MaskOutcome {
        self.apply_edit(RawEdit::Backspace, self.selection()).expect("valid_selection")
    }

    /// Delete at the current selection.
    pub fn delete_next_char(&mut self) -> MaskOutcome {
        self.apply_edit(RawEdit::Delete, self.selection()).expect("valid_selection")
    }

    /// Push a new value from the owner.
    ///
    /// The value is re-masked and replaces the buffer. If the masked
    /// value differs, the owner gets a change request with it.
    /// The same value the owner already has is never sent back.
    pub fn set_value(&mut self, value: &str) -> MaskOutcome {
        if let Some(link) = self.link.as_mut() {
            link.set_value(value);
        }

        if !self.is_masked() {
            if self.text == value {
                return MaskOutcome::Unchanged;
            }
            debug!("set_value plain {:?}", value);
            self.text = value.to_string();
            let len = self.len();
            self.anchor = len;
            self.cursor = len;
            return MaskOutcome::TextChanged;
        }

        if self.core.text() == value {
            return MaskOutcome::Unchanged;
        }

        let before = self.text.clone();
        let cursor = if self.focused {
            self.selection().start
        } else {
            value.chars().count() as upos_type
        };
        let cursor = self.adopt(value, cursor);
        debug!("set_value {:?} -> {:?} cursor {}", value, self.core.text(), cursor);

        self.anchor = cursor;
        self.cursor = cursor;
        if self.focused {
            self.pending.schedule(cursor);
        }

        let masked = self.masked_value();
        if masked != value {
            request_change(&mut self.link, &self.id, &self.name, &masked);
        }

        if self.check_complete() {
            MaskOutcome::Completed
        } else if self.text != before {
            MaskOutcome::TextChanged
        } else {
            MaskOutcome::Unchanged
        }
    }

    /// Field got the focus.
    ///
    /// Shows the buffer. If nothing has been entered yet, the
    /// cursor goes to the first slot, otherwise it stays where
    /// it was.
    pub fn focus_gained(&mut self) -> MaskOutcome {
        self.focused = true;
        if !self.is_masked() {
            self.pending.schedule(self.cursor);
            return MaskOutcome::Changed;
        }

        self.text = self.core.text();
        if self.core.is_empty() {
            let first = self.first_slot().unwrap_or(0);
            self.anchor = first;
            self.cursor = first;
        }
        debug!("focus_gained cursor {}", self.cursor);
        self.pending.schedule(self.cursor);
        MaskOutcome::Changed
    }

    /// Field lost the focus.
    ///
    /// If nothing has been entered, the value goes back to the
    /// empty string. A pending cursor request is cancelled.
    pub fn focus_lost(&mut self) -> MaskOutcome {
        self.focused = false;
        self.pending.cancel();

        if self.is_masked() && self.core.is_empty() && !self.text.is_empty() {
            debug!("focus_lost clear value");
            self.text.clear();
            request_change(&mut self.link, &self.id, &self.name, "");
            MaskOutcome::TextChanged
        } else {
            MaskOutcome::Changed
        }
    }
}

impl MaskedFieldState {
    fn masked_edit(
        &mut self,
        edit: BufferEdit<'_>,
        selection: Range<upos_type>,
    ) -> Result<MaskOutcome, MaskError> {
        let before = self.core.text();
        let cursor = match edit {
            BufferEdit::Insert(c) => {
                let mut buf = [0u8; 4];
                mask_op::insert_str(&mut self.core, selection, c.encode_utf8(&mut buf))?
            }
            BufferEdit::Paste(text) => mask_op::insert_str(&mut self.core, selection, text)?,
            BufferEdit::Backspace => mask_op::remove_prev(&mut self.core, selection)?,
            BufferEdit::Delete => mask_op::remove_next(&mut self.core, selection)?,
        };

        let text = self.core.text();
        let changed = text != before;
        if changed {
            self.text = text;
        }
        Ok(self.commit(changed, cursor))
    }

    fn plain_edit(&mut self, edit: BufferEdit<'_>, selection: Range<upos_type>) -> MaskOutcome {
        let mut chars = self.text.chars().collect::<Vec<_>>();
        let start = selection.start as usize;
        let end = selection.end as usize;

        let (range, insert) = match edit {
            BufferEdit::Insert(c) => (start..end, vec![c]),
            BufferEdit::Paste(text) => (start..end, text.chars().collect()),
            BufferEdit::Backspace if start == end => (start.saturating_sub(1)..end, Vec::new()),
            BufferEdit::Delete if start == end => (start..(end + 1).min(chars.len()), Vec::new()),
            BufferEdit::Backspace | BufferEdit::Delete => (start..end, Vec::new()),
        };
        let cursor = (range.start + insert.len()) as upos_type;
        chars.splice(range, insert);

        let text = chars.into_iter().collect::<String>();
        let changed = text != self.text;
        self.text = text;
        self.commit(changed, cursor)
    }

    /// Collapse the selection to the new cursor, request
    /// the cursor, and report changes.
    fn commit(&mut self, changed: bool, cursor: upos_type) -> MaskOutcome {
        let moved = self.selection() != (cursor..cursor);
        self.anchor = cursor;
        self.cursor = cursor;
        self.pending.schedule(cursor);

        if changed {
            request_change(&mut self.link, &self.id, &self.name, &self.text);
            if self.is_masked() && self.check_complete() {
                MaskOutcome::Completed
            } else {
                MaskOutcome::TextChanged
            }
        } else if moved {
            MaskOutcome::Changed
        } else {
            MaskOutcome::Unchanged
        }
    }

    /// Completion fires on the transition to full.
    fn check_complete(&mut self) -> bool {
        let full = self.core.is_full();
        let fire = full && !self.was_full;
        self.was_full = full;

        if fire {
            debug!("complete {:?}", self.text);
            if let Some(link) = self.link.as_mut() {
                link.complete(&self.text);
            }
        }
        fire
    }

    /// Start over with a fresh buffer.
    fn restart(&mut self, external: String, mount: bool) -> upos_type {
        let mask = self.compile_mask();
        debug!("restart {:?} with {:?}", mask, external);

        self.pending.cancel();
        self.core.set_mask(mask);

        let cursor = self.adopt(&external, external.chars().count() as upos_type);
        self.anchor = cursor;
        self.cursor = cursor;
        self.was_full = self.core.is_full();

        if mount && self.is_masked() {
            let masked = self.masked_value();
            if masked != external {
                debug!("mount sync {:?}", masked);
                request_change(&mut self.link, &self.id, &self.name, &masked);
            }
        }

        cursor
    }

    fn compile_mask(&mut self) -> Mask {
        if let Some(format) = &self.format {
            match Mask::with_format(&self.mask, &self.translations, format) {
                Ok(mask) => return mask,
                Err(e) => {
                    debug!("drop format {:?}: {}", format, e);
                    self.format = None;
                }
            }
        }
        Mask::compile(&self.mask, &self.translations)
    }

    /// Replace the buffer with the re-masked value.
    /// Sets the visible value and returns the cursor.
    fn adopt(&mut self, value: &str, cursor: upos_type) -> upos_type {
        if !self.is_masked() {
            self.text = value.to_string();
            return cursor.min(self.len());
        }

        let cursor = if value.is_empty() {
            self.core.clear();
            self.first_slot().unwrap_or(0)
        } else {
            mask_op::reconcile(&mut self.core, value, 0, cursor)
        };

        self.text = if self.focused || !self.core.is_empty() {
            self.core.text()
        } else {
            String::new()
        };
        cursor
    }

    /// Value of the link, or the current value.
    fn external_value(&self) -> String {
        match &self.link {
            Some(link) => link.value().to_string(),
            None => self.text.clone(),
        }
    }

    /// Buffer, or the empty string if nothing has been entered.
    fn masked_value(&self) -> String {
        if self.core.is_empty() {
            String::new()
        } else {
            self.core.text()
        }
    }
}

fn request_change(
    link: &mut Option<ValueLink>,
    id: &Option<String>,
    name: &Option<String>,
    value: &str,
) {
    if let Some(link) = link.as_mut() {
        link.request_change(&ChangeEvent {
            id: id.as_deref(),
            name: name.as_deref(),
            value,
        });
    }
}
