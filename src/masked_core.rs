//!
//! Mask and buffer.
//!
//! The buffer holds one char per mask position. Literal positions
//! always hold the literal, slots hold either their blank char or
//! an accepted char.
//!
//! The edit operations live in [mask_op] as freestanding functions.
//!

use crate::char_class::Translations;
use crate::mask::Mask;
use crate::{MaskError, upos_type};
use std::ops::Range;

pub mod mask_op;

/// Editing core for masked input.
#[derive(Debug, Clone, Default)]
pub struct MaskedCore {
    mask: Mask,
    buffer: Vec<char>,
}

impl MaskedCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the mask with the default translations.
    pub fn from_mask_str(mask: &str) -> Self {
        Self::with_mask(Mask::compile(mask, &Translations::default()))
    }

    pub fn with_mask(mask: Mask) -> Self {
        let mut s = Self {
            mask,
            buffer: Vec::new(),
        };
        s.clear();
        s
    }

    /// Changes the mask.
    /// Resets the buffer to the skeleton of the new mask.
    pub fn set_mask(&mut self, mask: Mask) {
        self.mask = mask;
        self.clear();
    }

    /// The mask.
    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Reset all slots to blank.
    pub fn clear(&mut self) {
        self.buffer = (0..self.mask.len()).map(|i| self.mask.blank(i)).collect();
    }

    /// Buffer as String.
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Raw buffer.
    #[inline]
    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    /// Length of the buffer. Always the same as the mask.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.buffer.len() as upos_type
    }

    /// No mask, no buffer.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Char at the position.
    #[inline]
    pub fn char_at(&self, pos: upos_type) -> Option<char> {
        self.buffer.get(pos as usize).copied()
    }

    /// Position is a slot and not blank.
    #[inline]
    pub fn is_filled(&self, pos: upos_type) -> bool {
        self.mask.is_pattern(pos) && self.buffer[pos as usize] != self.mask.blank(pos)
    }

    /// Every slot is filled.
    ///
    /// A mask without slots is always full.
    pub fn is_full(&self) -> bool {
        (0..self.len()).all(|i| !self.mask.is_pattern(i) || self.is_filled(i))
    }

    /// No slot is filled.
    pub fn is_empty(&self) -> bool {
        (0..self.len()).all(|i| !self.is_filled(i))
    }

    /// Set all slots in the range to blank.
    pub fn reset_range(&mut self, range: Range<upos_type>) {
        let end = range.end.min(self.len());
        for i in range.start..end {
            if self.mask.is_pattern(i) {
                self.buffer[i as usize] = self.mask.blank(i);
            }
        }
    }

    /// Place c at the slot. Ignores literal positions and
    /// chars not accepted by the slot.
    pub(crate) fn set_slot(&mut self, pos: upos_type, c: char) -> bool {
        if self.mask.accepts(pos, c) {
            self.buffer[pos as usize] = c;
            true
        } else {
            false
        }
    }

    /// Set a slot to blank.
    pub(crate) fn blank_slot(&mut self, pos: upos_type) {
        if self.mask.is_pattern(pos) {
            self.buffer[pos as usize] = self.mask.blank(pos);
        }
    }

    /// Check the selection against the buffer.
    pub fn check_selection(&self, selection: &Range<upos_type>) -> Result<(), MaskError> {
        if selection.start > selection.end || selection.end > self.len() {
            Err(MaskError::SelectionOutOfBounds(
                selection.start,
                selection.end,
                self.len(),
            ))
        } else {
            Ok(())
        }
    }
}
