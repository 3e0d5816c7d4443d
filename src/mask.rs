//!
//! Compiled input mask.
//!
//! Every char of the mask string is either a literal or a slot.
//! A char becomes a slot if the [Translations] know a class for it.
//!

use crate::char_class::Translations;
use crate::{MaskError, upos_type};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Blank char for unfilled slots.
pub const BLANK_CHAR: char = '_';

/// One position of the mask.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Fixed char.
    Literal(char),
    /// Accepts chars of the class given by this mask char.
    Pattern(char),
}

impl Slot {
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Slot::Literal(_))
    }

    #[inline]
    pub fn is_pattern(&self) -> bool {
        matches!(self, Slot::Pattern(_))
    }
}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Literal(c) => write!(f, "\\{}", c),
            Slot::Pattern(c) => write!(f, "{}", c),
        }
    }
}

/// Input mask.
///
/// Immutable once compiled. Changing the mask means compiling
/// a new one and starting over with the buffer.
#[derive(Clone)]
pub struct Mask {
    template: Vec<char>,
    slots: Vec<Slot>,
    // blank char per position. literal positions hold the literal.
    blanks: Vec<char>,
    translations: Translations,
    first_slot: Option<upos_type>,
}

impl Default for Mask {
    fn default() -> Self {
        Self::compile("", &Translations::default())
    }
}

impl Debug for Mask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Mask ")?;
        for s in &self.slots {
            write!(f, "{:?}", s)?;
        }
        write!(f, " first {:?}", self.first_slot)
    }
}

impl Display for Mask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for c in &self.template {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl Mask {
    /// Compile the mask string with the given translations.
    /// Unfilled slots use [BLANK_CHAR].
    ///
    /// An empty mask gives an empty Mask. A mask without any
    /// slot gives a static mask, that can't be edited.
    pub fn compile(mask: &str, translations: &Translations) -> Self {
        let template = mask.chars().collect::<Vec<_>>();

        let mut slots = Vec::with_capacity(template.len());
        let mut blanks = Vec::with_capacity(template.len());
        let mut first_slot = None;
        for (idx, c) in template.iter().copied().enumerate() {
            if translations.contains(c) {
                if first_slot.is_none() {
                    first_slot = Some(idx as upos_type);
                }
                slots.push(Slot::Pattern(c));
                blanks.push(BLANK_CHAR);
            } else {
                slots.push(Slot::Literal(c));
                blanks.push(c);
            }
        }

        Self {
            template,
            slots,
            blanks,
            translations: translations.clone(),
            first_slot,
        }
    }

    /// Compile the mask with a placeholder format.
    ///
    /// The format is either a single char used for every slot,
    /// or as long as the mask and gives the blank char for each
    /// slot position. The chars at literal positions are ignored.
    /// A blank char must not be accepted by its slot.
    pub fn with_format(
        mask: &str,
        translations: &Translations,
        format: &str,
    ) -> Result<Self, MaskError> {
        let mut m = Self::compile(mask, translations);

        let format = format.chars().collect::<Vec<_>>();
        if format.len() == 1 {
            for (idx, slot) in m.slots.iter().enumerate() {
                if slot.is_pattern() {
                    m.blanks[idx] = format[0];
                }
            }
        } else if format.len() == m.template.len() {
            for (idx, slot) in m.slots.iter().enumerate() {
                if slot.is_pattern() {
                    m.blanks[idx] = format[idx];
                }
            }
        } else {
            return Err(MaskError::FormatLength(format.len(), m.template.len()));
        }

        for idx in 0..m.len() {
            let blank = m.blanks[idx as usize];
            if m.accepts(idx, blank) {
                return Err(MaskError::FormatBlank(idx as usize, blank));
            }
        }

        Ok(m)
    }

    /// Length of the mask.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.slots.len() as upos_type
    }

    /// Empty mask.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Mask without any slots.
    #[inline]
    pub fn is_slotless(&self) -> bool {
        self.first_slot.is_none()
    }

    /// First slot.
    #[inline]
    pub fn first_slot(&self) -> Option<upos_type> {
        self.first_slot
    }

    /// Mask chars as given.
    #[inline]
    pub fn template(&self) -> &[char] {
        &self.template
    }

    /// All positions.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Translations used for this mask.
    #[inline]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Position idx.
    ///
    /// Panic
    /// Panics if idx is out of bounds.
    #[inline]
    pub fn slot(&self, idx: upos_type) -> Slot {
        self.slots[idx as usize]
    }

    /// Position is a slot.
    /// Out of bounds is never a slot.
    #[inline]
    pub fn is_pattern(&self, idx: upos_type) -> bool {
        self.slots
            .get(idx as usize)
            .map(|v| v.is_pattern())
            .unwrap_or(false)
    }

    /// Blank char for this position. For a literal position
    /// this is the literal itself.
    #[inline]
    pub fn blank(&self, idx: upos_type) -> char {
        self.blanks[idx as usize]
    }

    /// Can c be placed at the position.
    /// Literal positions and out of bounds accept nothing.
    pub fn accepts(&self, idx: upos_type, c: char) -> bool {
        match self.slots.get(idx as usize) {
            Some(Slot::Pattern(m)) => self
                .translations
                .get(*m)
                .map(|class| class.accepts(c))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// The buffer of an untouched field.
    pub fn skeleton(&self) -> String {
        self.blanks.iter().collect()
    }

    /// First slot after idx.
    pub fn next_slot(&self, idx: upos_type) -> Option<upos_type> {
        self.slot_at_or_after(idx + 1)
    }

    /// First slot at or after idx.
    pub fn slot_at_or_after(&self, idx: upos_type) -> Option<upos_type> {
        (idx..self.len()).find(|v| self.is_pattern(*v))
    }

    /// Last slot before idx.
    pub fn prev_slot(&self, idx: upos_type) -> Option<upos_type> {
        (0..idx.min(self.len())).rev().find(|v| self.is_pattern(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile() {
        let m = Mask::compile("99/99/9999", &Translations::default());
        assert_eq!(m.len(), 10);
        assert_eq!(m.first_slot(), Some(0));
        assert_eq!(m.slot(2), Slot::Literal('/'));
        assert_eq!(m.slot(3), Slot::Pattern('9'));
        assert_eq!(m.skeleton(), "__/__/____");
        assert_eq!(m.to_string(), "99/99/9999");

        let m = Mask::compile("21-99999999", &Translations::default());
        assert_eq!(m.first_slot(), Some(3));
        assert_eq!(m.skeleton(), "21-________");

        let m = Mask::compile("(--)", &Translations::default());
        assert!(m.is_slotless());
        assert_eq!(m.skeleton(), "(--)");

        let m = Mask::compile("", &Translations::default());
        assert!(m.is_empty());
        assert!(m.is_slotless());
    }

    #[test]
    fn test_navigation() {
        let m = Mask::compile("99/99", &Translations::default());
        assert_eq!(m.next_slot(1), Some(3));
        assert_eq!(m.next_slot(4), None);
        assert_eq!(m.prev_slot(3), Some(1));
        assert_eq!(m.prev_slot(0), None);
        assert_eq!(m.prev_slot(99), Some(4));
        assert_eq!(m.slot_at_or_after(2), Some(3));
        assert_eq!(m.slot_at_or_after(5), None);
    }

    #[test]
    fn test_format() {
        let m = Mask::with_format("99/99", &Translations::default(), " ").expect("valid");
        assert_eq!(m.skeleton(), "  /  ");

        let m = Mask::with_format("99/99", &Translations::default(), "dd-mm").expect("valid");
        assert_eq!(m.skeleton(), "dd/mm");

        assert_eq!(
            Mask::with_format("99/99", &Translations::default(), "dd").unwrap_err(),
            MaskError::FormatLength(2, 5)
        );

        // a typed 0 would look blank
        assert_eq!(
            Mask::with_format("99/99", &Translations::default(), "0").unwrap_err(),
            MaskError::FormatBlank(0, '0')
        );
        assert_eq!(
            Mask::with_format("aa-99", &Translations::default(), "__-m9").unwrap_err(),
            MaskError::FormatBlank(4, '9')
        );
    }

    #[test]
    fn test_accepts() {
        let m = Mask::compile("9a*", &Translations::default());
        assert!(m.accepts(0, '5'));
        assert!(!m.accepts(0, 'x'));
        assert!(m.accepts(1, 'x'));
        assert!(!m.accepts(1, '5'));
        assert!(m.accepts(2, 'x'));
        assert!(m.accepts(2, '5'));
        assert!(!m.accepts(2, '-'));
        assert!(!m.accepts(3, '5'));
    }
}
