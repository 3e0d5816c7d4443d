#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod char_class;
pub mod cursor;
pub mod mask;
pub mod masked_core;
pub mod masked_field;
pub mod value_link;

pub mod event {
    //!
    //! Results of editing.
    //!

    pub use rat_event::{ConsumedEvent, Outcome};

    /// Result of an edit operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum MaskOutcome {
        /// The edit has not been used at all.
        Continue,
        /// The edit has been recognized, but the result was nil.
        /// A rejected character ends up here.
        Unchanged,
        /// Something other than the value changed,
        /// usually the cursor.
        Changed,
        /// The caller-visible value changed.
        TextChanged,
        /// The value changed and every slot of the mask is
        /// filled now. Fires once per transition to full.
        Completed,
    }

    impl MaskOutcome {
        /// The caller-visible value changed.
        pub fn is_text_changed(&self) -> bool {
            matches!(self, MaskOutcome::TextChanged | MaskOutcome::Completed)
        }

        /// The mask has been completed with this edit.
        pub fn is_completed(&self) -> bool {
            *self == MaskOutcome::Completed
        }
    }

    impl ConsumedEvent for MaskOutcome {
        fn is_consumed(&self) -> bool {
            *self != MaskOutcome::Continue
        }
    }

    // Useful for converting most navigation results.
    impl From<bool> for MaskOutcome {
        fn from(value: bool) -> Self {
            if value {
                MaskOutcome::Changed
            } else {
                MaskOutcome::Unchanged
            }
        }
    }

    impl From<Outcome> for MaskOutcome {
        fn from(value: Outcome) -> Self {
            match value {
                Outcome::Continue => MaskOutcome::Continue,
                Outcome::Unchanged => MaskOutcome::Unchanged,
                Outcome::Changed => MaskOutcome::Changed,
            }
        }
    }

    impl From<MaskOutcome> for Outcome {
        fn from(value: MaskOutcome) -> Self {
            match value {
                MaskOutcome::Continue => Outcome::Continue,
                MaskOutcome::Unchanged => Outcome::Unchanged,
                MaskOutcome::Changed => Outcome::Changed,
                MaskOutcome::TextChanged => Outcome::Changed,
                MaskOutcome::Completed => Outcome::Changed,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The selection is not a valid range for the buffer.
    ///
    /// Contains the [start, end) of the selection and the
    /// length of the buffer, in that order.
    SelectionOutOfBounds(upos_type, upos_type, upos_type),
    /// The placeholder format must be either 1 char or as long
    /// as the mask.
    ///
    /// Contains the length of the format and of the mask,
    /// in that order.
    FormatLength(usize, usize),
    /// The placeholder format uses a blank char the slot accepts.
    /// A blank slot couldn't be told apart from a filled one.
    ///
    /// Contains the position and the blank char.
    FormatBlank(usize, char),
    /// A regex translation could not be compiled.
    InvalidPattern(String),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

impl From<regex::Error> for MaskError {
    fn from(value: regex::Error) -> Self {
        MaskError::InvalidPattern(value.to_string())
    }
}

/// Position in the buffer.
#[allow(non_camel_case_types)]
pub type upos_type = u32;
