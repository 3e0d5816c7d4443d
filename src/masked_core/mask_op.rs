//!
//! Edit operations on a [MaskedCore].
//!
//! All of them are built on [reconcile], which rewrites the buffer
//! from some start position with a raw, unmasked text.
//!
//! Each operation returns the new cursor position.
//!

use crate::mask::Slot;
use crate::masked_core::MaskedCore;
use crate::{MaskError, upos_type};
use log::{debug, trace};
use std::ops::Range;

/// Rewrite the buffer from `start` with the raw text.
///
/// The raw text is what the field would contain from `start` onward
/// if there was no mask. It's consumed char by char:
///
/// * A char equal to the current buffer value is kept as is.
///   This lets separators and blanks that are still part of the raw
///   text pass through without using up a slot.
/// * A char accepted by the slot fills it.
/// * Anything else is dropped.
///
/// Literals missing in the raw text are inserted on the fly.
/// When the raw text runs out, every slot from that point
/// to the end of the mask is blanked. Surplus raw text is ignored.
///
/// `cursor` is the cursor position as if the raw text had been
/// placed at `start` unmasked. Returns the cursor position
/// adjusted for dropped chars and inserted literals.
pub fn reconcile(
    core: &mut MaskedCore,
    raw: &str,
    start: upos_type,
    cursor: upos_type,
) -> upos_type {
    let raw = raw.chars().map(|c| (c, false)).collect::<Vec<_>>();
    walk(core, &raw, start, cursor)
}

/// Reconcile the text followed by the buffer content from `tail`.
///
/// Literals of the old tail only match literals again. They never
/// fill a slot.
fn reconcile_tail(
    core: &mut MaskedCore,
    text: &str,
    tail: upos_type,
    start: upos_type,
    cursor: upos_type,
) -> upos_type {
    let mut raw = text.chars().map(|c| (c, false)).collect::<Vec<_>>();
    raw.extend(
        (tail..core.len()).map(|i| (core.buffer[i as usize], core.mask.slot(i).is_literal())),
    );
    walk(core, &raw, start, cursor)
}

/// Raw chars are paired with a flag for literals of the old tail.
fn walk(
    core: &mut MaskedCore,
    raw: &[(char, bool)],
    start: upos_type,
    cursor: upos_type,
) -> upos_type {
    let len = core.len();

    let origin = cursor as i64;
    let mut cursor = cursor as i64;

    let mut b = start;
    let mut v = 0usize;
    'walk: while b < len {
        match core.mask.slot(b) {
            Slot::Literal(lit) => {
                let raw_pos = start as i64 + v as i64;
                if raw.get(v).map(|(c, _)| *c) == Some(lit) {
                    if raw_pos == origin {
                        cursor += 1;
                    }
                    v += 1;
                } else if raw_pos <= origin {
                    cursor += 1;
                }
                b += 1;
            }
            Slot::Pattern(_) => {
                let slot_start = b;
                core.blank_slot(b);
                loop {
                    let Some((c, tail_literal)) = raw.get(v).copied() else {
                        core.reset_range(b..len);
                        break 'walk;
                    };
                    v += 1;

                    if core.mask.slot(b).is_literal() {
                        if c != core.buffer[b as usize] {
                            // not consumed, the literal goes in as is.
                            v -= 1;
                            continue 'walk;
                        }
                        b += 1;
                    } else if tail_literal {
                        trace!("reconcile: drop literal {:?} at {}", c, b);
                    } else if c == core.buffer[b as usize] {
                        b += 1;
                    } else if core.set_slot(b, c) {
                        b += 1;
                        break;
                    } else {
                        trace!("reconcile: drop {:?} at {}", c, b);
                        if cursor > slot_start as i64 {
                            cursor -= 1;
                        }
                    }

                    if b >= len {
                        break 'walk;
                    }
                }
            }
        }
    }

    cursor.clamp(0, len as i64) as upos_type
}

/// Replace the selection with the text. An empty selection
/// is a plain insert at the cursor.
///
/// The selection is blanked first, then the text and everything
/// after the selection are reconciled from the selection start.
/// A selection starting in the literals before the first slot
/// is moved to the first slot.
pub fn insert_str(
    core: &mut MaskedCore,
    selection: Range<upos_type>,
    text: &str,
) -> Result<upos_type, MaskError> {
    core.check_selection(&selection)?;

    let Some(first) = core.mask.first_slot() else {
        return Ok(selection.start);
    };

    let (start, end) = if selection.start < first {
        (first, selection.end.max(first))
    } else {
        (selection.start, selection.end)
    };

    core.reset_range(start..end);

    let cursor = start + text.chars().count() as upos_type;

    Ok(reconcile_tail(core, text, end, start, cursor))
}

/// Backspace.
///
/// With an empty selection this removes the slot before the cursor
/// and any literals in between. Otherwise, the selection is removed.
///
/// The cursor ends at the start of the removed span, but never
/// before the first slot.
pub fn remove_prev(
    core: &mut MaskedCore,
    selection: Range<upos_type>,
) -> Result<upos_type, MaskError> {
    core.check_selection(&selection)?;

    let Some(first) = core.mask.first_slot() else {
        return Ok(selection.start);
    };

    if !selection.is_empty() {
        return remove_range(core, selection);
    }

    let Some(start) = core.mask.prev_slot(selection.start) else {
        return Ok(first);
    };
    let end = core.mask.next_slot(start).unwrap_or(core.len());

    remove_span(core, start..end);

    Ok(start.max(first))
}

/// Delete.
///
/// With an empty selection this removes the first slot at or after
/// the cursor and any literals up to the next slot. Otherwise, the
/// selection is removed.
///
/// The cursor ends at the start of the removed span, but never
/// before the first slot.
pub fn remove_next(
    core: &mut MaskedCore,
    selection: Range<upos_type>,
) -> Result<upos_type, MaskError> {
    core.check_selection(&selection)?;

    let Some(first) = core.mask.first_slot() else {
        return Ok(selection.start);
    };

    if !selection.is_empty() {
        return remove_range(core, selection);
    }

    let Some(start) = core.mask.slot_at_or_after(selection.start) else {
        return Ok(selection.start.max(first));
    };
    let end = core.mask.next_slot(start).unwrap_or(core.len());

    remove_span(core, start..end);

    Ok(start.max(first))
}

/// Remove the range.
///
/// Shifts the rest of the buffer left if it fits, otherwise the
/// range is blanked. Returns the start of the range, but never
/// less than the first slot.
pub fn remove_range(
    core: &mut MaskedCore,
    range: Range<upos_type>,
) -> Result<upos_type, MaskError> {
    core.check_selection(&range)?;

    let Some(first) = core.mask.first_slot() else {
        return Ok(range.start);
    };
    if !range.is_empty() {
        remove_span(core, range.clone());
    }

    Ok(range.start.max(first))
}

/// Remove the span.
///
/// If the char right after the span fits into the slot at the start,
/// everything after the span moves left. Otherwise, the slots
/// of the span are blanked.
fn remove_span(core: &mut MaskedCore, span: Range<upos_type>) {
    let shift = match core.char_at(span.end) {
        Some(c) => core.mask.accepts(span.start, c),
        None => false,
    };

    if shift {
        debug!("remove_span: shift {:?}", span);
        reconcile_tail(core, "", span.end, span.start, span.start);
    } else {
        debug!("remove_span: blank {:?}", span);
        core.reset_range(span);
    }
}
