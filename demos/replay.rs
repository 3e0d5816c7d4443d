//!
//! Replays a list of edits against a masked field and prints
//! the value and cursor after each step.
//!
//! The engine logs to `replay.log`.
//!

use anyhow::anyhow;
use rat_mask::char_class::Translations;
use rat_mask::masked_field::{MaskedFieldState, RawEdit};
use rat_mask::upos_type;
use rat_mask::value_link::ValueLink;
use std::cell::RefCell;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    Focus,
    Blur,
    Select(upos_type, upos_type),
    Edit(RawEdit<'a>),
}

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    replay(
        "date",
        "99/99/9999",
        Translations::default(),
        "",
        &[
            Step::Focus,
            Step::Edit(RawEdit::Insert('2')),
            Step::Edit(RawEdit::Insert('3')),
            Step::Edit(RawEdit::Insert('x')),
            Step::Edit(RawEdit::Paste("4a5b6")),
            Step::Select(1, 5),
            Step::Edit(RawEdit::Backspace),
            Step::Edit(RawEdit::Paste("1234567")),
            Step::Blur,
            Step::Edit(RawEdit::ExternalPush("")),
        ],
    )?;

    let mut hex = Translations::default();
    hex.insert_regex('h', "[0-9a-fA-F]")?;
    replay(
        "mac",
        "hh:hh:hh:hh:hh:hh",
        hex,
        "00:1a",
        &[
            Step::Focus,
            Step::Edit(RawEdit::Paste("2B3C4D5E")),
            Step::Edit(RawEdit::Backspace),
            Step::Edit(RawEdit::Insert('F')),
        ],
    )?;

    replay(
        "plain",
        "",
        Translations::default(),
        "",
        &[
            Step::Focus,
            Step::Edit(RawEdit::Paste("no mask")),
            Step::Edit(RawEdit::Backspace),
            Step::Blur,
        ],
    )?;

    Ok(())
}

fn replay(
    name: &str,
    mask: &str,
    translations: Translations,
    value: &str,
    steps: &[Step<'_>],
) -> Result<(), anyhow::Error> {
    let changes = Rc::new(RefCell::new(Vec::new()));

    let c1 = changes.clone();
    let link = ValueLink::new(value, move |e| {
        c1.borrow_mut().push(format!("change {:?}", e.value));
    })
    .on_complete(|v| println!("    complete {:?}", v));

    let mut state = MaskedFieldState::named(name).with_value_link(link);
    let (text, cursor) = state.initialize(mask, Some(translations), None);
    println!("{} {:?}: {:?} cursor {}", name, mask, text, cursor);

    for step in steps {
        let r = match step {
            Step::Focus => state.focus_gained(),
            Step::Blur => state.focus_lost(),
            Step::Select(anchor, cursor) => state.set_selection(*anchor, *cursor).into(),
            Step::Edit(edit) => {
                let selection: Range<upos_type> = state.selection();
                state
                    .apply_edit(*edit, selection)
                    .map_err(|e| anyhow!("{:?}: {}", step, e))?
            }
        };

        // the display would place the cursor now.
        let mut display_cursor = None;
        if let Some(request) = state.cursor_request() {
            request.apply(|pos| display_cursor = Some(pos));
        }

        println!(
            "  {:<28} {:<22} {:?} cursor {:?}",
            format!("{:?}", step),
            format!("{:?}", state.value()),
            r,
            display_cursor
        );
        for change in changes.borrow_mut().drain(..) {
            println!("    {}", change);
        }
    }

    Ok(())
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("replay.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(log::LevelFilter::Trace)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
