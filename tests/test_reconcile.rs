use rat_mask::char_class::{Digit, Translations};
use rat_mask::mask::{Mask, Slot};
use rat_mask::masked_core::{MaskedCore, mask_op};

const MASKS: &[&str] = &[
    "99/99/9999",
    "(999) 999-9999",
    "21-99999999",
    "aa-**-99",
    "+44 999",
    "99-1-99",
    "036-9999999999-09",
];

const INPUT: &[&str] = &[
    "",
    "1",
    "12345",
    "2a3b4c5",
    "12/34/5678",
    "(555) 123-4567",
    "xy-z1-23",
    "----",
    "99999999999999999999",
];

fn check_literals(m: &MaskedCore) {
    let buf = m.buffer();
    assert_eq!(buf.len(), m.mask().template().len());
    for (i, slot) in m.mask().slots().iter().enumerate() {
        if let Slot::Literal(c) = slot {
            assert_eq!(buf[i], *c, "literal at {} in {:?}", i, m.text());
        }
    }
}

#[test]
fn test_length_and_literals() {
    for mask in MASKS {
        for input in INPUT {
            let mut m = MaskedCore::from_mask_str(mask);
            let c = mask_op::reconcile(&mut m, input, 0, 0);
            check_literals(&m);
            assert!(c <= m.len());

            for pos in 0..=m.len() {
                let mut n = m.clone();
                mask_op::insert_str(&mut n, pos..pos, input).expect("ok");
                check_literals(&n);

                let mut n = m.clone();
                let c = mask_op::remove_prev(&mut n, pos..pos).expect("ok");
                check_literals(&n);
                assert!(c <= n.len());

                let mut n = m.clone();
                let c = mask_op::remove_next(&mut n, pos..pos).expect("ok");
                check_literals(&n);
                assert!(c <= n.len());

                let mut n = m.clone();
                mask_op::remove_range(&mut n, 0..pos).expect("ok");
                check_literals(&n);
            }
        }
    }
}

#[test]
fn test_idempotent() {
    for mask in MASKS {
        for input in INPUT {
            let mut m = MaskedCore::from_mask_str(mask);
            mask_op::reconcile(&mut m, input, 0, 0);
            let once = m.text();

            mask_op::reconcile(&mut m, &once, 0, 0);
            assert_eq!(m.text(), once, "mask {:?} input {:?}", mask, input);
        }
    }
}

#[test]
fn test_slots_accept() {
    for mask in MASKS {
        for input in INPUT {
            let mut m = MaskedCore::from_mask_str(mask);
            mask_op::reconcile(&mut m, input, 0, 0);
            for i in 0..m.len() {
                if m.mask().is_pattern(i) {
                    let c = m.buffer()[i as usize];
                    assert!(c == m.mask().blank(i) || m.mask().accepts(i, c));
                }
            }
        }
    }
}

#[test]
fn test_exhausted_tail() {
    let mut m = MaskedCore::from_mask_str("99/99/9999");
    mask_op::reconcile(&mut m, "12/34/5678", 0, 0);
    assert!(m.is_full());

    // runs out at the literal
    mask_op::reconcile(&mut m, "12", 0, 0);
    assert_eq!(m.text(), "12/__/____");
    assert!(!m.is_full());
    assert!(!m.is_empty());

    mask_op::reconcile(&mut m, "", 0, 0);
    assert_eq!(m.text(), "__/__/____");
    assert!(m.is_empty());
}

#[test]
fn test_custom_translations() {
    let mut t = Translations::empty();
    t.insert('#', Digit);
    t.insert_regex('h', "[0-9A-Fa-f]").expect("regex");
    t.insert_fn('v', |c| "aeiou".contains(c));

    let mask = Mask::compile("#h-v9", &t);
    assert_eq!(mask.first_slot(), Some(0));
    // 9 is a literal without the default translations
    assert_eq!(mask.slot(4), Slot::Literal('9'));

    let mut m = MaskedCore::with_mask(mask);
    let c = mask_op::insert_str(&mut m, 0..0, "1gFxe").expect("ok");
    assert_eq!(m.text(), "1F-e9");
    assert_eq!(c, 5);
    assert!(m.is_full());
}
