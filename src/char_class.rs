//!
//! Character classes for the slots of a mask.
//!
//! A [CharClass] decides if a single character can go into a slot.
//! The [Translations] table maps mask characters to their class.
//! Every mask character without a translation is a literal.
//!
//! The default table knows
//! * `9`: digit
//! * `a`: ascii letter
//! * `*`: ascii letter or digit
//!

use crate::MaskError;
use dyn_clone::{DynClone, clone_box};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Acceptance predicate for one slot.
pub trait CharClass: DynClone + Debug {
    /// Can c be placed in a slot of this class.
    fn accepts(&self, c: char) -> bool;
}

/// 0-9
#[derive(Debug, Default, Clone, Copy)]
pub struct Digit;

/// A-Z, a-z
#[derive(Debug, Default, Clone, Copy)]
pub struct Letter;

/// A-Z, a-z, 0-9
#[derive(Debug, Default, Clone, Copy)]
pub struct Alphanumeric;

impl CharClass for Digit {
    fn accepts(&self, c: char) -> bool {
        c.is_ascii_digit()
    }
}

impl CharClass for Letter {
    fn accepts(&self, c: char) -> bool {
        c.is_ascii_alphabetic()
    }
}

impl CharClass for Alphanumeric {
    fn accepts(&self, c: char) -> bool {
        c.is_ascii_alphanumeric()
    }
}

/// Regex based class.
///
/// The char is accepted if the regex matches anywhere in it.
/// Anchors are not necessary, `[A-F0-9]` is fine.
#[derive(Debug, Clone)]
pub struct RegexClass {
    re: Regex,
}

impl RegexClass {
    pub fn new(pattern: &str) -> Result<Self, MaskError> {
        Ok(Self {
            re: Regex::new(pattern)?,
        })
    }
}

impl CharClass for RegexClass {
    fn accepts(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.re.is_match(c.encode_utf8(&mut buf))
    }
}

/// Class from a closure.
#[derive(Clone)]
pub struct FnClass {
    f: Arc<dyn Fn(char) -> bool + Send + Sync>,
}

impl Debug for FnClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClass").finish_non_exhaustive()
    }
}

impl FnClass {
    pub fn new(f: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl CharClass for FnClass {
    fn accepts(&self, c: char) -> bool {
        (self.f)(c)
    }
}

impl Clone for Box<dyn CharClass> {
    fn clone(&self) -> Self {
        clone_box(self.as_ref())
    }
}

impl CharClass for Box<dyn CharClass> {
    fn accepts(&self, c: char) -> bool {
        self.as_ref().accepts(c)
    }
}

/// Maps mask characters to character classes.
///
/// [Translations::default] contains the builtin classes,
/// everything added later overrides or extends them.
#[derive(Debug, Clone)]
pub struct Translations {
    map: FxHashMap<char, Box<dyn CharClass>>,
}

impl Default for Translations {
    fn default() -> Self {
        let mut map = FxHashMap::<char, Box<dyn CharClass>>::default();
        map.insert('9', Box::new(Digit));
        map.insert('a', Box::new(Letter));
        map.insert('*', Box::new(Alphanumeric));
        Self { map }
    }
}

impl Translations {
    /// Default translations.
    pub fn new() -> Self {
        Self::default()
    }

    /// No translations at all. Every mask character is a literal.
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Builder style insert.
    pub fn with(mut self, mask_char: char, class: impl CharClass + 'static) -> Self {
        self.insert(mask_char, class);
        self
    }

    /// Set the class for the mask character.
    pub fn insert(&mut self, mask_char: char, class: impl CharClass + 'static) {
        self.map.insert(mask_char, Box::new(class));
    }

    /// Set a regex class for the mask character.
    pub fn insert_regex(&mut self, mask_char: char, pattern: &str) -> Result<(), MaskError> {
        self.insert(mask_char, RegexClass::new(pattern)?);
        Ok(())
    }

    /// Set a closure as class for the mask character.
    pub fn insert_fn(
        &mut self,
        mask_char: char,
        f: impl Fn(char) -> bool + Send + Sync + 'static,
    ) {
        self.insert(mask_char, FnClass::new(f));
    }

    /// Remove a translation. The mask character
    /// becomes a literal.
    pub fn remove(&mut self, mask_char: char) -> bool {
        self.map.remove(&mask_char).is_some()
    }

    /// Class for the mask character.
    pub fn get(&self, mask_char: char) -> Option<&dyn CharClass> {
        self.map.get(&mask_char).map(|v| &**v)
    }

    /// Is there a class for the mask character.
    pub fn contains(&self, mask_char: char) -> bool {
        self.map.contains_key(&mask_char)
    }
}
