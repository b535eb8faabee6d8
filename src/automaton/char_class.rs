use regex_syntax::hir::{Class, ClassBytes, ClassUnicode};
use serde::{Deserialize, Serialize};

use crate::{unsupported, LexGenError};

/// A set of characters a single NFA transition consumes.
/// The ranges are inclusive, sorted and non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) struct CharacterClass(pub(super) Vec<(char, char)>);

impl CharacterClass {
    /// A class that matches exactly one character.
    pub(crate) fn single(c: char) -> Self {
        CharacterClass(vec![(c, c)])
    }

    /// Check if the character is a member of the class.
    #[inline]
    pub(crate) fn contains(&self, c: char) -> bool {
        self.0
            .binary_search_by(|&(start, end)| {
                if end < c {
                    std::cmp::Ordering::Less
                } else if start > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Check that the ranges are non-empty, sorted and non-overlapping, which `contains`
    /// depends on.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.0.iter().all(|(start, end)| start <= end)
            && self.0.windows(2).all(|pair| pair[0].1 < pair[1].0)
    }
}

impl From<&ClassUnicode> for CharacterClass {
    fn from(class: &ClassUnicode) -> Self {
        CharacterClass(class.ranges().iter().map(|r| (r.start(), r.end())).collect())
    }
}

impl TryFrom<&ClassBytes> for CharacterClass {
    type Error = LexGenError;

    fn try_from(class: &ClassBytes) -> Result<Self, Self::Error> {
        // Only ASCII byte classes can be expressed as character ranges.
        class
            .ranges()
            .iter()
            .map(|r| {
                if r.end().is_ascii() {
                    Ok((char::from(r.start()), char::from(r.end())))
                } else {
                    Err(unsupported!(format!("Non-ASCII byte class {:?}", class)))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CharacterClass)
    }
}

impl TryFrom<&Class> for CharacterClass {
    type Error = LexGenError;

    fn try_from(class: &Class) -> Result<Self, Self::Error> {
        match class {
            Class::Unicode(c) => Ok(c.into()),
            Class::Bytes(b) => b.try_into(),
        }
    }
}
