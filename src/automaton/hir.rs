//! This module contains a TryFrom implementation for converting the HIR of a regex to an NFA.

use regex_syntax::hir::{Hir, HirKind};

use crate::{unsupported, LexGenError, Result};

use super::{char_class::CharacterClass, nfa::Nfa};

impl TryFrom<&Hir> for Nfa {
    type Error = LexGenError;

    fn try_from(hir: &Hir) -> Result<Self> {
        let mut nfa = Nfa::new();
        match hir.kind() {
            HirKind::Empty => Ok(nfa),
            HirKind::Literal(literal) => {
                let text = std::str::from_utf8(&literal.0)
                    .map_err(|_| unsupported!(format!("Non-UTF-8 literal {:?}", literal)))?;
                for c in text.chars() {
                    nfa.concat(Nfa::single(CharacterClass::single(c)));
                }
                Ok(nfa)
            }
            HirKind::Class(class) => Ok(Nfa::single(class.try_into()?)),
            HirKind::Look(look) => Err(unsupported!(format!("Assertion {:?}", look))),
            HirKind::Repetition(repetition) => {
                let sub: Nfa = repetition.sub.as_ref().try_into()?;
                for _ in 0..repetition.min {
                    nfa.concat(sub.clone());
                }
                match repetition.max {
                    None => {
                        let mut zero_or_more = sub;
                        zero_or_more.zero_or_more();
                        nfa.concat(zero_or_more);
                    }
                    Some(max) => {
                        let mut zero_or_one = sub;
                        zero_or_one.zero_or_one();
                        for _ in repetition.min..max {
                            nfa.concat(zero_or_one.clone());
                        }
                    }
                }
                Ok(nfa)
            }
            HirKind::Capture(capture) => capture.sub.as_ref().try_into(),
            HirKind::Concat(hirs) => {
                for hir in hirs {
                    let nfa2: Nfa = hir.try_into()?;
                    nfa.concat(nfa2);
                }
                Ok(nfa)
            }
            HirKind::Alternation(hirs) => {
                let mut alternatives = hirs.iter();
                if let Some(first) = alternatives.next() {
                    nfa = first.try_into()?;
                }
                for hir in alternatives {
                    let nfa2: Nfa = hir.try_into()?;
                    nfa.alternation(nfa2);
                }
                Ok(nfa)
            }
        }
    }
}
