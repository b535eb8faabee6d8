//! The automaton that decides which input prefix a lexer rule matches.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Character sets consumed by single transitions.
mod char_class;

/// The conversion from HIR to NFA.
mod hir;

/// The NFA implementation.
mod nfa;
use nfa::Nfa;

/// The parser for the regex dialect.
mod regex;
use self::regex::parse_regex;

/// A compiled matcher for one regex of the specification dialect.
///
/// The automaton answers the only question a lexer asks of it: how long is the longest prefix of
/// the remaining input that the regex accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Automaton {
    nfa: Nfa,
}

impl Automaton {
    /// Compile a regex of the specification dialect into an automaton.
    /// # Errors
    /// An error is returned if the regex is malformed.
    pub fn compile(regex: &str) -> Result<Self> {
        let hir = parse_regex(regex)?;
        let nfa: Nfa = (&hir).try_into()?;
        Ok(Automaton { nfa })
    }

    /// Returns the length in bytes of the longest prefix of `input` the automaton accepts,
    /// or `None` if it accepts no prefix at all.
    ///
    /// The length is a byte offset suitable for slicing `input`. It differs from the character
    /// count that [`crate::Action::ComeBack`] rewinds by as soon as the match holds non-ASCII
    /// characters.
    pub fn find_longest(&self, input: &str) -> Option<usize> {
        self.nfa.longest_prefix(input)
    }

    /// Check that a loaded automaton can be run safely.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        self.nfa.validate()
    }

    /// Returns true if the automaton accepts the whole input.
    pub fn is_match(&self, input: &str) -> bool {
        self.find_longest(input) == Some(input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match() {
        let automaton = Automaton::compile("(a|b)*abb").unwrap();
        assert_eq!(automaton.find_longest("abbabbc"), Some(6));
        assert_eq!(automaton.find_longest("ab"), None);
        assert!(automaton.is_match("babb"));
    }

    #[test]
    fn test_literal_characters() {
        let automaton = Automaton::compile("a.+").unwrap();
        assert!(automaton.is_match("a.+"));
        assert_eq!(automaton.find_longest("ab"), None);
    }

    #[test]
    fn test_escapes() {
        assert!(Automaton::compile(r"\_").unwrap().is_match(" "));
        assert!(Automaton::compile(r"\n").unwrap().is_match("\n"));
        assert!(Automaton::compile(r"\t|\_").unwrap().is_match("\t"));
        assert!(Automaton::compile(r"\(\)").unwrap().is_match("()"));
        assert!(Automaton::compile(r"\$").unwrap().is_match("$"));
        assert!(Automaton::compile(r"\\").unwrap().is_match("\\"));
    }

    #[test]
    fn test_empty_string() {
        let automaton = Automaton::compile("a($|b)").unwrap();
        assert_eq!(automaton.find_longest("ac"), Some(1));
        assert_eq!(automaton.find_longest("abc"), Some(2));

        let automaton = Automaton::compile("x*").unwrap();
        assert_eq!(automaton.find_longest("y"), Some(0));
    }

    #[test]
    fn test_unicode() {
        let automaton = Automaton::compile("č(ž)*").unwrap();
        assert_eq!(automaton.find_longest("čžža"), Some(6));
    }

    #[test]
    fn test_match_length_is_in_bytes() {
        let automaton = Automaton::compile("žž*").unwrap();
        let input = "žžx";
        let length = automaton.find_longest(input).unwrap();
        assert_eq!(length, 4);
        assert_eq!(&input[..length], "žž");
        // A rewind counts characters, so the matched text has to be counted explicitly
        assert_eq!(input[..length].chars().count(), 2);
    }

    #[test]
    fn test_malformed() {
        assert!(Automaton::compile("*a").is_err());
        assert!(Automaton::compile("(a").is_err());
    }
}
