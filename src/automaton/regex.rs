//! This module contains the parser for the regex dialect of lexical specifications.
//! The dialect only knows alternation, Kleene star, grouping and `$` for the empty string,
//! every other character is a literal. We translate it into the syntax of the `regex_syntax`
//! crate and let that crate produce the high-level intermediate representation (HIR).

use log::trace;
use regex_syntax::{hir::Hir, ParserBuilder};
use std::time::Instant;

use crate::Result;

/// Translate a regex of the specification dialect into `regex_syntax` syntax.
pub(crate) fn translate(source: &str) -> String {
    let mut translated = String::with_capacity(source.len() * 2);
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => push_literal(&mut translated, '\n'),
                Some('t') => push_literal(&mut translated, '\t'),
                Some('_') => push_literal(&mut translated, ' '),
                Some(escaped) => push_literal(&mut translated, escaped),
                // A trailing backslash stands for itself
                None => push_literal(&mut translated, '\\'),
            },
            '$' => translated.push_str("(?:)"),
            '(' | ')' | '|' | '*' => translated.push(c),
            _ => push_literal(&mut translated, c),
        }
    }
    translated
}

fn push_literal(translated: &mut String, c: char) {
    let mut buffer = [0; 4];
    translated.push_str(&regex_syntax::escape(c.encode_utf8(&mut buffer)));
}

/// Parse a regex of the specification dialect into HIR.
/// # Errors
/// An error is returned if the regex is not well-formed, e.g. has unbalanced parentheses.
pub(crate) fn parse_regex(source: &str) -> Result<Hir> {
    let now = Instant::now();
    let translated = translate(source);
    let hir = ParserBuilder::new().build().parse(&translated)?;
    trace!(
        "Parsing '{}' took {} microseconds.",
        source.escape_default(),
        now.elapsed().as_micros()
    );
    Ok(hir)
}
