//! Actions a lexer rule executes when it wins a match, and the directives that request them.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{LexGenError, LexGenErrorKind, Result};

/// The action name that marks a rule as producing no token.
pub const NO_TOKEN: &str = "-";

const COME_BACK: &str = "VRATI_SE";
const CHANGE_STATE: &str = "UDJI_U_STANJE";
const NEW_LINE: &str = "NOVI_REDAK";

/// One side effect of a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Discard the matched text without producing a token.
    Skip,
    /// Emit a token of the given class with the matched text.
    DeclareClass(String),
    /// Continue matching in the named lexer state.
    ChangeState(String),
    /// Rewind the input cursor by the given number of characters.
    /// Match lengths reported by [`crate::Automaton::find_longest`] are in bytes, not characters.
    ComeBack(usize),
    /// Increment the line counter.
    NewLine,
}

impl Action {
    /// Create the classification action for a rule's action name.
    pub fn classification(action_name: &str) -> Self {
        if action_name == NO_TOKEN {
            Action::Skip
        } else {
            Action::DeclareClass(action_name.to_string())
        }
    }

    /// Parse an extra parameter line of a rule.
    ///
    /// Directive arguments are accepted separated by whitespace (`VRATI_SE 2`) or in parentheses
    /// (`VRATI_SE(2)`). Lines that are no directive yield `None`.
    /// # Errors
    /// `MalformedActionDirective` if a rewind has no integer argument or a state change has no
    /// target.
    pub fn from_directive(line: &str) -> Result<Option<Self>> {
        let directive = line.trim();
        if directive == NEW_LINE {
            return Ok(Some(Action::NewLine));
        }
        if let Some(argument) = directive_argument(directive, COME_BACK) {
            let argument = argument.ok_or_else(|| malformed(line, "missing rewind length"))?;
            let length = argument.parse::<usize>().map_err(|_| {
                malformed(
                    line,
                    &format!("'{}' is not a non-negative integer", argument),
                )
            })?;
            return Ok(Some(Action::ComeBack(length)));
        }
        if let Some(argument) = directive_argument(directive, CHANGE_STATE) {
            let target = argument.ok_or_else(|| malformed(line, "missing target state"))?;
            return Ok(Some(Action::ChangeState(target.to_string())));
        }
        debug!("Ignoring extra parameter line '{}'", line.escape_default());
        Ok(None)
    }
}

/// Compose the ordered action sequence of a rule.
///
/// The sequence starts with the classification. Rewinds are inserted at the front, so a later
/// rewind ends up before an earlier one. State changes and new lines are appended in the order of
/// their lines.
pub fn compose_actions<S>(action_name: &str, extra_lines: &[S]) -> Result<Vec<Action>>
where
    S: AsRef<str>,
{
    let mut actions = vec![Action::classification(action_name)];
    for line in extra_lines {
        match Action::from_directive(line.as_ref())? {
            Some(action @ Action::ComeBack(_)) => actions.insert(0, action),
            Some(action) => actions.push(action),
            None => {}
        }
    }
    Ok(actions)
}

/// Returns `None` if the directive is not the given keyword, otherwise its argument if any.
fn directive_argument<'a>(directive: &'a str, keyword: &str) -> Option<Option<&'a str>> {
    let rest = directive.strip_prefix(keyword)?;
    if rest.is_empty() {
        return Some(None);
    }
    let argument = if let Some(parenthesized) = rest.strip_prefix('(') {
        parenthesized.strip_suffix(')').map(str::trim)
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        // Only a prefix of a longer word
        return None;
    };
    Some(argument.filter(|a| !a.is_empty()))
}

fn malformed(line: &str, reason: &str) -> LexGenError {
    LexGenError::new(LexGenErrorKind::MalformedActionDirective {
        line: line.to_string(),
        reason: reason.to_string(),
    })
}
