//! This module contains the reader for the text of a lexical specification.
//!
//! The text consists of regular definitions (`{name} regex`), the declared lexer states
//! (`%X ...`), the declared token classes (`%L ...`) and the rules:
//!
//! ```text
//! <S_pocetno>{znamenka}{znamenka}*
//! {
//! BROJ
//! NOVI_REDAK
//! }
//! ```

use std::collections::HashMap;
use std::iter::Enumerate;
use std::time::Instant;

use log::trace;

use crate::{LexGenError, LexGenErrorKind, LexerSpecification, Result, RuleDescription};

const STATES_PREFIX: &str = "%X";
const TOKENS_PREFIX: &str = "%L";

/// The lines of the specification together with their 1-based line numbers.
struct Lines<'a>(Enumerate<std::str::Lines<'a>>);

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(i, line)| (i + 1, line))
    }
}

/// Read the text of a lexical specification.
///
/// References to regular definitions in regexes are replaced by the parenthesized definition.
/// # Errors
/// `MalformedSpecification` with the 1-based line number of the first line that does not fit
/// the expected layout.
pub fn read_specification(input: &str) -> Result<LexerSpecification> {
    let now = Instant::now();
    let mut specification = LexerSpecification::default();
    let mut definitions: HashMap<String, String> = HashMap::new();
    let mut lines = Lines(input.lines().enumerate());

    while let Some((number, line)) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(names) = line.strip_prefix(STATES_PREFIX) {
            specification
                .state_names
                .extend(names.split_whitespace().map(str::to_string));
        } else if let Some(names) = line.strip_prefix(TOKENS_PREFIX) {
            specification
                .token_names
                .extend(names.split_whitespace().map(str::to_string));
        } else if line.starts_with('{') {
            let (name, regex) = read_definition(number, line, &definitions)?;
            definitions.insert(name, regex);
            specification.regular_definitions.push(line.to_string());
        } else if let Some(header) = line.strip_prefix('<') {
            let rule = read_rule(number, header, &definitions, &mut lines)?;
            specification.rules.push(rule);
        } else {
            return Err(malformed(number, "unexpected line"));
        }
    }

    trace!(
        "Reading the specification took {} milliseconds.",
        now.elapsed().as_millis()
    );
    Ok(specification)
}

fn read_definition(
    number: usize,
    line: &str,
    definitions: &HashMap<String, String>,
) -> Result<(String, String)> {
    let (name, regex) = line[1..]
        .split_once('}')
        .ok_or_else(|| malformed(number, "unterminated definition name"))?;
    if name.is_empty() {
        return Err(malformed(number, "empty definition name"));
    }
    let regex = expand_definitions(number, regex.trim_start(), definitions)?;
    Ok((name.to_string(), regex))
}

fn read_rule(
    number: usize,
    header: &str,
    definitions: &HashMap<String, String>,
    lines: &mut Lines,
) -> Result<RuleDescription> {
    let (active_state, regex) = header
        .split_once('>')
        .ok_or_else(|| malformed(number, "unterminated state name"))?;
    let regex = expand_definitions(number, regex, definitions)?;

    match lines.next() {
        Some((_, line)) if line.trim() == "{" => {}
        Some((number, _)) => return Err(malformed(number, "expected '{' opening the rule")),
        None => return Err(malformed(number, "missing rule body")),
    }
    let action_name = match lines.next() {
        Some((number, line)) if line.trim() == "}" || line.trim().is_empty() => {
            return Err(malformed(number, "missing action name"))
        }
        Some((_, line)) => line.trim().to_string(),
        None => return Err(malformed(number, "missing action name")),
    };

    let mut extra_lines = Vec::new();
    loop {
        match lines.next() {
            Some((_, line)) if line.trim() == "}" => break,
            Some((_, line)) => extra_lines.push(line.trim().to_string()),
            None => return Err(malformed(number, "rule body is not closed by '}'")),
        }
    }

    Ok(RuleDescription {
        active_state: active_state.to_string(),
        regex,
        action_name,
        extra_lines,
    })
}

/// Replace `{name}` references by `(definition)`. Escaped braces are left alone.
fn expand_definitions(
    number: usize,
    regex: &str,
    definitions: &HashMap<String, String>,
) -> Result<String> {
    let mut expanded = String::with_capacity(regex.len());
    let mut chars = regex.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                expanded.push(c);
                if let Some(escaped) = chars.next() {
                    expanded.push(escaped);
                }
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(malformed(number, "unterminated reference"));
                }
                let definition = definitions.get(&name).ok_or_else(|| {
                    malformed(number, &format!("unknown regular definition '{}'", name))
                })?;
                expanded.push('(');
                expanded.push_str(definition);
                expanded.push(')');
            }
            _ => expanded.push(c),
        }
    }
    Ok(expanded)
}

fn malformed(line: usize, reason: &str) -> LexGenError {
    LexGenError::new(LexGenErrorKind::MalformedSpecification {
        line,
        reason: reason.to_string(),
    })
}
