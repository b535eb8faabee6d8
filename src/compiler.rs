//! This module contains the compiler that turns a parsed lexical specification into a lexer
//! model.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use itertools::Itertools;
use log::{trace, warn};

use crate::{
    persist_model, read_specification, unsupported, Action, LexGenError, LexGenErrorKind,
    LexerModel, LexerModelBuilder, LexerSpecification, Result, Rule,
};

/// Compile a parsed lexical specification into a lexer model.
///
/// Rules are appended to their states in declaration order. States are created on their first
/// rule. The first declared state becomes the start state.
/// # Errors
/// An error is returned if a rule has a malformed directive or regex, or if the start state or a
/// transition target has no rules.
pub fn compile_lexer_model(specification: &LexerSpecification) -> Result<LexerModel> {
    let now = Instant::now();
    check_declarations(specification);

    let mut builder = LexerModelBuilder::new();
    for (index, description) in specification.rules.iter().enumerate() {
        let rule = Rule::new(description).map_err(|error| match *error.source {
            LexGenErrorKind::UnsupportedFeature(s) => unsupported!(format!(
                "Error in rule #{} '{}' of state {}: {}",
                index,
                description.regex.escape_default(),
                description.active_state,
                s
            )),
            kind => LexGenError::new(kind),
        })?;
        builder.add_rule(&description.active_state, rule);
    }
    let model = builder.build(&specification.state_names)?;

    trace!(
        "Compiling {} rules into states [{}] took {} milliseconds.",
        specification.rules.len(),
        model.states().iter().map(|s| s.name()).join(", "),
        now.elapsed().as_millis()
    );
    Ok(model)
}

/// Read, compile and persist a lexical specification in one go.
pub fn generate_lexer_model<P>(input: &str, output: P) -> Result<LexerModel>
where
    P: AsRef<Path>,
{
    let specification = read_specification(input)?;
    let model = compile_lexer_model(&specification)?;
    persist_model(&model, output)?;
    Ok(model)
}

/// Warn about declarations the rules do not agree with. None of these stop the compilation.
/// Returns the warnings that were logged.
fn check_declarations(specification: &LexerSpecification) -> Vec<String> {
    let mut warnings = Vec::new();
    for name in specification.state_names.iter().duplicates() {
        warnings.push(format!("Lexer state '{}' is declared more than once", name));
    }
    for name in specification.token_names.iter().duplicates() {
        warnings.push(format!("Token class '{}' is declared more than once", name));
    }

    let states: HashSet<&str> = specification
        .state_names
        .iter()
        .map(String::as_str)
        .collect();
    let tokens: HashSet<&str> = specification
        .token_names
        .iter()
        .map(String::as_str)
        .collect();
    for rule in &specification.rules {
        if !states.contains(rule.active_state.as_str()) {
            warnings.push(format!(
                "Rule '{}' is active in undeclared state '{}'",
                rule.regex, rule.active_state
            ));
        }
        if rule.action_name != crate::NO_TOKEN && !tokens.contains(rule.action_name.as_str()) {
            warnings.push(format!(
                "Rule '{}' declares undeclared token class '{}'",
                rule.regex, rule.action_name
            ));
        }
        // Malformed directives are reported when the rule is built
        let targets = rule
            .extra_lines
            .iter()
            .filter_map(|line| Action::from_directive(line).ok().flatten())
            .filter_map(|action| match action {
                Action::ChangeState(target) => Some(target),
                _ => None,
            });
        for target in targets {
            if !states.contains(target.as_str()) {
                warnings.push(format!(
                    "Rule '{}' changes to undeclared state '{}'",
                    rule.regex, target
                ));
            }
        }
    }

    for warning in &warnings {
        warn!("{}", warning);
    }
    warnings
}
