use serde::{Deserialize, Serialize};

use crate::{action::compose_actions, Action, Automaton, Result, RuleDescription};

/// A lexer rule: an automaton and the actions to execute when it wins a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    automaton: Automaton,
    actions: Vec<Action>,
    regex: String,
}

impl Rule {
    /// Build a rule from its description.
    /// Nothing is built if either the actions or the automaton fail.
    pub fn new(description: &RuleDescription) -> Result<Self> {
        let actions = compose_actions(&description.action_name, &description.extra_lines)?;
        let automaton = Automaton::compile(&description.regex)?;
        Ok(Rule {
            automaton,
            actions,
            regex: description.regex.clone(),
        })
    }

    /// The automaton of the rule.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The actions in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The regex the automaton was compiled from.
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// The states this rule changes to, in action order.
    pub fn target_states(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().filter_map(|action| match action {
            Action::ChangeState(target) => Some(target.as_str()),
            _ => None,
        })
    }

    /// The token class the rule declares, or `None` if it skips its match.
    pub fn token_class(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            Action::DeclareClass(name) => Some(name.as_str()),
            _ => None,
        })
    }
}
