use serde::{Deserialize, Serialize};

use crate::Rule;

/// A named mode of the lexer with its rules in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    name: String,
    rules: Vec<Rule>,
}

impl State {
    /// Create a new state without rules.
    pub fn new<S: Into<String>>(name: S) -> Self {
        State {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// The name of the state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Append a rule. Rules already added keep their position.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Find the rule that wins at the start of `input`.
    ///
    /// The winner is the rule with the longest match. Among rules with equally long matches the
    /// one declared first wins. Returns the rule together with the byte length of its match,
    /// which is not the character count a [`crate::Action::ComeBack`] rewinds by.
    pub fn find_longest_match(&self, input: &str) -> Option<(&Rule, usize)> {
        let mut current_match: Option<(&Rule, usize)> = None;
        for rule in &self.rules {
            if let Some(length) = rule.automaton().find_longest(input) {
                let longer = match current_match {
                    None => true,
                    Some((_, longest)) => length > longest,
                };
                if longer {
                    // Only a strictly longer match replaces an earlier declared rule
                    current_match = Some((rule, length));
                }
            }
        }
        current_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, RuleDescription};

    fn state_with_rules(rules: &[(&str, &str)]) -> State {
        let mut state = State::new("S_pocetno");
        for (regex, action) in rules {
            state.add_rule(Rule::new(&RuleDescription::new("S_pocetno", *regex, *action)).unwrap());
        }
        state
    }

    #[test]
    fn test_longest_match_wins() {
        let state = state_with_rules(&[("a", "A"), ("aa*", "AS"), ("b", "B")]);
        let (rule, length) = state.find_longest_match("aaab").unwrap();
        assert_eq!(rule.token_class(), Some("AS"));
        assert_eq!(length, 3);
    }

    #[test]
    fn test_first_declared_wins_a_tie() {
        let state = state_with_rules(&[("int", "KR_INT"), ("(i|n|t)*", "IDN")]);
        let (rule, length) = state.find_longest_match("int x").unwrap();
        assert_eq!(rule.actions(), &[Action::DeclareClass("KR_INT".to_string())]);
        assert_eq!(length, 3);

        let (rule, length) = state.find_longest_match("intint").unwrap();
        assert_eq!(rule.token_class(), Some("IDN"));
        assert_eq!(length, 6);
    }

    #[test]
    fn test_no_match() {
        let state = state_with_rules(&[("a", "A")]);
        assert!(state.find_longest_match("b").is_none());
        assert!(State::new("S").find_longest_match("a").is_none());
    }

    #[test]
    fn test_rules_keep_declaration_order() {
        let state = state_with_rules(&[("a", "A"), ("b", "B"), ("c", "C")]);
        let classes: Vec<_> = state.rules().iter().filter_map(Rule::token_class).collect();
        assert_eq!(classes, vec!["A", "B", "C"]);
    }
}
