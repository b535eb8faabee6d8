//! This module contains the NFA (Non-deterministic Finite Automaton) implementation.
//! Each lexer rule owns one NFA which is built from the rule's regex by Thompson construction
//! and is matched by simulating all active states in parallel.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::StateID;

use super::char_class::CharacterClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Nfa {
    states: Vec<NfaState>,
    start_state: StateID,
    end_state: StateID,
}

impl Nfa {
    pub(crate) fn new() -> Self {
        Self {
            states: vec![NfaState::new(StateID::new(0))],
            start_state: StateID::new(0),
            end_state: StateID::new(0),
        }
    }

    // Returns true if the NFA is empty, i.e. no states and no transitions have been added.
    pub(crate) fn is_empty(&self) -> bool {
        self.start_state.as_usize() == 0
            && self.end_state.as_usize() == 0
            && self.states.len() == 1
            && self.states[0].is_empty()
    }

    #[allow(dead_code)]
    pub(crate) fn start_state(&self) -> StateID {
        self.start_state
    }

    pub(crate) fn end_state(&self) -> StateID {
        self.end_state
    }

    #[allow(dead_code)]
    pub(crate) fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub(crate) fn set_start_state(&mut self, state: StateID) {
        self.start_state = state;
    }

    pub(crate) fn set_end_state(&mut self, state: StateID) {
        self.end_state = state;
    }

    pub(crate) fn add_transition(&mut self, from: StateID, chars: CharacterClass, to: StateID) {
        self.states[from].transitions.push(NfaTransition {
            chars,
            target_state: to,
        });
    }

    pub(crate) fn add_epsilon_transition(&mut self, from: StateID, to: StateID) {
        self.states[from].epsilon_transitions.push(to);
    }

    pub(crate) fn new_state(&mut self) -> StateID {
        let state = StateID::new(self.states.len());
        self.states.push(NfaState::new(state));
        state
    }

    /// Creates an NFA that consumes exactly one character of the given class.
    pub(crate) fn single(chars: CharacterClass) -> Self {
        let mut nfa = Nfa::new();
        let start_state = nfa.end_state();
        let end_state = nfa.new_state();
        nfa.set_end_state(end_state);
        nfa.add_transition(start_state, chars, end_state);
        nfa
    }

    pub(crate) fn offset_states(&mut self, offset: usize) {
        for state in self.states.iter_mut() {
            state.offset(offset);
        }
        self.start_state += offset;
        self.end_state += offset;
    }

    /// Concatenates the current NFA with another NFA.
    pub(crate) fn concat(&mut self, mut nfa: Nfa) {
        if self.is_empty() {
            // Concatenating to the empty NFA just yields the other NFA
            *self = nfa;
            return;
        }

        nfa.offset_states(self.states.len());
        self.states.append(&mut nfa.states);

        // Connect the end state of the current NFA to the start state of the new NFA
        self.add_epsilon_transition(self.end_state, nfa.start_state);
        self.set_end_state(nfa.end_state);
    }

    /// Builds the alternation of the current NFA and another NFA.
    /// Unlike `concat` the empty NFA is a real alternative here, namely the empty string.
    pub(crate) fn alternation(&mut self, mut nfa: Nfa) {
        nfa.offset_states(self.states.len());
        self.states.append(&mut nfa.states);

        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, nfa.start_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        self.add_epsilon_transition(nfa.end_state, end_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    pub(crate) fn zero_or_one(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, self.end_state);
        self.set_start_state(start_state);
    }

    pub(crate) fn zero_or_more(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, self.end_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        // Loop back for further repetitions
        self.add_epsilon_transition(self.end_state, self.start_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    /// Returns the epsilon closure of the given set of states.
    fn epsilon_closure(&self, states: BTreeSet<StateID>) -> BTreeSet<StateID> {
        let mut closure = states;
        let mut stack: Vec<StateID> = closure.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for target in &self.states[state].epsilon_transitions {
                if closure.insert(*target) {
                    stack.push(*target);
                }
            }
        }
        closure
    }

    /// Returns the byte length of the longest prefix of `input` accepted by the NFA.
    /// `Some(0)` means the NFA accepts the empty string but no longer prefix.
    pub(crate) fn longest_prefix(&self, input: &str) -> Option<usize> {
        let mut current = self.epsilon_closure(BTreeSet::from([self.start_state]));
        let mut last_match = current.contains(&self.end_state).then_some(0);

        for (i, c) in input.char_indices() {
            let next: BTreeSet<StateID> = current
                .iter()
                .flat_map(|state| self.states[*state].transitions.iter())
                .filter(|transition| transition.chars.contains(c))
                .map(|transition| transition.target_state)
                .collect();
            if next.is_empty() {
                break;
            }
            current = self.epsilon_closure(next);
            if current.contains(&self.end_state) {
                last_match = Some(i + c.len_utf8());
            }
        }
        last_match
    }

    /// Check that every state reference is in range and every character class is well formed.
    /// Built NFAs always are, loaded ones are checked before they are matched.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        let len = self.states.len();
        let in_range = |state: StateID| state.as_usize() < len;
        if !in_range(self.start_state) || !in_range(self.end_state) {
            return Err(format!(
                "start state {} or end state {} out of {} automaton states",
                self.start_state.as_usize(),
                self.end_state.as_usize(),
                len
            ));
        }
        for (index, state) in self.states.iter().enumerate() {
            let targets = state
                .epsilon_transitions
                .iter()
                .chain(state.transitions.iter().map(|t| &t.target_state));
            if let Some(target) = targets.copied().find(|target| !in_range(*target)) {
                return Err(format!(
                    "automaton state {} has a transition to {} out of {} states",
                    index,
                    target.as_usize(),
                    len
                ));
            }
            if state.transitions.iter().any(|t| !t.chars.is_well_formed()) {
                return Err(format!(
                    "automaton state {} has a malformed character class",
                    index
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NfaState {
    state: StateID,
    epsilon_transitions: Vec<StateID>,
    transitions: Vec<NfaTransition>,
}

impl NfaState {
    pub(crate) fn new(state: StateID) -> Self {
        Self {
            state,
            epsilon_transitions: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.epsilon_transitions.is_empty()
    }

    /// Apply an offset to the state and all transition targets.
    pub(crate) fn offset(&mut self, offset: usize) {
        self.state += offset;
        for transition in self.transitions.iter_mut() {
            transition.target_state += offset;
        }
        for target_state in self.epsilon_transitions.iter_mut() {
            *target_state += offset;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NfaTransition {
    chars: CharacterClass,
    target_state: StateID,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(c: char) -> Nfa {
        Nfa::single(CharacterClass::single(c))
    }

    #[test]
    fn test_nfa_single() {
        let nfa = literal('a');
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.start_state(), StateID::new(0));
        assert_eq!(nfa.end_state(), StateID::new(1));
    }

    #[test]
    fn test_nfa_concat() {
        let mut nfa = literal('a');
        nfa.concat(literal('b'));
        assert_eq!(nfa.states().len(), 4);
        assert_eq!(nfa.start_state(), StateID::new(0));
        assert_eq!(nfa.end_state(), StateID::new(3));
        assert_eq!(nfa.longest_prefix("abc"), Some(2));
        assert_eq!(nfa.longest_prefix("ac"), None);
    }

    #[test]
    fn test_nfa_concat_to_empty() {
        let mut nfa = Nfa::new();
        nfa.concat(literal('a'));
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.longest_prefix("a"), Some(1));
    }

    #[test]
    fn test_nfa_alternation() {
        let mut nfa = literal('a');
        nfa.alternation(literal('b'));
        assert_eq!(nfa.states().len(), 6);
        assert_eq!(nfa.start_state(), StateID::new(4));
        assert_eq!(nfa.end_state(), StateID::new(5));
        assert_eq!(nfa.longest_prefix("b"), Some(1));
        assert_eq!(nfa.longest_prefix("c"), None);
    }

    #[test]
    fn test_nfa_alternation_with_empty() {
        let mut nfa = Nfa::new();
        nfa.alternation(literal('a'));
        assert_eq!(nfa.longest_prefix("a"), Some(1));
        assert_eq!(nfa.longest_prefix("b"), Some(0));
    }

    #[test]
    fn test_nfa_zero_or_one() {
        let mut nfa = literal('a');
        nfa.zero_or_one();
        assert_eq!(nfa.states().len(), 3);
        assert_eq!(nfa.longest_prefix("aa"), Some(1));
        assert_eq!(nfa.longest_prefix("b"), Some(0));
    }

    #[test]
    fn test_nfa_zero_or_more() {
        let mut nfa = literal('a');
        nfa.zero_or_more();
        assert_eq!(nfa.states().len(), 4);
        assert_eq!(nfa.start_state(), StateID::new(2));
        assert_eq!(nfa.end_state(), StateID::new(3));
        assert_eq!(nfa.longest_prefix("aaab"), Some(3));
        assert_eq!(nfa.longest_prefix(""), Some(0));
    }

    #[test]
    fn test_nfa_validate() {
        let mut nfa = literal('a');
        nfa.zero_or_more();
        nfa.alternation(literal('b'));
        assert_eq!(nfa.validate(), Ok(()));

        let mut dangling = literal('a');
        dangling.add_epsilon_transition(StateID::new(1), StateID::new(7));
        assert!(dangling.validate().unwrap_err().contains("transition to 7"));

        let mut end_out_of_range = literal('a');
        end_out_of_range.set_end_state(StateID::new(2));
        assert!(end_out_of_range.validate().is_err());

        let mut unsorted = Nfa::new();
        let end_state = unsorted.new_state();
        unsorted.set_end_state(end_state);
        unsorted.add_transition(
            StateID::new(0),
            CharacterClass(vec![('x', 'z'), ('a', 'c')]),
            end_state,
        );
        assert!(unsorted.validate().unwrap_err().contains("character class"));
    }

    #[test]
    fn test_nfa_offset_states() {
        let mut nfa = literal('a');
        nfa.offset_states(10);
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.start_state(), StateID::new(10));
        assert_eq!(nfa.end_state(), StateID::new(11));
    }
}
