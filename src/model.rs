//! The compiled lexer model and the builder that assembles it.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize, Serializer};

use crate::{ids::LexerStateID, LexGenError, LexGenErrorKind, Result, Rule, State};

/// Collects rules into lazily created states.
///
/// The builder is consumed by [`LexerModelBuilder::build`], which yields the frozen
/// [`LexerModel`].
#[derive(Debug, Default)]
pub struct LexerModelBuilder {
    states: Vec<State>,
    index: BTreeMap<String, LexerStateID>,
}

impl LexerModelBuilder {
    /// Create a new builder without states.
    pub fn new() -> Self {
        LexerModelBuilder::default()
    }

    /// Append a rule to the named state, creating the state on first use.
    pub fn add_rule(&mut self, state_name: &str, rule: Rule) {
        let id = match self.index.get(state_name) {
            Some(id) => *id,
            None => {
                debug!("Creating lexer state '{}'", state_name);
                let id = LexerStateID::new(self.states.len());
                self.states.push(State::new(state_name));
                self.index.insert(state_name.to_string(), id);
                id
            }
        };
        self.states[id].add_rule(rule);
    }

    /// The state with the given name if a rule has been added to it.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.index.get(name).map(|id| &self.states[*id])
    }

    /// Freeze the collected states into a model.
    ///
    /// The start state is the first of the declared state names.
    /// # Errors
    /// `NoLexerStates` if no state names are declared, `UnknownStartState` if the first declared
    /// state has no rules, and `UnknownTargetState` if a rule changes to a state without rules.
    pub fn build<S>(self, state_names: &[S]) -> Result<LexerModel>
    where
        S: AsRef<str>,
    {
        let start_state = state_names
            .first()
            .ok_or_else(|| LexGenError::new(LexGenErrorKind::NoLexerStates))?;
        LexerModel::from_parts(self.states, self.index, start_state.as_ref())
    }
}

/// The compiled lexer: all states and the state the lexer starts in.
///
/// States refer to each other by name only. The start state is stored as the position of its
/// entry, so [`LexerModel::start_state`] always returns the very instance that
/// [`LexerModel::state`] returns for its name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SerializedModel")]
pub struct LexerModel {
    states: Vec<State>,
    index: BTreeMap<String, LexerStateID>,
    start_state: LexerStateID,
}

impl LexerModel {
    fn from_parts(
        states: Vec<State>,
        index: BTreeMap<String, LexerStateID>,
        start_state: &str,
    ) -> Result<Self> {
        let start_state = *index.get(start_state).ok_or_else(|| {
            LexGenError::new(LexGenErrorKind::UnknownStartState(start_state.to_string()))
        })?;
        for state in &states {
            for target in state.rules().iter().flat_map(Rule::target_states) {
                if !index.contains_key(target) {
                    return Err(LexGenError::new(LexGenErrorKind::UnknownTargetState {
                        state: state.name().to_string(),
                        target: target.to_string(),
                    }));
                }
            }
        }
        Ok(LexerModel {
            states,
            index,
            start_state,
        })
    }

    /// The state the lexer starts in.
    pub fn start_state(&self) -> &State {
        &self.states[self.start_state]
    }

    /// The state with the given name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.index.get(name).map(|id| &self.states[*id])
    }

    /// All states in the order they were first referenced.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// All states keyed by their name, in name order.
    pub fn states_by_name(&self) -> impl Iterator<Item = (&str, &State)> {
        self.index
            .iter()
            .map(|(name, id)| (name.as_str(), &self.states[*id]))
    }

    /// The position of the named state in [`LexerModel::states`].
    #[cfg_attr(not(feature = "dot"), allow(dead_code))]
    pub(crate) fn state_id(&self, name: &str) -> Option<LexerStateID> {
        self.index.get(name).copied()
    }

    #[cfg_attr(not(feature = "dot"), allow(dead_code))]
    pub(crate) fn start_state_id(&self) -> LexerStateID {
        self.start_state
    }
}

/// The persisted form of a model. The states come first, the start state follows as a name
/// that is resolved against them when loading.
#[derive(Serialize)]
struct SerializedModelRef<'a> {
    states: &'a [State],
    start_state: &'a str,
}

#[derive(Deserialize)]
struct SerializedModel {
    states: Vec<State>,
    start_state: String,
}

impl Serialize for LexerModel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedModelRef {
            states: &self.states,
            start_state: self.start_state().name(),
        }
        .serialize(serializer)
    }
}

impl TryFrom<SerializedModel> for LexerModel {
    type Error = LexGenError;

    fn try_from(model: SerializedModel) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (i, state) in model.states.iter().enumerate() {
            if index
                .insert(state.name().to_string(), LexerStateID::new(i))
                .is_some()
            {
                return Err(LexGenError::new(LexGenErrorKind::InvalidModel(format!(
                    "duplicate state '{}'",
                    state.name()
                ))));
            }
        }
        for state in &model.states {
            for rule in state.rules() {
                rule.automaton().validate().map_err(|reason| {
                    LexGenError::new(LexGenErrorKind::InvalidModel(format!(
                        "rule '{}' of state '{}': {}",
                        rule.regex().escape_default(),
                        state.name(),
                        reason
                    )))
                })?;
            }
        }
        LexerModel::from_parts(model.states, index, &model.start_state)
    }
}
