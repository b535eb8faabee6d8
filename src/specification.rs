/// One lexer rule as it is written in the specification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleDescription {
    /// The lexer state the rule is active in.
    pub active_state: String,
    /// The regex of the rule, with regular definitions already expanded.
    pub regex: String,
    /// Either [`NO_TOKEN`](crate::NO_TOKEN) or the token class the rule declares.
    pub action_name: String,
    /// The lines following the action name, in their original order.
    pub extra_lines: Vec<String>,
}

impl RuleDescription {
    /// Create a new rule description without extra lines.
    pub fn new<S, R, A>(active_state: S, regex: R, action_name: A) -> Self
    where
        S: Into<String>,
        R: Into<String>,
        A: Into<String>,
    {
        RuleDescription {
            active_state: active_state.into(),
            regex: regex.into(),
            action_name: action_name.into(),
            extra_lines: Vec::new(),
        }
    }

    /// Add extra parameter lines to the rule description.
    pub fn with_extra_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_lines.extend(lines.into_iter().map(Into::into));
        self
    }
}

/// The parsed content of a lexical specification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LexerSpecification {
    /// The regular definition lines, verbatim.
    pub regular_definitions: Vec<String>,
    /// The declared lexer states. The first one is the start state.
    pub state_names: Vec<String>,
    /// The declared token classes.
    pub token_names: Vec<String>,
    /// The rules in declaration order.
    pub rules: Vec<RuleDescription>,
}
