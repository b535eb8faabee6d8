#![forbid(missing_docs)]
//! The `lexgen` crate compiles lexical specifications into lexer models.
//! A lexer model consists of named lexer states, each with an ordered list of rules that pair an
//! automaton with the actions to execute on a match. The model is persisted so that a runtime
//! lexer can load it without compiling the specification again.

/// Module with error definitions
mod errors;
pub use errors::{LexGenError, LexGenErrorKind, Result, SerializationError};

/// Module for several ID types.
mod ids;

/// The automaton module contains the matcher a rule is compiled into.
mod automaton;
pub use automaton::Automaton;

/// Module with the actions of rules.
mod action;
pub use action::{compose_actions, Action, NO_TOKEN};

/// Module with the parsed form of a specification.
mod specification;
pub use specification::{LexerSpecification, RuleDescription};

/// The reader module reads the text of a specification.
mod reader;
pub use reader::read_specification;

/// Module with the lexer rule type.
mod rule;
pub use rule::Rule;

/// Module with the lexer state type.
mod state;
pub use state::State;

/// Module with the lexer model and its builder.
mod model;
pub use model::{LexerModel, LexerModelBuilder};

/// The compiler module folds rule descriptions into a lexer model.
mod compiler;
pub use compiler::{compile_lexer_model, generate_lexer_model};

/// Module that persists and loads lexer models.
mod serializer;
pub use serializer::{load_model, persist_model, read_model, write_model, DEFAULT_OUTPUT};

/// Module with conversion to graphviz dot format
#[cfg(feature = "dot")]
mod dot;
#[cfg(feature = "dot")]
pub use dot::render_to;
