//! Error types reported by the parser.

use crate::{grammar::RuleID, table::StateID, util::display_list};
use std::fmt;

/// The lookahead token has no entry in the action table of the current state.
#[derive(Debug, thiserror::Error)]
#[error(
    "unexpected token {:?} in state {}; expected one of [{}]",
    .token,
    .state,
    display_list(.expected)
)]
pub struct UnexpectedToken<T: fmt::Debug, S: fmt::Debug> {
    /// The offending token.
    pub token: T,
    /// The automaton state in which the token was rejected.
    pub state: StateID,
    /// The symbols having an action entry in `state`, in table order.
    pub expected: Vec<S>,
}

impl<T: fmt::Debug, S: fmt::Debug> UnexpectedToken<T, S> {
    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn expected(&self) -> &[S] {
        &self.expected[..]
    }
}

/// Inconsistency between the parse table and the grammar.
///
/// These errors are caused by a broken table construction rather than by the
/// input and are never reported as syntax errors.
#[derive(Debug, thiserror::Error)]
pub enum TableError<S: fmt::Debug> {
    #[error("state {} reduces by {}, which is not defined in the grammar", .state, .rule)]
    UnknownRule { state: StateID, rule: RuleID },

    #[error("rule {} has {} components but no callback", .rule, .arity)]
    MissingCallback { rule: RuleID, arity: usize },

    #[error("no goto entry for {:?} in state {}", .symbol, .state)]
    MissingGoto { state: StateID, symbol: S },

    #[error("state {} has a goto entry for {:?}, which is not a nonterminal", .state, .symbol)]
    UnknownNonterminal { state: StateID, symbol: S },

    #[error(
        "reducing by {} pops {} values but only {} are on the stack",
        .rule,
        .arity,
        .available
    )]
    StackUnderflow {
        rule: RuleID,
        arity: usize,
        available: usize,
    },

    #[error("accepted with {} values on the stack", .values)]
    InvalidAccept { values: usize },

    #[error("state {} shifts the end of input", .state)]
    ShiftAtEnd { state: StateID },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError<T: fmt::Debug, S: fmt::Debug, L: fmt::Display> {
    #[error("from lexer: {}", .0)]
    Lexer(L),

    #[error("{}", .0)]
    UnexpectedToken(UnexpectedToken<T, S>),

    #[error(
        "unexpected end of input in state {}; expected one of [{}]",
        .state,
        display_list(.expected)
    )]
    UnexpectedEoi { state: StateID, expected: Vec<S> },

    #[error("malformed parse table: {}", .0)]
    Table(TableError<S>),
}

impl<T: fmt::Debug, S: fmt::Debug, L: fmt::Display> ParseError<T, S, L> {
    pub fn unexpected_token(&self) -> Option<&UnexpectedToken<T, S>> {
        match self {
            Self::UnexpectedToken(err) => Some(err),
            _ => None,
        }
    }

    /// Return the expected symbols, if this is a syntax error.
    pub fn expected(&self) -> Option<&[S]> {
        match self {
            Self::UnexpectedToken(err) => Some(err.expected()),
            Self::UnexpectedEoi { expected, .. } => Some(&expected[..]),
            _ => None,
        }
    }
}

impl<T: fmt::Debug, S: fmt::Debug, L: fmt::Display> From<TableError<S>> for ParseError<T, S, L> {
    fn from(err: TableError<S>) -> Self {
        Self::Table(err)
    }
}
