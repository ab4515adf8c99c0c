//! Runtime for table-driven LALR(1) parsers.
//!
//! A [`Parser`] couples a [`Grammar`] (the production rules and their
//! semantic callbacks) with a precomputed [`ParseTable`], and drives a
//! shift-reduce automaton over a stream of tokens to synthesize a single
//! value for the start symbol.

pub mod error;
pub mod grammar;
pub mod parser;
pub mod table;
pub mod token;
pub mod types;
mod util;

pub use crate::{
    error::{ParseError, TableError, UnexpectedToken},
    grammar::{Callback, Grammar, GrammarDef, GrammarDefError, Rule, RuleID},
    parser::{Parser, Step},
    table::{Action, Analyzer, ParseTable, ParseTableRow, StateID},
    token::{CommonToken, Token},
};
