//! An arithmetic expression evaluator built on the `lalrun` runtime.

pub mod lexer;
pub mod parser;
pub mod syntax;
