//! Grammar and parse table of arithmetic expressions.
//!
//! ```text
//! Additive       := Additive ("+" | "-") Multiplicative | Multiplicative
//! Multiplicative := Multiplicative ("*" | "/") Power | Power
//! Power          := Primary "**" Power | Primary
//! Primary        := INT | "(" Additive ")"
//! ```

use crate::{
    lexer::{self, Lexeme},
    syntax::{BinOp, Expr, Symbol},
};
use lalrun::{Grammar, GrammarDefError, ParseError, ParseTable, Parser};
use std::sync::OnceLock;

pub type SyntaxError = ParseError<Lexeme, Symbol, anyhow::Error>;

fn binary(op: BinOp) -> impl Fn(Vec<Expr>) -> Expr + Send + Sync + 'static {
    move |args| match <[Expr; 3]>::try_from(args) {
        Ok([lhs, Expr::Punct, rhs]) => Expr::binary(op, lhs, rhs),
        args => {
            tracing::error!(?args, "unexpected operands for {}", op);
            Expr::Error
        }
    }
}

pub fn grammar() -> Result<Grammar<Symbol, Expr>, GrammarDefError> {
    use Symbol::*;

    Grammar::define(|g| {
        g.rule_with(Additive, [Additive, Plus, Multiplicative], binary(BinOp::Add))?;
        g.rule_with(Additive, [Additive, Minus, Multiplicative], binary(BinOp::Sub))?;
        g.rule(Additive, [Multiplicative])?;
        g.rule_with(Multiplicative, [Multiplicative, Star, Power], binary(BinOp::Mul))?;
        g.rule_with(Multiplicative, [Multiplicative, Slash, Power], binary(BinOp::Div))?;
        g.rule(Multiplicative, [Power])?;
        g.rule_with(Power, [Primary, StarStar, Power], binary(BinOp::Pow))?;
        g.rule(Power, [Primary])?;
        g.rule(Primary, [Int])?;
        g.rule_with(Primary, [LParen, Additive, RParen], |args| {
            match <[Expr; 3]>::try_from(args) {
                Ok([Expr::Punct, expr, Expr::Punct]) => Expr::paren(expr),
                args => {
                    tracing::error!(?args, "unexpected contents of parentheses");
                    Expr::Error
                }
            }
        })?;
        g.start_symbol(Additive)
    })
}

/// The LALR(1) table of [`grammar`].
#[rustfmt::skip]
pub fn table() -> ParseTable<Symbol> {
    use Symbol::*;

    const AFTER_POWER: [Symbol; 6] = [RParen, Plus, Minus, Star, Slash, Eof];
    const AFTER_PRIMARY: [Symbol; 7] = [RParen, Plus, Minus, Star, Slash, StarStar, Eof];

    let mut t = ParseTable::new();

    // states expecting an operand
    for state in [0, 2, 8, 9, 10, 15, 16] {
        t.set_shift(state, Int, 1).set_shift(state, LParen, 2);
    }
    t.set_goto(0, Additive, 3).set_goto(0, Multiplicative, 4)
        .set_goto(0, Power, 5).set_goto(0, Primary, 6);
    t.set_goto(2, Additive, 7).set_goto(2, Multiplicative, 4)
        .set_goto(2, Power, 5).set_goto(2, Primary, 6);
    t.set_goto(8, Multiplicative, 12).set_goto(8, Power, 5).set_goto(8, Primary, 6);
    t.set_goto(15, Multiplicative, 17).set_goto(15, Power, 5).set_goto(15, Primary, 6);
    t.set_goto(9, Power, 13).set_goto(9, Primary, 6);
    t.set_goto(16, Power, 18).set_goto(16, Primary, 6);
    t.set_goto(10, Power, 14).set_goto(10, Primary, 6);

    for symbol in AFTER_PRIMARY {
        t.set_reduce(1, symbol, 9);
        t.set_reduce(11, symbol, 10);
    }

    t.set_shift(3, Plus, 8).set_shift(3, Minus, 15).set_accept(3, Eof);
    t.set_shift(7, RParen, 11).set_shift(7, Plus, 8).set_shift(7, Minus, 15);

    // Multiplicative with a lookahead of `*` or `/`
    for (state, rule) in [(4, 3), (12, 1), (17, 2)] {
        t.set_reduce(state, RParen, rule).set_reduce(state, Plus, rule)
            .set_reduce(state, Minus, rule).set_shift(state, Star, 9)
            .set_shift(state, Slash, 16).set_reduce(state, Eof, rule);
    }

    for symbol in AFTER_POWER {
        t.set_reduce(5, symbol, 6);
        t.set_reduce(13, symbol, 4);
        t.set_reduce(18, symbol, 5);
        t.set_reduce(14, symbol, 7);
    }

    for symbol in [RParen, Plus, Minus, Star, Slash] {
        t.set_reduce(6, symbol, 8);
    }
    t.set_shift(6, StarStar, 10).set_reduce(6, Eof, 8);

    t
}

/// Return the shared parser, building it on first use.
pub fn parser() -> anyhow::Result<&'static Parser<Symbol, Expr>> {
    static PARSER: OnceLock<Parser<Symbol, Expr>> = OnceLock::new();

    if let Some(parser) = PARSER.get() {
        return Ok(parser);
    }
    let grammar = grammar()?;
    let table = table();
    table.check(&grammar)?;
    Ok(PARSER.get_or_init(|| Parser::new(grammar, table).end_of_input(Symbol::Eof)))
}

pub fn parse(parser: &Parser<Symbol, Expr>, input: &str) -> Result<Expr, SyntaxError> {
    let span = tracing::trace_span!("parse", input);
    let _entered = span.enter();

    let parsed = parser.try_parse(lexer::lexer(input))?;
    tracing::trace!("parsed: {}", parsed);
    Ok(parsed)
}
