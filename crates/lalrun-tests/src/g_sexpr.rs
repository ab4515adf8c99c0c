//! Whitespace-separated lists of atoms and parenthesized sublists.
//!
//! ```text
//! List := @empty | List Item
//! Item := ATOM | "(" List ")"
//! ```

use crate::lexer::{self, LexError};
use lalrun::{CommonToken, Grammar, ParseTable, Parser};

#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    Atom(String),
    List(Vec<Sexpr>),
    /// The value carried by parentheses and the end-of-input terminal.
    Punct,
}

impl Sexpr {
    pub fn atom(s: &str) -> Self {
        Self::Atom(s.to_owned())
    }
}

pub fn grammar() -> Grammar<&'static str, Sexpr> {
    Grammar::<&'static str, Sexpr>::define(|g| {
        g.rule_with("List", [], |_| Sexpr::List(vec![]))?;
        g.rule_with("List", ["List", "Item"], |args| {
            let mut args = args.into_iter();
            match (args.next(), args.next()) {
                (Some(Sexpr::List(mut items)), Some(item)) => {
                    items.push(item);
                    Sexpr::List(items)
                }
                args => unreachable!("unexpected arguments: {:?}", args),
            }
        })?;
        g.rule("Item", ["ATOM"])?;
        g.rule_with("Item", ["(", "List", ")"], |mut args| args.swap_remove(1))?;
        Ok(())
    })
    .expect("the s-expression grammar is well-formed")
}

#[rustfmt::skip]
pub fn table() -> ParseTable<&'static str> {
    let mut t = ParseTable::new();
    t.set_reduce(0, "ATOM", 1).set_reduce(0, "(", 1).set_reduce(0, "$eof", 1)
        .set_goto(0, "List", 1);
    t.set_shift(1, "ATOM", 2).set_shift(1, "(", 3).set_accept(1, "$eof")
        .set_goto(1, "Item", 4);
    t.set_reduce(2, "ATOM", 3).set_reduce(2, "(", 3).set_reduce(2, ")", 3)
        .set_reduce(2, "$eof", 3);
    t.set_reduce(3, "ATOM", 1).set_reduce(3, "(", 1).set_reduce(3, ")", 1)
        .set_goto(3, "List", 5);
    t.set_reduce(4, "ATOM", 2).set_reduce(4, "(", 2).set_reduce(4, ")", 2)
        .set_reduce(4, "$eof", 2);
    t.set_shift(5, "ATOM", 2).set_shift(5, "(", 3).set_shift(5, ")", 6)
        .set_goto(5, "Item", 4);
    t.set_reduce(6, "ATOM", 4).set_reduce(6, "(", 4).set_reduce(6, ")", 4)
        .set_reduce(6, "$eof", 4);
    t
}

pub fn parser() -> Parser<&'static str, Sexpr> {
    Parser::new(grammar(), table())
}

/// Tokenize `input`, turning each atom into a [`Sexpr::Atom`].
pub fn tokens(
    input: &str,
) -> impl Iterator<Item = Result<CommonToken<&'static str, Sexpr>, LexError>> + '_ {
    lexer::sexpr(input).map(|token| {
        token.map(|t| {
            let value = match t.symbol {
                "ATOM" => Sexpr::Atom(t.value),
                _ => Sexpr::Punct,
            };
            CommonToken {
                symbol: t.symbol,
                value,
                line: t.line,
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::EOF;
    use lalrun::{Action, ParseError, RuleID, StateID};

    #[test]
    fn table_is_consistent_with_grammar() {
        table().check(&grammar()).unwrap();
    }

    #[test]
    fn nested_lists() {
        let value = parser().try_parse(tokens("a (b c) () d")).unwrap();
        assert_eq!(
            value,
            Sexpr::List(vec![
                Sexpr::atom("a"),
                Sexpr::List(vec![Sexpr::atom("b"), Sexpr::atom("c")]),
                Sexpr::List(vec![]),
                Sexpr::atom("d"),
            ])
        );
    }

    #[test]
    fn deeply_nested() {
        let value = parser().try_parse(tokens("((((x))))")).unwrap();
        let mut expected = Sexpr::atom("x");
        for _ in 0..4 {
            expected = Sexpr::List(vec![expected]);
        }
        assert_eq!(value, Sexpr::List(vec![expected]));
    }

    #[test]
    fn empty_input_reduces_empty_rule() {
        let mut steps = vec![];
        let value = parser()
            .try_parse_with(tokens(""), |step| steps.push(*step))
            .unwrap();
        assert_eq!(value, Sexpr::List(vec![]));
        assert_eq!(
            steps,
            [
                lalrun::Step {
                    state: StateID::INITIAL,
                    action: Action::Reduce(RuleID::new(1)),
                    states: 2,
                    values: 1,
                },
                lalrun::Step {
                    state: StateID::new(1),
                    action: Action::Accept,
                    states: 2,
                    values: 1,
                },
            ]
        );
    }

    #[test]
    fn unbalanced_close() {
        let err = parser().try_parse(tokens("a ) b")).unwrap_err();
        let err = err.unexpected_token().unwrap();
        assert_eq!(err.token().symbol, ")");
        assert_eq!(err.state, StateID::new(1));
        assert_eq!(err.expected(), ["ATOM", "(", EOF]);
    }

    #[test]
    fn unclosed_list() {
        let err = parser().try_parse(tokens("(a")).unwrap_err();
        assert_eq!(err.expected().unwrap(), ["ATOM", "(", ")"]);
        let err = err.unexpected_token().unwrap();
        assert_eq!(err.token().symbol, EOF);
        assert_eq!(err.state, StateID::new(5));
    }

    #[test]
    fn lexer_error() {
        let err = parser().try_parse(tokens("a\n(b #)")).unwrap_err();
        assert_matches!(err, ParseError::Lexer(LexError { line: 2, .. }));
        assert_eq!(
            err.to_string(),
            "from lexer: unexpected character \"#\" at line 2"
        );
    }

    #[test]
    fn display_grammar() {
        let text = grammar().to_string();
        assert!(text.contains("## start: \"List\""), "{}", text);
        assert!(text.contains("#1 \"List\" := @empty (callback)"), "{}", text);
        assert!(text.contains("#3 \"Item\" := \"ATOM\"\n"), "{}", text);
    }
}
