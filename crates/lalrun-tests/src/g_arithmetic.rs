//! Arithmetic expressions with `+`, `*`, right-associative `**` and parentheses.
//!
//! ```text
//! Additive       := Additive "+" Multiplicative | Multiplicative
//! Multiplicative := Multiplicative "*" Power | Power
//! Power          := Primary "**" Power | Primary
//! Primary        := INT | "(" Additive ")"
//! ```

use lalrun::{Grammar, ParseTable, Parser};

pub fn grammar() -> Grammar<&'static str, i64> {
    Grammar::<&'static str, i64>::define(|g| {
        g.rule_with("Additive", ["Additive", "+", "Multiplicative"], |args| {
            args[0] + args[2]
        })?;
        g.rule("Additive", ["Multiplicative"])?;
        g.rule_with("Multiplicative", ["Multiplicative", "*", "Power"], |args| {
            args[0] * args[2]
        })?;
        g.rule("Multiplicative", ["Power"])?;
        g.rule_with("Power", ["Primary", "**", "Power"], |args| {
            args[0].pow(args[2] as u32)
        })?;
        g.rule("Power", ["Primary"])?;
        g.rule("Primary", ["INT"])?;
        g.rule_with("Primary", ["(", "Additive", ")"], |args| args[1])?;
        g.start_symbol("Additive")
    })
    .expect("the arithmetic grammar is well-formed")
}

/// The LALR(1) table of [`grammar`], terminated by `$eof`.
#[rustfmt::skip]
pub fn table() -> ParseTable<&'static str> {
    let mut t = ParseTable::new();
    t.set_shift(0, "INT", 1).set_shift(0, "(", 2)
        .set_goto(0, "Additive", 3).set_goto(0, "Multiplicative", 4)
        .set_goto(0, "Power", 5).set_goto(0, "Primary", 6);
    t.set_reduce(1, ")", 7).set_reduce(1, "+", 7).set_reduce(1, "*", 7)
        .set_reduce(1, "**", 7).set_reduce(1, "$eof", 7);
    t.set_shift(2, "INT", 1).set_shift(2, "(", 2)
        .set_goto(2, "Additive", 7).set_goto(2, "Multiplicative", 4)
        .set_goto(2, "Power", 5).set_goto(2, "Primary", 6);
    t.set_shift(3, "+", 8).set_accept(3, "$eof");
    t.set_reduce(4, ")", 2).set_reduce(4, "+", 2).set_shift(4, "*", 9)
        .set_reduce(4, "$eof", 2);
    t.set_reduce(5, ")", 4).set_reduce(5, "+", 4).set_reduce(5, "*", 4)
        .set_reduce(5, "$eof", 4);
    t.set_reduce(6, ")", 6).set_reduce(6, "+", 6).set_reduce(6, "*", 6)
        .set_shift(6, "**", 10).set_reduce(6, "$eof", 6);
    t.set_shift(7, ")", 11).set_shift(7, "+", 8);
    t.set_shift(8, "INT", 1).set_shift(8, "(", 2)
        .set_goto(8, "Multiplicative", 12).set_goto(8, "Power", 5)
        .set_goto(8, "Primary", 6);
    t.set_shift(9, "INT", 1).set_shift(9, "(", 2)
        .set_goto(9, "Power", 13).set_goto(9, "Primary", 6);
    t.set_shift(10, "INT", 1).set_shift(10, "(", 2)
        .set_goto(10, "Power", 14).set_goto(10, "Primary", 6);
    t.set_reduce(11, ")", 8).set_reduce(11, "+", 8).set_reduce(11, "*", 8)
        .set_reduce(11, "**", 8).set_reduce(11, "$eof", 8);
    t.set_reduce(12, ")", 1).set_reduce(12, "+", 1).set_shift(12, "*", 9)
        .set_reduce(12, "$eof", 1);
    t.set_reduce(13, ")", 3).set_reduce(13, "+", 3).set_reduce(13, "*", 3)
        .set_reduce(13, "$eof", 3);
    t.set_reduce(14, ")", 5).set_reduce(14, "+", 5).set_reduce(14, "*", 5)
        .set_reduce(14, "$eof", 5);
    t
}

pub fn parser() -> Parser<&'static str, i64> {
    Parser::new(grammar(), table())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{self, LexError, EOF};
    use lalrun::{Action, ParseError, StateID};
    use std::{cell::Cell, sync::Arc, thread};

    fn eval(parser: &Parser<&'static str, i64>, input: &str) -> i64 {
        parser
            .try_parse(lexer::arithmetic_with_eof(input))
            .unwrap_or_else(|err| panic!("failed to parse {:?}: {}", input, err))
    }

    #[test]
    fn table_is_consistent_with_grammar() {
        let grammar = grammar();
        let table = table();
        table.check(&grammar).unwrap();
        assert_eq!(table.num_states(), 15);
        eprintln!("{}", grammar);
        eprintln!("table:\n---\n{}", table.display(&grammar));
    }

    #[test]
    fn uses_callbacks_for_reductions() {
        assert_eq!(eval(&parser(), "6 ** (1 + 1) ** 2 * (5 + 4)"), 11664);
    }

    #[test]
    fn precedence_and_associativity() {
        let parser = parser();
        assert_eq!(eval(&parser, "1 + 2 * 3"), 7);
        assert_eq!(eval(&parser, "(1 + 2) * 3"), 9);
        assert_eq!(eval(&parser, "2 * 3 ** 2"), 18);
        assert_eq!(eval(&parser, "2 ** 3 ** 2"), 512);
        assert_eq!(eval(&parser, "((((7))))"), 7);
        assert_eq!(eval(&parser, "1 + 2 + 3 * 4 * 5"), 63);
    }

    #[test]
    fn unexpected_token() {
        let err = parser()
            .try_parse(lexer::arithmetic_with_eof("6 ** ( * 5"))
            .unwrap_err();
        let err = match err {
            ParseError::UnexpectedToken(err) => err,
            err => panic!("unexpected error: {}", err),
        };
        assert_eq!(err.token().symbol, "*");
        assert_eq!(err.expected(), ["INT", "("]);
        assert_eq!(err.state, StateID::new(2));
        assert!(
            err.to_string().ends_with("expected one of [\"INT\", \"(\"]"),
            "{}",
            err
        );
    }

    #[test]
    fn unexpected_end_token() {
        let err = parser()
            .try_parse(lexer::arithmetic_with_eof("(1 + 2"))
            .unwrap_err();
        let err = err.unexpected_token().unwrap();
        assert_eq!(err.token().symbol, EOF);
        assert_eq!(err.expected(), [")", "+"]);
    }

    #[test]
    fn lexer_error() {
        let err = parser()
            .try_parse(lexer::arithmetic_with_eof("1 +\n 2 $"))
            .unwrap_err();
        assert_matches!(
            err,
            ParseError::Lexer(LexError { ref text, line: 2 }) if text == "$"
        );
    }

    #[test]
    fn missing_end_token() {
        let err = parser()
            .try_parse(lexer::arithmetic("1 + 2"))
            .unwrap_err();
        assert_matches!(
            err,
            ParseError::UnexpectedEoi { state, ref expected }
                if state == StateID::new(1) && expected[..] == [")", "+", "*", "**", EOF]
        );
    }

    #[test]
    fn synthesized_end_token() {
        let parser = parser().end_of_input(EOF);
        assert_eq!(
            parser
                .try_parse(lexer::arithmetic("6 ** (1 + 1) ** 2 * (5 + 4)"))
                .unwrap(),
            11664
        );

        let err = parser.try_parse(lexer::arithmetic("(1 + 2")).unwrap_err();
        assert_matches!(
            err,
            ParseError::UnexpectedEoi { state, ref expected }
                if state == StateID::new(7) && expected[..] == [")", "+"]
        );
    }

    #[test]
    fn accept_leaves_remaining_tokens_unread() {
        let pulled = Cell::new(0);
        let tokens: Vec<_> = lexer::arithmetic_with_eof("1 + 2")
            .chain(lexer::arithmetic("* 3 )"))
            .collect();
        let total = tokens.len();

        let value = parser()
            .try_parse(tokens.into_iter().inspect(|_| pulled.set(pulled.get() + 1)))
            .unwrap();
        assert_eq!(value, 3);
        assert_eq!(pulled.get(), 4);
        assert_eq!(total, 7);
    }

    #[test]
    fn shift_consumes_exactly_one_token() {
        let parser = parser();
        let input = "6 ** (1 + 1) ** 2 * (5 + 4)";
        let num_tokens = lexer::arithmetic_with_eof(input).count();

        let pulled = Cell::new(0);
        let mut shifts = 0;
        let mut reduces = 0;
        let mut accepted = false;
        let value = parser
            .try_parse_with(
                lexer::arithmetic_with_eof(input).inspect(|_| pulled.set(pulled.get() + 1)),
                |step| {
                    assert_eq!(step.states, step.values + 1, "{:?}", step);
                    match step.action {
                        Action::Shift(next) => {
                            shifts += 1;
                            assert_eq!(shifts, pulled.get());
                            assert_ne!(next, StateID::INITIAL);
                        }
                        Action::Reduce(..) => {
                            reduces += 1;
                            // the lookahead is never consumed by a reduction.
                            assert_eq!(shifts + 1, pulled.get());
                        }
                        Action::Accept => {
                            accepted = true;
                            assert_eq!(step.values, 1);
                        }
                    }
                },
            )
            .unwrap();

        assert_eq!(value, 11664);
        assert!(accepted);
        assert_eq!(shifts, num_tokens - 1);
        assert_eq!(pulled.get(), num_tokens);
        assert!(reduces > 0);
    }

    #[test]
    fn sequential_parses_do_not_share_state() {
        let parser = parser();
        assert!(parser
            .try_parse(lexer::arithmetic_with_eof("6 ** ( * 5"))
            .is_err());
        assert_eq!(eval(&parser, "2 * (3 + 4)"), 14);
        assert!(parser.try_parse(lexer::arithmetic("2 * (3")).is_err());
        assert_eq!(eval(&parser, "6 ** (1 + 1) ** 2 * (5 + 4)"), 11664);
    }

    #[test]
    fn concurrent_parses_share_one_parser() {
        let parser = Arc::new(parser());
        let inputs = [
            ("6 ** (1 + 1) ** 2 * (5 + 4)", 11664),
            ("1 + 2 * 3", 7),
            ("2 ** 3 ** 2", 512),
            ("(1 + 2) * (3 + 4)", 21),
        ];

        thread::scope(|s| {
            for (input, expected) in inputs {
                let parser = Arc::clone(&parser);
                s.spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(eval(&parser, input), expected);
                    }
                });
            }
        });
    }

    #[test]
    fn cached_table_round_trip() {
        let table = table();
        let json = serde_json::to_string(&table).unwrap();
        let restored: ParseTable<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.num_states(), table.num_states());
        let expected: Vec<_> = restored.expected(StateID::new(2)).cloned().collect();
        assert_eq!(expected, ["INT", "("]);
        for (&state, row) in &table.states {
            for (symbol, action) in &row.actions {
                assert_eq!(restored.action(state, &symbol.to_string()), Some(*action));
            }
            for (symbol, goto) in &row.gotos {
                assert_eq!(restored.goto(state, &symbol.to_string()), Some(*goto));
            }
        }
    }

    #[test]
    fn traced_parse() {
        use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt};

        let _guard = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::TRACE)
            .with_test_writer()
            .finish()
            .set_default();

        let parser = parser();
        assert_eq!(eval(&parser, "(1 + 2) ** 2"), 9);
        assert!(parser.try_parse(lexer::arithmetic("1 +")).is_err());
    }
}
