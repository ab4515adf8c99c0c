//! The LALR(1) parser engine.

use crate::{
    error::{ParseError, TableError, UnexpectedToken},
    grammar::{Grammar, Rule},
    table::{Action, Analyzer, ParseTable, StateID},
    token::Token,
};
use std::{convert::Infallible, fmt, hash::Hash};

/// The parser driven based on a precomputed parse table.
///
/// A `Parser` is immutable: every call to [`parse`](Parser::parse) runs on
/// its own stacks, so a single instance can be reused across many parses and
/// shared between threads.
#[derive(Debug)]
pub struct Parser<S, V> {
    grammar: Grammar<S, V>,
    table: ParseTable<S>,
    end_of_input: Option<S>,
}

/// A transition performed by the automaton, reported to the observer passed
/// to [`Parser::try_parse_with`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Step {
    /// The state in which the action was looked up.
    pub state: StateID,
    pub action: Action,
    /// The depth of the state stack after the action.
    pub states: usize,
    /// The depth of the value stack after the action.
    pub values: usize,
}

impl<S, V> Parser<S, V>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Create an instance of `Parser` using the specified grammar and parse table.
    pub fn new(grammar: Grammar<S, V>, table: ParseTable<S>) -> Self {
        Self {
            grammar,
            table,
            end_of_input: None,
        }
    }

    /// Create an instance of `Parser`, deriving the parse table from the
    /// grammar with the specified analyzer.
    pub fn with_analyzer<A>(grammar: Grammar<S, V>, analyzer: &A) -> Result<Self, A::Error>
    where
        A: Analyzer<S, V> + ?Sized,
    {
        let table = analyzer.analyze(&grammar)?;
        Ok(Self::new(grammar, table))
    }

    /// Treat the exhaustion of the token source as a lookahead of `symbol`.
    ///
    /// Without this, the token source itself must yield the end-of-input
    /// terminal that leads the table to accept.
    pub fn end_of_input(mut self, symbol: S) -> Self {
        self.end_of_input = Some(symbol);
        self
    }

    pub fn grammar(&self) -> &Grammar<S, V> {
        &self.grammar
    }

    pub fn table(&self) -> &ParseTable<S> {
        &self.table
    }

    /// Parse the specified tokens and return the value of the start symbol.
    pub fn parse<I>(&self, tokens: I) -> Result<V, ParseError<I::Item, S, Infallible>>
    where
        I: IntoIterator,
        I::Item: Token<S, Value = V> + fmt::Debug,
    {
        self.try_parse(tokens.into_iter().map(Ok))
    }

    /// Parse the tokens from a fallible source, such as a lexer.
    pub fn try_parse<I, T, E>(&self, tokens: I) -> Result<V, ParseError<T, S, E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
        T: Token<S, Value = V> + fmt::Debug,
        E: fmt::Display,
    {
        self.try_parse_with(tokens, |_| ())
    }

    /// Same as [`try_parse`](Parser::try_parse), but also reports every
    /// transition of the automaton to `on_step`.
    pub fn try_parse_with<I, T, E, F>(
        &self,
        tokens: I,
        mut on_step: F,
    ) -> Result<V, ParseError<T, S, E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
        T: Token<S, Value = V> + fmt::Debug,
        E: fmt::Display,
        F: FnMut(&Step),
    {
        let span = tracing::trace_span!("parse");
        let _entered = span.enter();

        let mut stacks = Stacks::new();

        for token in tokens {
            let token = token.map_err(ParseError::Lexer)?;

            match self.reduce_until_decided(&mut stacks, token.symbol(), &mut on_step)? {
                Decision::Shift(next) => {
                    let state = stacks.current();
                    tracing::trace!("shift: {:?} ({} -> {})", token.symbol(), state, next);
                    stacks.push(next, token.into_value());
                    on_step(&stacks.step(state, Action::Shift(next)));
                }

                Decision::Accept => {
                    tracing::trace!("accept: lookahead = {:?}", token.symbol());
                    return Ok(self.accept(stacks, &mut on_step)?);
                }

                Decision::Reject => {
                    let state = stacks.current();
                    tracing::debug!("unexpected token {:?} in state {}", token, state);
                    return Err(ParseError::UnexpectedToken(UnexpectedToken {
                        token,
                        state,
                        expected: self.expected(state),
                    }));
                }
            }
        }

        let eoi = match self.end_of_input {
            Some(ref eoi) => eoi,
            None => {
                let state = stacks.current();
                tracing::debug!("token source exhausted in state {}", state);
                return Err(ParseError::UnexpectedEoi {
                    state,
                    expected: self.expected(state),
                });
            }
        };

        tracing::trace!("end of input");
        match self.reduce_until_decided(&mut stacks, eoi, &mut on_step)? {
            Decision::Shift(..) => Err(ParseError::Table(TableError::ShiftAtEnd {
                state: stacks.current(),
            })),
            Decision::Accept => Ok(self.accept(stacks, &mut on_step)?),
            Decision::Reject => {
                let state = stacks.current();
                tracing::debug!("unexpected end of input in state {}", state);
                Err(ParseError::UnexpectedEoi {
                    state,
                    expected: self.expected(state),
                })
            }
        }
    }

    /// Perform the reductions selected by `lookahead` until the table either
    /// shifts, accepts or has no entry for it.
    fn reduce_until_decided<F>(
        &self,
        stacks: &mut Stacks<V>,
        lookahead: &S,
        on_step: &mut F,
    ) -> Result<Decision, TableError<S>>
    where
        F: FnMut(&Step),
    {
        loop {
            let current = stacks.current();
            let id = match self.table.action(current, lookahead) {
                Some(Action::Shift(next)) => return Ok(Decision::Shift(next)),
                Some(Action::Accept) => return Ok(Decision::Accept),
                Some(Action::Reduce(id)) => id,
                None => return Ok(Decision::Reject),
            };

            let rule = match self.grammar.rule(id) {
                Some(rule) => rule,
                None => {
                    return Err(TableError::UnknownRule {
                        state: current,
                        rule: id,
                    })
                }
            };
            let value = stacks.reduce(rule)?;

            let base = stacks.current();
            let next = self
                .table
                .goto(base, rule.name())
                .ok_or_else(|| TableError::MissingGoto {
                    state: base,
                    symbol: rule.name().clone(),
                })?;
            tracing::trace!("reduce: {} ({} -> {})", rule.display(), base, next);
            stacks.push(next, value);

            on_step(&stacks.step(current, Action::Reduce(id)));
        }
    }

    fn accept<F>(&self, mut stacks: Stacks<V>, on_step: &mut F) -> Result<V, TableError<S>>
    where
        F: FnMut(&Step),
    {
        on_step(&stacks.step(stacks.current(), Action::Accept));

        let values = stacks.values.len();
        match stacks.values.pop() {
            Some(value) if values == 1 => Ok(value),
            _ => Err(TableError::InvalidAccept { values }),
        }
    }

    fn expected(&self, state: StateID) -> Vec<S> {
        self.table.expected(state).cloned().collect()
    }
}

enum Decision {
    Shift(StateID),
    Accept,
    Reject,
}

/// The state and value stacks owned by a single parse.
struct Stacks<V> {
    states: Vec<StateID>,
    values: Vec<V>,
}

impl<V> Stacks<V> {
    fn new() -> Self {
        Self {
            states: vec![StateID::INITIAL],
            values: vec![],
        }
    }

    #[inline]
    fn current(&self) -> StateID {
        // The state stack is never empty: reductions pop at most as many
        // states as there are values.
        debug_assert!(!self.states.is_empty(), "empty state stack");
        self.states.last().copied().unwrap_or(StateID::INITIAL)
    }

    fn push(&mut self, state: StateID, value: V) {
        self.states.push(state);
        self.values.push(value);
        debug_assert_eq!(self.states.len(), self.values.len() + 1);
    }

    /// Pop the right-hand side of `rule` and compute the value of its left-hand side.
    fn reduce<S>(&mut self, rule: &Rule<S, V>) -> Result<V, TableError<S>>
    where
        S: fmt::Debug,
    {
        let arity = rule.components().len();
        let available = self.values.len();
        if arity > available {
            return Err(TableError::StackUnderflow {
                rule: rule.id(),
                arity,
                available,
            });
        }
        let callback = match rule.callback() {
            Some(callback) => Some(callback),
            None if arity == 1 => None,
            None => {
                return Err(TableError::MissingCallback {
                    rule: rule.id(),
                    arity,
                })
            }
        };

        let args = self.values.split_off(available - arity);
        self.states.truncate(self.states.len() - arity);

        match callback {
            Some(callback) => Ok(callback.call(args)),
            None => args.into_iter().next().ok_or(TableError::StackUnderflow {
                rule: rule.id(),
                arity,
                available,
            }),
        }
    }

    fn step(&self, state: StateID, action: Action) -> Step {
        Step {
            state,
            action,
            states: self.states.len(),
            values: self.values.len(),
        }
    }
}
