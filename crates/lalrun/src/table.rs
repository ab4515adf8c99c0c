//! Parse table definition.

use crate::{
    error::TableError,
    grammar::{Grammar, RuleID},
    types::Map,
    util::display_fn,
};
use std::{fmt, hash::Hash};

/// The number to identify the state of LR automaton.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct StateID {
    raw: u32,
}

impl StateID {
    /// The state where every parse starts.
    pub const INITIAL: Self = Self::new(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.raw
    }
}

impl From<u32> for StateID {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// The action that the LR automaton in a state performs on a particular
/// lookahead symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Consume the lookahead token and transition to the specified state.
    Shift(StateID),

    /// Reduce by the specified production rule, without consuming the lookahead.
    Reduce(RuleID),

    Accept,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "S: serde::Serialize + Eq + Hash",
        deserialize = "S: serde::Deserialize<'de> + Eq + Hash"
    ))
)]
pub struct ParseTableRow<S> {
    pub actions: Map<S, Action>,
    pub gotos: Map<S, StateID>,
}

impl<S> Default for ParseTableRow<S> {
    fn default() -> Self {
        Self {
            actions: Map::default(),
            gotos: Map::default(),
        }
    }
}

/// The precomputed action/goto table of a LALR(1) automaton.
///
/// Absence of an action entry means that the lookahead symbol is a syntax
/// error in that state. The table is never mutated while parsing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "S: serde::Serialize + Eq + Hash",
        deserialize = "S: serde::Deserialize<'de> + Eq + Hash"
    ))
)]
pub struct ParseTable<S> {
    pub states: Map<StateID, ParseTableRow<S>>,
}

impl<S> Default for ParseTable<S> {
    fn default() -> Self {
        Self {
            states: Map::default(),
        }
    }
}

impl<S> ParseTable<S>
where
    S: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn row_mut(&mut self, state: StateID) -> &mut ParseTableRow<S> {
        self.states.entry(state).or_default()
    }

    /// Register an action, returning the one it replaced.
    pub fn set_action(
        &mut self,
        state: impl Into<StateID>,
        symbol: S,
        action: Action,
    ) -> Option<Action> {
        self.row_mut(state.into()).actions.insert(symbol, action)
    }

    pub fn set_shift(
        &mut self,
        state: impl Into<StateID>,
        symbol: S,
        next: impl Into<StateID>,
    ) -> &mut Self {
        self.set_action(state, symbol, Action::Shift(next.into()));
        self
    }

    pub fn set_reduce(
        &mut self,
        state: impl Into<StateID>,
        symbol: S,
        rule: impl Into<RuleID>,
    ) -> &mut Self {
        self.set_action(state, symbol, Action::Reduce(rule.into()));
        self
    }

    pub fn set_accept(&mut self, state: impl Into<StateID>, symbol: S) -> &mut Self {
        self.set_action(state, symbol, Action::Accept);
        self
    }

    pub fn set_goto(
        &mut self,
        state: impl Into<StateID>,
        symbol: S,
        next: impl Into<StateID>,
    ) -> &mut Self {
        self.row_mut(state.into()).gotos.insert(symbol, next.into());
        self
    }

    /// Return the action corresponding to the specified state and lookahead symbol.
    #[inline]
    pub fn action(&self, state: StateID, symbol: &S) -> Option<Action> {
        self.states.get(&state)?.actions.get(symbol).copied()
    }

    /// Return the state to transition after reducing to `symbol` in `state`.
    #[inline]
    pub fn goto(&self, state: StateID, symbol: &S) -> Option<StateID> {
        self.states.get(&state)?.gotos.get(symbol).copied()
    }

    /// Return the symbols having an action entry in the specified state,
    /// in the order they were registered.
    pub fn expected(&self, state: StateID) -> impl Iterator<Item = &S> + '_ {
        self.states
            .get(&state)
            .into_iter()
            .flat_map(|row| row.actions.keys())
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Verify that every reduce entry refers to a rule that the engine is able
    /// to reduce by, and that gotos are keyed by nonterminals of the grammar.
    pub fn check<V>(&self, grammar: &Grammar<S, V>) -> Result<(), TableError<S>>
    where
        S: Clone + fmt::Debug,
    {
        let nonterminals = grammar.nonterminals();
        for (&state, row) in &self.states {
            if let Some(symbol) = row.gotos.keys().find(|s| !nonterminals.contains(*s)) {
                return Err(TableError::UnknownNonterminal {
                    state,
                    symbol: symbol.clone(),
                });
            }
            for action in row.actions.values() {
                let id = match action {
                    Action::Reduce(id) => *id,
                    _ => continue,
                };
                let rule = match grammar.rule(id) {
                    Some(rule) => rule,
                    None => return Err(TableError::UnknownRule { state, rule: id }),
                };
                let arity = rule.components().len();
                if rule.callback().is_none() && arity != 1 {
                    return Err(TableError::MissingCallback { rule: id, arity });
                }
            }
        }
        Ok(())
    }

    pub fn display<'g, V>(&'g self, g: &'g Grammar<S, V>) -> impl fmt::Display + 'g
    where
        S: Clone + fmt::Debug,
    {
        display_fn(move |f| {
            for (i, (id, row)) in self.states.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }

                writeln!(f, "#### State {}", id)?;
                writeln!(f, "## actions")?;
                for (symbol, action) in &row.actions {
                    match action {
                        Action::Shift(n) => writeln!(f, "- {:?} => shift({})", symbol, n)?,
                        Action::Reduce(r) => match g.rule(*r) {
                            Some(rule) => {
                                writeln!(f, "- {:?} => reduce({})", symbol, rule.display())?
                            }
                            None => writeln!(f, "- {:?} => reduce(<unknown {}>)", symbol, r)?,
                        },
                        Action::Accept => writeln!(f, "- {:?} => accept", symbol)?,
                    }
                }

                writeln!(f, "## gotos")?;
                for (symbol, goto) in &row.gotos {
                    writeln!(f, "- {:?} => goto({})", symbol, goto)?;
                }
            }
            Ok(())
        })
    }
}

/// The component that derives a parse table from a grammar.
///
/// The runtime does not analyze grammars by itself; this is the hook through
/// which an LALR(1) construction algorithm is plugged in.
pub trait Analyzer<S, V> {
    type Error;

    fn analyze(&self, grammar: &Grammar<S, V>) -> Result<ParseTable<S>, Self::Error>;
}

impl<S, V, F, E> Analyzer<S, V> for F
where
    F: Fn(&Grammar<S, V>) -> Result<ParseTable<S>, E>,
{
    type Error = E;

    fn analyze(&self, grammar: &Grammar<S, V>) -> Result<ParseTable<S>, Self::Error> {
        (self)(grammar)
    }
}
