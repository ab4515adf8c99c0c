//! Grammar types.

use crate::{types::Set, util::display_fn};
use std::{fmt, hash::Hash, sync::Arc};

/// The 1-based index of a production rule, as referenced by reduce actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct RuleID {
    raw: u32,
}

impl RuleID {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.raw
    }

    /// Position of this rule in the grammar's rule list.
    fn index(self) -> Option<usize> {
        (self.raw as usize).checked_sub(1)
    }
}

impl From<u32> for RuleID {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for RuleID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

/// The semantic action attached to a production rule.
///
/// It receives the values of the right-hand side in left-to-right order and
/// returns the value of the produced nonterminal.
pub struct Callback<V> {
    f: Arc<dyn Fn(Vec<V>) -> V + Send + Sync>,
}

impl<V> Callback<V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<V>) -> V + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    pub fn call(&self, args: Vec<V>) -> V {
        (self.f)(args)
    }
}

impl<V> Clone for Callback<V> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
        }
    }
}

impl<V> fmt::Debug for Callback<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// The type that represents a production rule in grammar.
#[derive(Debug)]
pub struct Rule<S, V> {
    id: RuleID,
    name: S,
    components: Vec<S>,
    callback: Option<Callback<V>>,
}

impl<S, V> Rule<S, V> {
    pub fn id(&self) -> RuleID {
        self.id
    }

    /// Return the nonterminal produced by this rule.
    pub fn name(&self) -> &S {
        &self.name
    }

    /// Return the right-hand side of this production.
    pub fn components(&self) -> &[S] {
        &self.components[..]
    }

    pub fn callback(&self) -> Option<&Callback<V>> {
        self.callback.as_ref()
    }

    // `"LHS := R1 R2 R3"`
    pub fn display(&self) -> impl fmt::Display + '_
    where
        S: fmt::Debug,
    {
        display_fn(|f| {
            write!(f, "{:?} :=", self.name)?;
            if self.components.is_empty() {
                return f.write_str(" @empty");
            }
            for symbol in &self.components {
                write!(f, " {:?}", symbol)?;
            }
            Ok(())
        })
    }
}

/// The set of production rules that the parser reduces by.
#[derive(Debug)]
pub struct Grammar<S, V> {
    rules: Vec<Rule<S, V>>,
    start_symbol: S,
}

impl<S, V> Grammar<S, V>
where
    S: Clone + Eq + Hash,
{
    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef<S, V>) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef {
            rules: vec![],
            start: None,
        };
        f(&mut def)?;
        def.end()
    }

    /// Return the rule corresponding to the specified ID, if any.
    pub fn rule(&self, id: RuleID) -> Option<&Rule<S, V>> {
        self.rules.get(id.index()?)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<S, V>> + '_ {
        self.rules.iter()
    }

    pub fn start_symbol(&self) -> &S {
        &self.start_symbol
    }

    /// Return the symbols appearing on the left-hand side of some rule,
    /// in order of first appearance.
    pub fn nonterminals(&self) -> Set<S> {
        self.rules.iter().map(|rule| rule.name.clone()).collect()
    }
}

impl<S, V> fmt::Display for Grammar<S, V>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## start: {:?}", self.start_symbol)?;
        writeln!(f, "## rules:")?;
        for rule in &self.rules {
            write!(f, "{} {}", rule.id, rule.display())?;
            if rule.callback.is_some() {
                f.write_str(" (callback)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef<S, V> {
    rules: Vec<Rule<S, V>>,
    start: Option<S>,
}

impl<S, V> GrammarDef<S, V>
where
    S: Clone + Eq + Hash,
{
    /// Specify a production rule without a semantic action.
    ///
    /// Reducing by such a rule passes the value of its single component
    /// through, so it should have exactly one component.
    pub fn rule<I>(&mut self, name: S, components: I) -> Result<RuleID, GrammarDefError>
    where
        I: IntoIterator<Item = S>,
    {
        self.push_rule(name, components.into_iter().collect(), None)
    }

    /// Specify a production rule with the semantic action to run on reduction.
    pub fn rule_with<I, F>(
        &mut self,
        name: S,
        components: I,
        callback: F,
    ) -> Result<RuleID, GrammarDefError>
    where
        I: IntoIterator<Item = S>,
        F: Fn(Vec<V>) -> V + Send + Sync + 'static,
    {
        self.push_rule(
            name,
            components.into_iter().collect(),
            Some(Callback::new(callback)),
        )
    }

    /// Specify the start symbol for this grammar.
    pub fn start_symbol(&mut self, symbol: S) -> Result<(), GrammarDefError> {
        self.start.replace(symbol);
        Ok(())
    }

    fn push_rule(
        &mut self,
        name: S,
        components: Vec<S>,
        callback: Option<Callback<V>>,
    ) -> Result<RuleID, GrammarDefError> {
        if let Some(dup) = self
            .rules
            .iter()
            .find(|rule| rule.name == name && rule.components == components)
        {
            return Err(GrammarDefError::DuplicateRule { existing: dup.id });
        }

        let raw = u32::try_from(self.rules.len() + 1).map_err(|_| GrammarDefError::TooManyRules)?;
        let id = RuleID::new(raw);
        self.rules.push(Rule {
            id,
            name,
            components,
            callback,
        });

        Ok(id)
    }

    fn end(self) -> Result<Grammar<S, V>, GrammarDefError> {
        // 指定されていない場合は最初の規則の左辺を用いる
        let start_symbol = match self.start {
            Some(start) => start,
            None => self
                .rules
                .first()
                .map(|rule| rule.name.clone())
                .ok_or(GrammarDefError::Empty)?,
        };

        if !self.rules.iter().any(|rule| rule.name == start_symbol) {
            return Err(GrammarDefError::UnproductiveStart);
        }

        Ok(Grammar {
            rules: self.rules,
            start_symbol,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("empty grammar")]
    Empty,

    #[error("duplicate production rule detected (same as rule {})", .existing)]
    DuplicateRule { existing: RuleID },

    #[error("the start symbol has no associated production rule")]
    UnproductiveStart,

    #[error("too many production rules")]
    TooManyRules,
}
