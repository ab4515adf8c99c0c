//! Token abstraction.

/// A trait for abstracting tokens produced by a lexer.
pub trait Token<S> {
    /// The semantic value carried by this token.
    type Value;

    /// Return the terminal symbol used for looking up the parse table.
    fn symbol(&self) -> &S;

    /// Consume this token into the value pushed onto the parser's value stack.
    fn into_value(self) -> Self::Value;
}

/// A plain token consisting of a symbol, a value and an optional line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonToken<S, V> {
    pub symbol: S,
    pub value: V,
    pub line: Option<usize>,
}

impl<S, V> CommonToken<S, V> {
    pub fn new(symbol: S, value: V) -> Self {
        Self {
            symbol,
            value,
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl<S, V> Token<S> for CommonToken<S, V> {
    type Value = V;

    fn symbol(&self) -> &S {
        &self.symbol
    }

    fn into_value(self) -> V {
        self.value
    }
}
