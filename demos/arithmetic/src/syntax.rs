//! Syntax definition.

use anyhow::Context as _;
use std::fmt;

/// The grammar symbols of arithmetic expressions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    // terminals
    Int,
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    StarStar,
    Eof,

    // nonterminals
    Additive,
    Multiplicative,
    Power,
    Primary,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        })
    }
}

/// The maximum nesting depth of a syntax tree.
///
/// Evaluating, printing and dropping a tree recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// The value stored in the parser's value stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(i64),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        depth: usize,
    },
    Paren {
        expr: Box<Expr>,
        depth: usize,
    },
    /// Carried by operators and parentheses.
    Punct,
    Error,
    /// Replaces a subtree nested deeper than [`MAX_DEPTH`].
    TooDeep,
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        let depth = lhs.depth().max(rhs.depth()) + 1;
        if depth > MAX_DEPTH {
            return Self::TooDeep;
        }
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            depth,
        }
    }

    pub fn paren(expr: Expr) -> Self {
        let depth = expr.depth() + 1;
        if depth > MAX_DEPTH {
            return Self::TooDeep;
        }
        Self::Paren {
            expr: Box::new(expr),
            depth,
        }
    }

    /// Return the nesting depth of this tree, without traversing it.
    pub fn depth(&self) -> usize {
        match self {
            Self::Binary { depth, .. } | Self::Paren { depth, .. } => *depth,
            Self::TooDeep => MAX_DEPTH + 1,
            _ => 1,
        }
    }

    /// Evaluate the expression, failing on overflow and division by zero.
    pub fn eval(&self) -> anyhow::Result<i64> {
        match self {
            Self::Num(n) => Ok(*n),
            Self::Paren { expr, .. } => expr.eval(),
            Self::Binary { op, lhs, rhs, .. } => {
                let (l, r) = (lhs.eval()?, rhs.eval()?);
                let value = match op {
                    BinOp::Add => l.checked_add(r),
                    BinOp::Sub => l.checked_sub(r),
                    BinOp::Mul => l.checked_mul(r),
                    BinOp::Div => {
                        anyhow::ensure!(r != 0, "division by zero: {}", self);
                        l.checked_div(r)
                    }
                    BinOp::Pow => {
                        let exp = u32::try_from(r)
                            .with_context(|| format!("invalid exponent: {}", self))?;
                        l.checked_pow(exp)
                    }
                };
                value.with_context(|| format!("arithmetic overflow: {}", self))
            }
            Self::TooDeep => {
                anyhow::bail!("expression is nested deeper than {} levels", MAX_DEPTH)
            }
            Self::Punct | Self::Error => anyhow::bail!("malformed syntax tree: {}", self),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Binary { op, lhs, rhs, .. } => write!(f, "({} {} {})", op, lhs, rhs),
            Self::Paren { expr, .. } => write!(f, "({})", expr),
            Self::Punct => write!(f, "<punct>"),
            Self::Error => write!(f, "<error>"),
            Self::TooDeep => write!(f, "<too deep>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(op: BinOp, lhs: i64, rhs: i64) -> Expr {
        Expr::binary(op, Expr::Num(lhs), Expr::Num(rhs))
    }

    #[test]
    fn eval_checks_arithmetic() {
        assert_eq!(binary(BinOp::Sub, 1, 3).eval().unwrap(), -2);
        assert_eq!(binary(BinOp::Pow, 2, 10).eval().unwrap(), 1024);

        let err = binary(BinOp::Div, 1, 0).eval().unwrap_err();
        assert_eq!(err.to_string(), "division by zero: (/ 1 0)");

        let err = binary(BinOp::Pow, 2, 64).eval().unwrap_err();
        assert_eq!(err.to_string(), "arithmetic overflow: (** 2 64)");

        let err = binary(BinOp::Pow, 2, -1).eval().unwrap_err();
        assert_eq!(err.to_string(), "invalid exponent: (** 2 -1)");

        assert!(Expr::Error.eval().is_err());
    }

    #[test]
    fn nesting_is_limited() {
        let mut expr = Expr::Num(1);
        for _ in 1..MAX_DEPTH {
            expr = Expr::paren(expr);
        }
        assert_eq!(expr.depth(), MAX_DEPTH);
        assert_eq!(expr.eval().unwrap(), 1);

        let expr = Expr::binary(BinOp::Add, expr, Expr::Num(2));
        assert_eq!(expr, Expr::TooDeep);
        let expr = Expr::paren(expr);
        assert_eq!(expr, Expr::TooDeep);
        assert_eq!(
            expr.eval().unwrap_err().to_string(),
            format!("expression is nested deeper than {} levels", MAX_DEPTH)
        );
    }
}
