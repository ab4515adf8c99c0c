//! Fixture grammars and precomputed parse tables used to exercise the runtime.

#[allow(unused_macros)]
macro_rules! assert_matches {
    ($($t:tt)*) => { assert!(matches!($($t)*)) };
}

pub mod g_arithmetic;
pub mod g_sexpr;
pub mod lexer;
