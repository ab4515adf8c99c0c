use lalrun::CommonToken;
use logos::Logos;

/// The terminal symbol appended after the last token.
pub const EOF: &str = "$eof";

#[derive(Debug, Copy, Clone, Logos, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
enum ArithToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("+")]
    Plus,

    #[token("*")]
    Star,

    #[token("**")]
    StarStar,

    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Int(i64),
}

#[derive(Debug, Copy, Clone, Logos, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
enum SexprToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Atom,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unexpected character {:?} at line {}", .text, .line)]
pub struct LexError {
    pub text: String,
    pub line: usize,
}

pub type ArithLexeme = CommonToken<&'static str, i64>;
pub type SexprLexeme = CommonToken<&'static str, String>;

/// Tracks the line number of monotonically increasing offsets.
struct LineCounter {
    offset: usize,
    line: usize,
}

impl LineCounter {
    fn new() -> Self {
        Self { offset: 0, line: 1 }
    }

    fn line_at(&mut self, input: &str, offset: usize) -> usize {
        self.line += input[self.offset..offset].matches('\n').count();
        self.offset = offset;
        self.line
    }
}

/// Split an arithmetic expression into tokens, without the end-of-input terminal.
pub fn arithmetic(input: &str) -> impl Iterator<Item = Result<ArithLexeme, LexError>> + '_ {
    let mut lexer = ArithToken::lexer(input);
    let mut lines = LineCounter::new();
    std::iter::from_fn(move || {
        let token = lexer.next()?;
        let line = lines.line_at(input, lexer.span().start);
        let (symbol, value) = match token {
            Ok(ArithToken::LParen) => ("(", 0),
            Ok(ArithToken::RParen) => (")", 0),
            Ok(ArithToken::Plus) => ("+", 0),
            Ok(ArithToken::Star) => ("*", 0),
            Ok(ArithToken::StarStar) => ("**", 0),
            Ok(ArithToken::Int(n)) => ("INT", n),
            Err(()) => {
                return Some(Err(LexError {
                    text: lexer.slice().to_owned(),
                    line,
                }))
            }
        };
        Some(Ok(CommonToken::new(symbol, value).at_line(line)))
    })
}

/// Same as [`arithmetic`], followed by the end-of-input terminal.
pub fn arithmetic_with_eof(
    input: &str,
) -> impl Iterator<Item = Result<ArithLexeme, LexError>> + '_ {
    let last_line = input.matches('\n').count() + 1;
    arithmetic(input).chain(std::iter::once(Ok(
        CommonToken::new(EOF, 0).at_line(last_line)
    )))
}

/// Split an s-expression list into tokens, followed by the end-of-input terminal.
pub fn sexpr(input: &str) -> impl Iterator<Item = Result<SexprLexeme, LexError>> + '_ {
    let mut lexer = SexprToken::lexer(input);
    let mut lines = LineCounter::new();
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let token = match lexer.next() {
            Some(token) => token,
            None => {
                done = true;
                return Some(Ok(CommonToken::new(EOF, String::new())));
            }
        };
        let line = lines.line_at(input, lexer.span().start);
        let symbol = match token {
            Ok(SexprToken::LParen) => "(",
            Ok(SexprToken::RParen) => ")",
            Ok(SexprToken::Atom) => "ATOM",
            Err(()) => {
                return Some(Err(LexError {
                    text: lexer.slice().to_owned(),
                    line,
                }))
            }
        };
        Some(Ok(CommonToken::new(symbol, lexer.slice().to_owned()).at_line(line)))
    })
}
