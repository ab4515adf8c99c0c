use crate::syntax::{Expr, Symbol};
use lalrun::CommonToken;
use logos::Logos;

// 入力のトークン列
#[derive(Debug, Copy, Clone, Logos, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
enum Token {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("**")]
    StarStar,

    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Num(i64),
}

pub type Lexeme = CommonToken<Symbol, Expr>;

pub fn lexer(input: &str) -> impl Iterator<Item = anyhow::Result<Lexeme>> + '_ {
    let mut lexer = Token::lexer(input);
    let (mut offset, mut line) = (0, 1);
    std::iter::from_fn(move || {
        let token = lexer.next()?;
        let start = lexer.span().start;
        line += input[offset..start].matches('\n').count();
        offset = start;
        let (symbol, value) = match token {
            Ok(Token::LParen) => (Symbol::LParen, Expr::Punct),
            Ok(Token::RParen) => (Symbol::RParen, Expr::Punct),
            Ok(Token::Plus) => (Symbol::Plus, Expr::Punct),
            Ok(Token::Minus) => (Symbol::Minus, Expr::Punct),
            Ok(Token::Star) => (Symbol::Star, Expr::Punct),
            Ok(Token::Slash) => (Symbol::Slash, Expr::Punct),
            Ok(Token::StarStar) => (Symbol::StarStar, Expr::Punct),
            Ok(Token::Num(n)) => (Symbol::Int, Expr::Num(n)),
            Err(()) => {
                return Some(Err(anyhow::anyhow!(
                    "lexer error: unexpected {:?} at line {}",
                    lexer.slice(),
                    line
                )))
            }
        };
        Some(Ok(CommonToken::new(symbol, value).at_line(line)))
    })
}
