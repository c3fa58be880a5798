//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize an operator query
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(CompileError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t\n  ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("+ - * / % **"),
            vec![Token::Plus, Token::Minus, Token::Star, Token::Slash, Token::Percent, Token::StarStar]
        );
    }

    #[test]
    fn test_power_is_one_token() {
        assert_eq!(
            kinds("a**b"),
            vec![Token::Ident("a".into()), Token::StarStar, Token::Ident("b".into())]
        );
    }

    #[test]
    fn test_tokenize_binary_query() {
        assert_eq!(
            kinds("left: Short - right: AtomicInteger!"),
            vec![
                Token::Ident("left".into()),
                Token::Colon,
                Token::Ident("Short".into()),
                Token::Minus,
                Token::Ident("right".into()),
                Token::Colon,
                Token::Ident("AtomicInteger".into()),
                Token::Bang,
            ]
        );
    }

    #[test]
    fn test_as_keyword_and_qualified_names() {
        assert_eq!(
            kinds("x: AtomicLong? as java.util.UUID"),
            vec![
                Token::Ident("x".into()),
                Token::Colon,
                Token::Ident("AtomicLong".into()),
                Token::Question,
                Token::As,
                Token::Ident("java.util.UUID".into()),
            ]
        );
        // keywords only match whole words
        assert_eq!(kinds("asValue"), vec![Token::Ident("asValue".into())]);
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("a as byte").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 1));
        assert_eq!(tokens[1].1, Span::new(2, 4));
        assert_eq!(tokens[2].1, Span::new(5, 9));
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(kinds("int // trailing"), vec![Token::Ident("int".into())]);
    }

    #[test]
    fn test_tokenize_unexpected_character_error() {
        let err = tokenize("a & b").unwrap_err();
        assert!(err.message().contains("unexpected character"));
        assert_eq!(err.span(), Some(Span::new(2, 3)));
    }
}
