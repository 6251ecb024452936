//! Lookahead dispatch for the `term` production.
//!
//! A term is the only production that needs two tokens to decide which
//! alternative applies. The decision is a pure function of the current token
//! and the one after it, so it can be checked without a parser.

use crate::lexer::Token;
use jack_ast::TokenKind;

/// Binary operators accepted between terms of an expression.
pub const BINARY_OPS: [&str; 9] = ["+", "-", "*", "/", "&", "|", "<", ">", "="];

/// `^` and `#` are shift-left and shift-right.
pub const UNARY_OPS: [&str; 4] = ["-", "~", "^", "#"];

pub const KEYWORD_CONSTANTS: [&str; 4] = ["true", "false", "null", "this"];

/// The alternative of `term` selected by lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermShape {
    /// Integer, string or keyword constant.
    Constant,
    /// A bare variable reference.
    Variable,
    /// `name '[' expression ']'`
    ArrayAccess,
    /// `name '(' expressionList ')'`
    Call,
    /// `name '.' name '(' expressionList ')'`
    QualifiedCall,
    /// `'(' expression ')'`
    Parenthesized,
    /// `unaryOp term`
    Unary,
}

/// Symbols that may follow an identifier, and the term shape each selects.
/// Any other follower makes the identifier a variable reference.
const IDENTIFIER_FOLLOWERS: [(&str, TermShape); 3] = [
    ("[", TermShape::ArrayAccess),
    ("(", TermShape::Call),
    (".", TermShape::QualifiedCall),
];

/// Picks the term alternative starting at `current`, or `None` when
/// `current` cannot begin a term and must be left unconsumed.
pub fn classify_term(current: &Token, next: Option<&Token>) -> Option<TermShape> {
    match current.kind {
        TokenKind::IntegerConstant | TokenKind::StringConstant => Some(TermShape::Constant),
        TokenKind::Keyword if KEYWORD_CONSTANTS.contains(&current.text.as_str()) => Some(TermShape::Constant),
        TokenKind::Identifier => {
            let shape = next
                .filter(|token| token.kind == TokenKind::Symbol)
                .and_then(|token| {
                    IDENTIFIER_FOLLOWERS.iter().find(|(symbol, _)| *symbol == token.text).map(|(_, shape)| *shape)
                })
                .unwrap_or(TermShape::Variable);
            Some(shape)
        }
        TokenKind::Symbol if current.text == "(" => Some(TermShape::Parenthesized),
        TokenKind::Symbol if UNARY_OPS.contains(&current.text.as_str()) => Some(TermShape::Unary),
        _ => None,
    }
}

pub fn is_binary_op(token: &Token) -> bool {
    token.kind == TokenKind::Symbol && BINARY_OPS.contains(&token.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jack_types::{SourceLocation, Span};

    fn token(kind: TokenKind, text: &str) -> Token {
        Token { kind, text: text.to_string(), span: Span::default(), location: SourceLocation::default() }
    }

    fn ident(text: &str) -> Token {
        token(TokenKind::Identifier, text)
    }

    fn symbol(text: &str) -> Token {
        token(TokenKind::Symbol, text)
    }

    #[test]
    fn test_constants() {
        assert_eq!(classify_term(&token(TokenKind::IntegerConstant, "5"), None), Some(TermShape::Constant));
        assert_eq!(classify_term(&token(TokenKind::StringConstant, "s"), None), Some(TermShape::Constant));
        for keyword in KEYWORD_CONSTANTS {
            assert_eq!(classify_term(&token(TokenKind::Keyword, keyword), None), Some(TermShape::Constant));
        }
    }

    #[test]
    fn test_identifier_followers() {
        let name = ident("a");
        assert_eq!(classify_term(&name, Some(&symbol("["))), Some(TermShape::ArrayAccess));
        assert_eq!(classify_term(&name, Some(&symbol("("))), Some(TermShape::Call));
        assert_eq!(classify_term(&name, Some(&symbol("."))), Some(TermShape::QualifiedCall));
        assert_eq!(classify_term(&name, Some(&symbol("+"))), Some(TermShape::Variable));
        assert_eq!(classify_term(&name, Some(&symbol(")"))), Some(TermShape::Variable));
        assert_eq!(classify_term(&name, None), Some(TermShape::Variable));
    }

    #[test]
    fn test_follower_must_be_a_symbol() {
        // A string constant "(" is not the symbol `(`.
        let next = token(TokenKind::StringConstant, "(");
        assert_eq!(classify_term(&ident("a"), Some(&next)), Some(TermShape::Variable));
    }

    #[test]
    fn test_grouping_and_unary() {
        assert_eq!(classify_term(&symbol("("), None), Some(TermShape::Parenthesized));
        for op in UNARY_OPS {
            assert_eq!(classify_term(&symbol(op), Some(&ident("x"))), Some(TermShape::Unary));
        }
    }

    #[test]
    fn test_not_a_term() {
        assert_eq!(classify_term(&symbol(")"), None), None);
        assert_eq!(classify_term(&symbol(";"), None), None);
        assert_eq!(classify_term(&symbol("+"), None), None);
        assert_eq!(classify_term(&token(TokenKind::Keyword, "let"), None), None);
    }

    #[test]
    fn test_binary_ops() {
        assert!(is_binary_op(&symbol("<")));
        assert!(is_binary_op(&symbol("=")));
        assert!(!is_binary_op(&symbol("~")));
        assert!(!is_binary_op(&token(TokenKind::StringConstant, "+")));
    }
}
