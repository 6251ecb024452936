use crate::lexer::{Lexer, Token};
use crate::term::{classify_term, is_binary_op, TermShape};
use jack_ast::{Event, NodeKind, TokenKind};
use jack_types::{JackError, Result};
use std::fmt::{Display, Formatter};

const CLASS_VAR_KEYWORDS: [&str; 2] = ["static", "field"];
const SUBROUTINE_KEYWORDS: [&str; 3] = ["constructor", "function", "method"];
const PRIMITIVE_TYPES: [&str; 3] = ["int", "char", "boolean"];

/// How deeply terms and statement blocks may nest before the parser gives up.
pub const MAX_DEPTH: usize = 256;

/// What `expect` accepts at the current position.
#[derive(Debug, Clone, Copy)]
enum Expected {
    Kind(TokenKind),
    Symbol(&'static str),
    Keyword(&'static str),
    OneOf(&'static [&'static str]),
    /// `int | char | boolean | className`
    Type,
    /// `void` or a type.
    ReturnType,
}

impl Expected {
    fn matches(&self, token: &Token) -> bool {
        match self {
            Expected::Kind(kind) => token.kind == *kind,
            Expected::Symbol(symbol) => token.is_symbol(symbol),
            Expected::Keyword(keyword) => token.is_keyword(keyword),
            Expected::OneOf(keywords) => token.kind == TokenKind::Keyword && keywords.contains(&token.text.as_str()),
            Expected::Type => is_type(token),
            Expected::ReturnType => token.is_keyword("void") || is_type(token),
        }
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Kind(kind) => write!(f, "{}", kind),
            Expected::Symbol(symbol) => write!(f, "symbol `{}`", symbol),
            Expected::Keyword(keyword) => write!(f, "keyword `{}`", keyword),
            Expected::OneOf(keywords) => write!(f, "one of `{}`", keywords.join("`, `")),
            Expected::Type => write!(f, "a type (`int`, `char`, `boolean` or a class name)"),
            Expected::ReturnType => write!(f, "`void` or a type"),
        }
    }
}

fn is_type(token: &Token) -> bool {
    token.kind == TokenKind::Identifier
        || (token.kind == TokenKind::Keyword && PRIMITIVE_TYPES.contains(&token.text.as_str()))
}

/// Recursive-descent parser for one class.
///
/// Each `compile_*` method handles one grammar production: it records an open
/// event, consumes tokens or recurses, then records the matching close event.
/// The parser keeps a two-token window (`curr`, `peek`) over the lexer and
/// pulls a new token only when one is consumed.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    curr: Option<Token>,
    peek: Option<Token>,
    events: Vec<Event>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let curr = lexer.next_token()?;
        let peek = lexer.next_token()?;

        Ok(Self { lexer, curr, peek, events: Vec::new(), depth: 0 })
    }

    pub fn is_eof(&self) -> bool {
        self.curr.is_none()
    }

    /// The lookahead token.
    pub fn current(&self) -> Option<&Token> {
        self.curr.as_ref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn shift(&mut self) -> Result<()> {
        let next = self.lexer.next_token()?;
        self.curr = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    /// Consumes the current token if it satisfies `expected` and records it as
    /// a leaf. This is the only place tokens are consumed.
    fn expect(&mut self, expected: Expected) -> Result<Token> {
        let token = match self.curr.take() {
            Some(token) if expected.matches(&token) => token,
            Some(token) => {
                let error = JackError::unexpected(token.location, expected.to_string(), token.to_string());
                self.curr = Some(token);
                return Err(error);
            }
            None => return Err(JackError::eof(expected.to_string())),
        };

        self.events.push(Event::leaf(token.kind, token.text.clone()));
        self.shift()?;
        Ok(token)
    }

    fn open(&mut self, kind: NodeKind) {
        self.events.push(Event::Open(kind));
    }

    fn close(&mut self, kind: NodeKind) {
        self.events.push(Event::Close(kind));
    }

    fn at_symbol(&self, symbol: &str) -> bool {
        self.curr.as_ref().is_some_and(|token| token.is_symbol(symbol))
    }

    fn at_keyword(&self, keywords: &[&str]) -> bool {
        self.curr
            .as_ref()
            .is_some_and(|token| token.kind == TokenKind::Keyword && keywords.contains(&token.text.as_str()))
    }

    // Paired with `ascend` around every recursive production.
    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        match &self.curr {
            Some(token) if self.depth > MAX_DEPTH => {
                Err(JackError::TooDeep { location: token.location, limit: MAX_DEPTH })
            }
            _ => Ok(()),
        }
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn unexpected(&self, expected: &str) -> JackError {
        match &self.curr {
            Some(token) => JackError::unexpected(token.location, expected, token.to_string()),
            None => JackError::eof(expected),
        }
    }

    // --- Program structure ---

    /// `'class' className '{' classVarDec* subroutineDec* '}'`, and nothing after.
    pub fn compile_class(&mut self) -> Result<()> {
        self.open(NodeKind::Class);
        self.expect(Expected::Keyword("class"))?;
        self.expect(Expected::Kind(TokenKind::Identifier))?;
        self.expect(Expected::Symbol("{"))?;

        while self.at_keyword(&CLASS_VAR_KEYWORDS) {
            self.compile_class_var_dec()?;
        }
        while self.at_keyword(&SUBROUTINE_KEYWORDS) {
            self.compile_subroutine_dec()?;
        }

        self.expect(Expected::Symbol("}"))?;
        if let Some(token) = &self.curr {
            return Err(JackError::TrailingInput { location: token.location, found: token.to_string() });
        }
        self.close(NodeKind::Class);
        Ok(())
    }

    pub fn compile_class_var_dec(&mut self) -> Result<()> {
        self.open(NodeKind::ClassVarDec);
        self.expect(Expected::OneOf(&CLASS_VAR_KEYWORDS))?;
        self.expect(Expected::Type)?;
        self.compile_name_list()?;
        self.expect(Expected::Symbol(";"))?;
        self.close(NodeKind::ClassVarDec);
        Ok(())
    }

    // varName (',' varName)*
    fn compile_name_list(&mut self) -> Result<()> {
        self.expect(Expected::Kind(TokenKind::Identifier))?;
        while self.at_symbol(",") {
            self.expect(Expected::Symbol(","))?;
            self.expect(Expected::Kind(TokenKind::Identifier))?;
        }
        Ok(())
    }

    pub fn compile_subroutine_dec(&mut self) -> Result<()> {
        self.open(NodeKind::SubroutineDec);
        self.expect(Expected::OneOf(&SUBROUTINE_KEYWORDS))?;
        self.expect(Expected::ReturnType)?;
        let name = self.expect(Expected::Kind(TokenKind::Identifier))?;
        self.expect(Expected::Symbol("("))?;
        self.compile_parameter_list()?;
        self.expect(Expected::Symbol(")"))?;
        self.compile_subroutine_body(&name.text)?;
        self.close(NodeKind::SubroutineDec);
        Ok(())
    }

    /// Possibly empty; the enclosing parentheses belong to the caller.
    pub fn compile_parameter_list(&mut self) -> Result<()> {
        self.open(NodeKind::ParameterList);
        if !self.at_symbol(")") {
            self.expect(Expected::Type)?;
            self.expect(Expected::Kind(TokenKind::Identifier))?;
            while self.at_symbol(",") {
                self.expect(Expected::Symbol(","))?;
                self.expect(Expected::Type)?;
                self.expect(Expected::Kind(TokenKind::Identifier))?;
            }
        }
        self.close(NodeKind::ParameterList);
        Ok(())
    }

    /// `'{' varDec* statements '}'`, where the statements must end in `return`.
    pub fn compile_subroutine_body(&mut self, subroutine: &str) -> Result<()> {
        self.open(NodeKind::SubroutineBody);
        self.expect(Expected::Symbol("{"))?;
        while self.at_keyword(&["var"]) {
            self.compile_var_dec()?;
        }

        let returned = self.compile_statements()?;
        if !returned {
            return Err(match &self.curr {
                Some(token) if token.is_symbol("}") => JackError::MissingReturn {
                    location: token.location,
                    subroutine: subroutine.to_string(),
                },
                _ => self.unexpected("a statement"),
            });
        }

        self.expect(Expected::Symbol("}"))?;
        self.close(NodeKind::SubroutineBody);
        Ok(())
    }

    pub fn compile_var_dec(&mut self) -> Result<()> {
        self.open(NodeKind::VarDec);
        self.expect(Expected::Keyword("var"))?;
        self.expect(Expected::Type)?;
        self.compile_name_list()?;
        self.expect(Expected::Symbol(";"))?;
        self.close(NodeKind::VarDec);
        Ok(())
    }

    // --- Statements ---

    /// Compiles statements until a token that cannot start one. A `return`
    /// always ends the sequence; the result tells whether it did.
    pub fn compile_statements(&mut self) -> Result<bool> {
        self.descend()?;
        self.open(NodeKind::Statements);
        let mut returned = false;

        loop {
            let keyword = match &self.curr {
                Some(token) if token.kind == TokenKind::Keyword => token.text.clone(),
                _ => break,
            };
            match keyword.as_str() {
                "let" => self.compile_let()?,
                "if" => self.compile_if()?,
                "while" => self.compile_while()?,
                "do" => self.compile_do()?,
                "return" => {
                    self.compile_return()?;
                    returned = true;
                    break;
                }
                _ => break,
            }
        }

        self.close(NodeKind::Statements);
        self.ascend();
        Ok(returned)
    }

    /// `'let' varName ('[' expression ']')? '=' expression ';'`
    pub fn compile_let(&mut self) -> Result<()> {
        self.open(NodeKind::LetStatement);
        self.expect(Expected::Keyword("let"))?;
        self.expect(Expected::Kind(TokenKind::Identifier))?;
        if self.at_symbol("[") {
            self.expect(Expected::Symbol("["))?;
            self.compile_expression()?;
            self.expect(Expected::Symbol("]"))?;
        }
        self.expect(Expected::Symbol("="))?;
        self.compile_expression()?;
        self.expect(Expected::Symbol(";"))?;
        self.close(NodeKind::LetStatement);
        Ok(())
    }

    pub fn compile_if(&mut self) -> Result<()> {
        self.open(NodeKind::IfStatement);
        self.expect(Expected::Keyword("if"))?;
        self.compile_condition()?;
        self.compile_block()?;
        if self.at_keyword(&["else"]) {
            self.expect(Expected::Keyword("else"))?;
            self.compile_block()?;
        }
        self.close(NodeKind::IfStatement);
        Ok(())
    }

    pub fn compile_while(&mut self) -> Result<()> {
        self.open(NodeKind::WhileStatement);
        self.expect(Expected::Keyword("while"))?;
        self.compile_condition()?;
        self.compile_block()?;
        self.close(NodeKind::WhileStatement);
        Ok(())
    }

    // '(' expression ')'
    fn compile_condition(&mut self) -> Result<()> {
        self.expect(Expected::Symbol("("))?;
        self.compile_expression()?;
        self.expect(Expected::Symbol(")"))?;
        Ok(())
    }

    // '{' statements '}'
    fn compile_block(&mut self) -> Result<()> {
        self.expect(Expected::Symbol("{"))?;
        self.compile_statements()?;
        self.expect(Expected::Symbol("}"))?;
        Ok(())
    }

    pub fn compile_do(&mut self) -> Result<()> {
        self.open(NodeKind::DoStatement);
        self.expect(Expected::Keyword("do"))?;
        self.compile_subroutine_call()?;
        self.expect(Expected::Symbol(";"))?;
        self.close(NodeKind::DoStatement);
        Ok(())
    }

    /// `name '(' expressionList ')'` or `name '.' name '(' expressionList ')'`.
    /// Has no tag of its own.
    fn compile_subroutine_call(&mut self) -> Result<()> {
        self.expect(Expected::Kind(TokenKind::Identifier))?;
        if self.at_symbol(".") {
            self.expect(Expected::Symbol("."))?;
            self.expect(Expected::Kind(TokenKind::Identifier))?;
        } else if !self.at_symbol("(") {
            return Err(self.unexpected("symbol `(` or `.`"));
        }
        self.expect(Expected::Symbol("("))?;
        self.compile_expression_list()?;
        self.expect(Expected::Symbol(")"))?;
        Ok(())
    }

    pub fn compile_return(&mut self) -> Result<()> {
        self.open(NodeKind::ReturnStatement);
        self.expect(Expected::Keyword("return"))?;
        if !self.at_symbol(";") {
            self.compile_expression()?;
        }
        self.expect(Expected::Symbol(";"))?;
        self.close(NodeKind::ReturnStatement);
        Ok(())
    }

    // --- Expressions ---

    /// `term (op term)*`. Stops at the first token that is not an operator.
    pub fn compile_expression(&mut self) -> Result<()> {
        self.open(NodeKind::Expression);
        self.compile_term()?;
        while self.curr.as_ref().is_some_and(is_binary_op) {
            self.expect(Expected::Kind(TokenKind::Symbol))?;
            self.compile_term()?;
        }
        self.close(NodeKind::Expression);
        Ok(())
    }

    /// Fails without consuming anything when the lookahead cannot begin a term.
    pub fn compile_term(&mut self) -> Result<()> {
        let shape = match &self.curr {
            Some(token) => classify_term(token, self.peek.as_ref()),
            None => None,
        };
        let shape = match shape {
            Some(shape) => shape,
            None => return Err(self.unexpected("a term")),
        };

        self.descend()?;
        self.open(NodeKind::Term);
        match shape {
            TermShape::Constant => {
                let kind = self.curr.as_ref().map_or(TokenKind::Keyword, |token| token.kind);
                self.expect(Expected::Kind(kind))?;
            }
            TermShape::Variable => {
                self.expect(Expected::Kind(TokenKind::Identifier))?;
            }
            TermShape::ArrayAccess => {
                self.expect(Expected::Kind(TokenKind::Identifier))?;
                self.expect(Expected::Symbol("["))?;
                self.compile_expression()?;
                self.expect(Expected::Symbol("]"))?;
            }
            TermShape::Call | TermShape::QualifiedCall => {
                self.compile_subroutine_call()?;
            }
            TermShape::Parenthesized => {
                self.expect(Expected::Symbol("("))?;
                self.compile_expression()?;
                self.expect(Expected::Symbol(")"))?;
            }
            TermShape::Unary => {
                self.expect(Expected::Kind(TokenKind::Symbol))?;
                self.compile_term()?;
            }
        }
        self.close(NodeKind::Term);
        self.ascend();
        Ok(())
    }

    /// Possibly empty; the enclosing parentheses belong to the caller.
    pub fn compile_expression_list(&mut self) -> Result<()> {
        self.open(NodeKind::ExpressionList);
        if !self.at_symbol(")") {
            self.compile_expression()?;
            while self.at_symbol(",") {
                self.expect(Expected::Symbol(","))?;
                self.compile_expression()?;
            }
        }
        self.close(NodeKind::ExpressionList);
        Ok(())
    }
}

/// Parses one compilation unit. Events are returned only if the whole class
/// parsed; on failure nothing is handed out.
pub fn parse(source: &str) -> Result<Vec<Event>> {
    let mut parser = Parser::new(source)?;
    parser.compile_class()?;
    let events = parser.into_events();
    tracing::debug!(events = events.len(), "parsed class");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .map(|event| match event {
                Event::Open(kind) => format!("<{}>", kind),
                Event::Leaf { text, .. } => text.clone(),
                Event::Close(kind) => format!("</{}>", kind),
            })
            .collect()
    }

    #[test]
    fn test_expect_reports_expected_and_found() {
        let mut parser = Parser::new("let 5").unwrap();
        parser.expect(Expected::Keyword("let")).unwrap();
        let error = parser.expect(Expected::Kind(TokenKind::Identifier)).unwrap_err();
        assert_eq!(
            error,
            JackError::Unexpected {
                location: jack_types::SourceLocation::new(1, 5),
                expected: "identifier".to_string(),
                found: "integerConstant `5`".to_string(),
            }
        );
        // The offending token stays put.
        assert_eq!(parser.current().map(|t| t.text.as_str()), Some("5"));
    }

    #[test]
    fn test_expect_at_end() {
        let mut parser = Parser::new("").unwrap();
        assert_eq!(parser.expect(Expected::Symbol("}")).unwrap_err(), JackError::eof("symbol `}`"));
    }

    #[test]
    fn test_expected_display() {
        assert_eq!(Expected::OneOf(&SUBROUTINE_KEYWORDS).to_string(), "one of `constructor`, `function`, `method`");
    }

    #[test]
    fn test_return_type_accepts_void_and_class_names() {
        let mut parser = Parser::new("void Point int").unwrap();
        parser.expect(Expected::ReturnType).unwrap();
        parser.expect(Expected::ReturnType).unwrap();
        parser.expect(Expected::Type).unwrap();
        assert!(parser.is_eof());
        assert!(Parser::new("void").unwrap().expect(Expected::Type).is_err());
    }

    #[test]
    fn test_statements_stop_after_return() {
        let mut parser = Parser::new("return; let x = 1;").unwrap();
        assert!(parser.compile_statements().unwrap());
        assert!(parser.current().is_some_and(|t| t.is_keyword("let")));
    }

    #[test]
    fn test_depth_is_restored_after_each_term() {
        let source = "(1) + (2) + (3)";
        let mut parser = Parser::new(source).unwrap();
        parser.compile_expression().unwrap();
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_unary_chain_is_bounded() {
        let source = format!("{}x", "-".repeat(MAX_DEPTH + 1));
        let error = Parser::new(&source).unwrap().compile_term().unwrap_err();
        let location = jack_types::SourceLocation::new(1, MAX_DEPTH + 1);
        assert_eq!(error, JackError::TooDeep { location, limit: MAX_DEPTH });
    }

    #[test]
    fn test_unary_nesting() {
        let mut parser = Parser::new("-~x").unwrap();
        parser.compile_term().unwrap();
        assert_eq!(
            tags(parser.events()),
            vec!["<term>", "-", "<term>", "~", "<term>", "x", "</term>", "</term>", "</term>"]
        );
    }
}
