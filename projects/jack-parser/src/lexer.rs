use jack_ast::TokenKind;
use jack_types::{JackError, Result, SourceLocation, Span};
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::Chars;

pub const KEYWORDS: [&str; 21] = [
    "class",
    "constructor",
    "function",
    "method",
    "field",
    "static",
    "var",
    "int",
    "char",
    "boolean",
    "void",
    "true",
    "false",
    "null",
    "this",
    "let",
    "do",
    "if",
    "else",
    "while",
    "return",
];

/// `^` and `#` are the shift-left / shift-right extensions.
pub const SYMBOLS: [char; 21] = [
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~', '^', '#',
];

pub const MAX_INTEGER: u32 = 32767;

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

pub fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The lexeme, or the decoded value for string and integer constants.
    pub text: String,
    pub span: Span,
    pub location: SourceLocation,
}

impl Token {
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    /// Source text that lexes back to this token.
    pub fn to_source(&self) -> String {
        match self.kind {
            TokenKind::StringConstant => format!("\"{}\"", self.text),
            _ => self.text.clone(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} `{}`", self.kind, self.text)
    }
}

/// Pull-based tokenizer. Whitespace and all three comment forms are skipped
/// between tokens.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    cursor: usize,
    line: usize,
    column: usize,
    pending: Option<JackError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            cursor: 0,
            line: 1,
            column: 1,
            pending: None,
        }
    }

    /// True while a token (or a lexical error) remains to be returned.
    pub fn has_next(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        match self.skip_trivia() {
            Ok(()) => self.peek().is_some(),
            Err(error) => {
                self.pending = Some(error);
                true
            }
        }
    }

    /// Returns the next token, or `Ok(None)` once the input is exhausted.
    /// Calling it again after the end keeps returning `Ok(None)`.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(error) = self.pending.take() {
            return Err(error);
        }
        self.skip_trivia()?;

        let start = self.cursor;
        let location = self.location();
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(None),
        };

        let (kind, text) = match c {
            '"' => (TokenKind::StringConstant, self.string_constant(location)?),
            c if c.is_ascii_digit() => (TokenKind::IntegerConstant, self.integer_constant(start, location)?),
            c if c.is_ascii_alphabetic() || c == '_' => {
                self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let text = &self.source[start..self.cursor];
                let kind = if is_keyword(text) { TokenKind::Keyword } else { TokenKind::Identifier };
                (kind, text.to_string())
            }
            c if is_symbol(c) => (TokenKind::Symbol, c.to_string()),
            c => return Err(JackError::lexical(location, format!("unexpected character {:?}", c))),
        };

        let token = Token { kind, text, span: Span::new(start, self.cursor), location };
        tracing::trace!(kind = %token.kind, text = %token.text, %location, "token");
        Ok(Some(token))
    }

    fn string_constant(&mut self, location: SourceLocation) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(value),
                Some('\n') | Some('\r') => {
                    return Err(JackError::lexical(location, "string constant may not contain a newline"));
                }
                Some(c) => value.push(c),
                None => return Err(JackError::lexical(location, "unterminated string constant")),
            }
        }
    }

    fn integer_constant(&mut self, start: usize, location: SourceLocation) -> Result<String> {
        self.consume_while(|c| c.is_ascii_digit());
        let source = self.source;
        let digits = &source[start..self.cursor];

        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            return Err(JackError::lexical(location, format!("identifier may not start with a digit: `{}`", digits)));
        }

        match digits.parse::<u32>() {
            Ok(value) if value <= MAX_INTEGER => Ok(value.to_string()),
            _ => Err(JackError::lexical(
                location,
                format!("integer constant {} is out of range 0..={}", digits, MAX_INTEGER),
            )),
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.consume_while(|c| c.is_whitespace());
                }
                (Some('/'), Some('/')) => {
                    self.consume_while(|c| c != '\n');
                }
                (Some('/'), Some('*')) => {
                    let location = self.location();
                    self.advance();
                    self.advance();
                    self.block_comment(location)?;
                }
                _ => return Ok(()),
            }
        }
    }

    // Covers both `/* */` and `/** */`.
    fn block_comment(&mut self, location: SourceLocation) -> Result<()> {
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                return Ok(());
            }
        }
        Err(JackError::lexical(location, "unterminated block comment"))
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(c) = c {
            self.cursor += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    fn consume_while<F>(&mut self, mut f: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some(c) = self.peek() {
            if f(c) {
                self.advance();
            } else {
                break;
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Lexes the whole source eagerly, failing on the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).collect()
}
