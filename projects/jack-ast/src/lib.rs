//! The structural output of the Jack parser.
//!
//! The parser never builds a tree itself. It produces a flat list of
//! [`Event`]s, which a [`Sink`] turns into something useful: an
//! [`XmlWriter`] serializes them as nested markup, a [`TreeBuilder`]
//! materializes an [`Element`] tree.

use jack_types::Result;
use std::fmt::{Display, Formatter};

mod tree;
mod xml;

pub use tree::{Element, TreeBuilder};
pub use xml::{escape, to_xml, XmlWriter};

/// The five lexical classes of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Keyword,
    Symbol,
    IntegerConstant,
    StringConstant,
    Identifier,
}

impl TokenKind {
    /// Element name used when the token is serialized.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::IntegerConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
            TokenKind::Identifier => "identifier",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Grammar non-terminals that appear as tagged containers in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Class,
    ClassVarDec,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    LetStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    ExpressionList,
}

impl NodeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Class => "class",
            NodeKind::ClassVarDec => "classVarDec",
            NodeKind::SubroutineDec => "subroutineDec",
            NodeKind::ParameterList => "parameterList",
            NodeKind::SubroutineBody => "subroutineBody",
            NodeKind::VarDec => "varDec",
            NodeKind::Statements => "statements",
            NodeKind::LetStatement => "letStatement",
            NodeKind::IfStatement => "ifStatement",
            NodeKind::WhileStatement => "whileStatement",
            NodeKind::DoStatement => "doStatement",
            NodeKind::ReturnStatement => "returnStatement",
            NodeKind::Expression => "expression",
            NodeKind::Term => "term",
            NodeKind::ExpressionList => "expressionList",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One step of a top-down, left-to-right derivation.
///
/// Leaf text is the raw token value: string constants without their quotes,
/// symbols unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Open(NodeKind),
    Leaf { kind: TokenKind, text: String },
    Close(NodeKind),
}

impl Event {
    pub fn leaf(kind: TokenKind, text: impl Into<String>) -> Self {
        Event::Leaf { kind, text: text.into() }
    }
}

/// Receiver of structural events.
pub trait Sink {
    fn open(&mut self, kind: NodeKind) -> Result<()>;

    fn leaf(&mut self, kind: TokenKind, text: &str) -> Result<()>;

    fn close(&mut self, kind: NodeKind) -> Result<()>;

    fn event(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::Open(kind) => self.open(*kind),
            Event::Leaf { kind, text } => self.leaf(*kind, text),
            Event::Close(kind) => self.close(*kind),
        }
    }
}

impl Sink for Vec<Event> {
    fn open(&mut self, kind: NodeKind) -> Result<()> {
        self.push(Event::Open(kind));
        Ok(())
    }

    fn leaf(&mut self, kind: TokenKind, text: &str) -> Result<()> {
        self.push(Event::leaf(kind, text));
        Ok(())
    }

    fn close(&mut self, kind: NodeKind) -> Result<()> {
        self.push(Event::Close(kind));
        Ok(())
    }
}

/// Feeds a buffered event list into `sink`, stopping at the first failure.
pub fn replay<'e, S, I>(events: I, sink: &mut S) -> Result<()>
where
    S: Sink + ?Sized,
    I: IntoIterator<Item = &'e Event>,
{
    for event in events {
        sink.event(event)?;
    }
    Ok(())
}
