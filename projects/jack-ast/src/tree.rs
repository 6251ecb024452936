use crate::{Event, NodeKind, Sink, TokenKind};
use jack_types::{JackError, Result};

/// A materialized parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Node { kind: NodeKind, children: Vec<Element> },
    Leaf { kind: TokenKind, text: String },
}

impl Element {
    pub fn tag(&self) -> &'static str {
        match self {
            Element::Node { kind, .. } => kind.tag(),
            Element::Leaf { kind, .. } => kind.tag(),
        }
    }

    pub fn node_kind(&self) -> Option<NodeKind> {
        match self {
            Element::Node { kind, .. } => Some(*kind),
            Element::Leaf { .. } => None,
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Element::Node { children, .. } => children,
            Element::Leaf { .. } => &[],
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Leaf { text, .. } => Some(text.as_str()),
            Element::Node { .. } => None,
        }
    }

    /// Leaf tokens in source order.
    pub fn leaves(&self) -> Vec<(TokenKind, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(TokenKind, &'a str)>) {
        match self {
            Element::Leaf { kind, text } => out.push((*kind, text.as_str())),
            Element::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// All descendant nodes (including `self`) of the given kind, pre-order.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |element| {
            if element.node_kind() == Some(kind) {
                found.push(element);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Replays the tree as events.
    pub fn emit<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            Element::Leaf { kind, text } => sink.leaf(*kind, text),
            Element::Node { kind, children } => {
                sink.open(*kind)?;
                for child in children {
                    child.emit(sink)?;
                }
                sink.close(*kind)
            }
        }
    }
}

/// Builds an [`Element`] from events, rejecting unbalanced streams.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<(NodeKind, Vec<Element>)>,
    root: Option<Element>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: &[Event]) -> Result<Element> {
        let mut builder = Self::new();
        crate::replay(events, &mut builder)?;
        builder.finish()
    }

    pub fn finish(self) -> Result<Element> {
        if let Some((kind, _)) = self.stack.last() {
            return Err(JackError::unbalanced(format!("`{}` was never closed", kind)));
        }
        self.root.ok_or_else(|| JackError::unbalanced("no root element"))
    }

    fn push(&mut self, element: Element) -> Result<()> {
        match self.stack.last_mut() {
            Some((_, children)) => {
                children.push(element);
                Ok(())
            }
            None if self.root.is_none() => {
                self.root = Some(element);
                Ok(())
            }
            None => Err(JackError::unbalanced(format!("second root element `{}`", element.tag()))),
        }
    }
}

impl Sink for TreeBuilder {
    fn open(&mut self, kind: NodeKind) -> Result<()> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(JackError::unbalanced(format!("second root element `{}`", kind)));
        }
        self.stack.push((kind, Vec::new()));
        Ok(())
    }

    fn leaf(&mut self, kind: TokenKind, text: &str) -> Result<()> {
        self.push(Element::Leaf { kind, text: text.to_string() })
    }

    fn close(&mut self, kind: NodeKind) -> Result<()> {
        match self.stack.pop() {
            Some((open, children)) if open == kind => self.push(Element::Node { kind, children }),
            Some((open, _)) => Err(JackError::unbalanced(format!("`{}` closed while `{}` is open", kind, open))),
            None => Err(JackError::unbalanced(format!("`{}` closed but nothing is open", kind))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(text: &str) -> Vec<Event> {
        vec![
            Event::Open(NodeKind::Term),
            Event::leaf(TokenKind::Identifier, text),
            Event::Close(NodeKind::Term),
        ]
    }

    #[test]
    fn test_build_tree() {
        let mut events = vec![Event::Open(NodeKind::Expression)];
        events.extend(term("a"));
        events.push(Event::leaf(TokenKind::Symbol, "+"));
        events.extend(term("b"));
        events.push(Event::Close(NodeKind::Expression));

        let tree = TreeBuilder::from_events(&events).unwrap();
        assert_eq!(tree.node_kind(), Some(NodeKind::Expression));
        assert_eq!(tree.children().len(), 3);
        assert_eq!(tree.find_all(NodeKind::Term).len(), 2);
        assert_eq!(
            tree.leaves(),
            vec![(TokenKind::Identifier, "a"), (TokenKind::Symbol, "+"), (TokenKind::Identifier, "b")]
        );

        let mut replayed: Vec<Event> = Vec::new();
        tree.emit(&mut replayed).unwrap();
        assert_eq!(replayed, events);
    }

    #[test]
    fn test_mismatched_close() {
        let events = vec![Event::Open(NodeKind::Term), Event::Close(NodeKind::Expression)];
        assert!(matches!(TreeBuilder::from_events(&events), Err(JackError::Unbalanced { .. })));
    }

    #[test]
    fn test_unclosed() {
        let events = vec![Event::Open(NodeKind::Statements)];
        assert!(matches!(TreeBuilder::from_events(&events), Err(JackError::Unbalanced { .. })));
    }

    #[test]
    fn test_second_root() {
        let mut events = term("a");
        events.extend(term("b"));
        assert!(TreeBuilder::from_events(&events).is_err());
    }
}
