use crate::{Event, NodeKind, Sink, TokenKind};
use jack_types::Result;
use std::io::Write;

/// Escapes the three characters that cannot appear verbatim in element text.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serializes events as markup, one element per line.
pub struct XmlWriter<W: Write> {
    out: W,
    indent: usize,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W, indent: usize) -> Self {
        Self { out, indent, depth: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the flat `<tokens>` document: every token as a leaf, unindented.
    pub fn write_tokens<'t, I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = (TokenKind, &'t str)>,
    {
        writeln!(self.out, "<tokens>")?;
        for (kind, text) in tokens {
            self.write_leaf(kind, text)?;
        }
        writeln!(self.out, "</tokens>")?;
        Ok(())
    }

    fn pad(&mut self) -> Result<()> {
        let width = self.indent * self.depth;
        write!(self.out, "{:width$}", "", width = width)?;
        Ok(())
    }

    fn write_leaf(&mut self, kind: TokenKind, text: &str) -> Result<()> {
        self.pad()?;
        writeln!(self.out, "<{tag}> {} </{tag}>", escape(text), tag = kind.tag())?;
        Ok(())
    }
}

impl<W: Write> Sink for XmlWriter<W> {
    fn open(&mut self, kind: NodeKind) -> Result<()> {
        self.pad()?;
        writeln!(self.out, "<{}>", kind.tag())?;
        self.depth += 1;
        Ok(())
    }

    fn leaf(&mut self, kind: TokenKind, text: &str) -> Result<()> {
        self.write_leaf(kind, text)
    }

    fn close(&mut self, kind: NodeKind) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.pad()?;
        writeln!(self.out, "</{}>", kind.tag())?;
        Ok(())
    }
}

/// Renders a complete event list to a string.
pub fn to_xml(events: &[Event], indent: usize) -> Result<String> {
    let mut writer = XmlWriter::new(Vec::new(), indent);
    crate::replay(events, &mut writer)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
