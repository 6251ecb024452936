pub mod config;

pub use config::{JackConfig, OutputPaths, CONFIG_FILE};

use jack_ast::{replay, Element, Event, TreeBuilder, XmlWriter};
use jack_parser::tokenize;
use jack_types::Result;
use std::io::Write;

/// Runs the lexer and parser over one compilation unit and hands the result
/// to the configured sinks.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: JackConfig,
}

impl Compiler {
    pub fn new(config: JackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JackConfig {
        &self.config
    }

    pub fn events(&self, source: &str) -> Result<Vec<Event>> {
        let events = jack_parser::parse(source)?;
        tracing::debug!(events = events.len(), "compiled unit");
        Ok(events)
    }

    pub fn check(&self, source: &str) -> Result<()> {
        self.events(source).map(|_| ())
    }

    /// Writes the parse output. Nothing is written if the unit fails to parse.
    pub fn compile_to<W: Write>(&self, source: &str, out: W) -> Result<()> {
        let events = self.events(source)?;
        let mut writer = XmlWriter::new(out, self.config.output.indent);
        replay(&events, &mut writer)?;
        writer.into_inner().flush()?;
        Ok(())
    }

    pub fn compile(&self, source: &str) -> Result<String> {
        let mut out = Vec::new();
        self.compile_to(source, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn tree(&self, source: &str) -> Result<Element> {
        TreeBuilder::from_events(&self.events(source)?)
    }

    /// The flat `<tokens>` document for `source`.
    pub fn tokens(&self, source: &str) -> Result<String> {
        let tokens = tokenize(source)?;
        tracing::debug!(tokens = tokens.len(), "tokenized unit");

        let mut writer = XmlWriter::new(Vec::new(), 0);
        writer.write_tokens(tokens.iter().map(|token| (token.kind, token.text.as_str())))?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jack_ast::NodeKind;
    use jack_types::JackError;

    const SOURCE: &str = "class Main {\n  function void main() {\n    do Output.printInt(1 < 2);\n    return;\n  }\n}\n";

    #[test]
    fn test_compile_uses_configured_indent() {
        let mut config = JackConfig::default();
        config.output.indent = 4;
        let xml = Compiler::new(config).compile(SOURCE).unwrap();
        assert!(xml.starts_with("<class>\n    <keyword> class </keyword>\n"));
        assert!(xml.contains("<symbol> &lt; </symbol>"));
        assert!(xml.ends_with("</class>\n"));
    }

    #[test]
    fn test_failed_unit_writes_nothing() {
        let mut out = Vec::new();
        let error = Compiler::default().compile_to("class Main { function void f() { } }", &mut out).unwrap_err();
        assert!(matches!(error, JackError::MissingReturn { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_tree() {
        let tree = Compiler::default().tree(SOURCE).unwrap();
        assert_eq!(tree.find_all(NodeKind::DoStatement).len(), 1);
        assert_eq!(tree.find_all(NodeKind::ExpressionList).len(), 1);
    }

    #[test]
    fn test_tokens_document() {
        let doc = Compiler::default().tokens("if (x < \"a\") {}").unwrap();
        assert_eq!(
            doc,
            "<tokens>\n\
             <keyword> if </keyword>\n\
             <symbol> ( </symbol>\n\
             <identifier> x </identifier>\n\
             <symbol> &lt; </symbol>\n\
             <stringConstant> a </stringConstant>\n\
             <symbol> ) </symbol>\n\
             <symbol> { </symbol>\n\
             <symbol> } </symbol>\n\
             </tokens>\n"
        );
    }

    #[test]
    fn test_units_are_independent() {
        let compiler = Compiler::default();
        assert!(compiler.check("class Broken {").is_err());
        assert!(compiler.check("class Fine { }").is_ok());
    }
}
