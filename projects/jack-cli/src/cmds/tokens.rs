use anyhow::Context;
use clap::Args;
use jack_core::Compiler;
use std::path::PathBuf;
use tokio::fs;

#[derive(Args)]
pub struct TokensArgs {
    /// The Jack file to tokenize
    pub file: PathBuf,
}

impl TokensArgs {
    pub async fn run(&self, compiler: &Compiler) -> anyhow::Result<()> {
        print!("{}", self.document(compiler).await?);
        Ok(())
    }

    pub async fn document(&self, compiler: &Compiler) -> anyhow::Result<String> {
        let source = fs::read_to_string(&self.file).await.with_context(|| format!("reading {}", self.file.display()))?;
        Ok(compiler.tokens(&source)?)
    }
}
