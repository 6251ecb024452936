use super::collect_sources;
use anyhow::Context;
use clap::Args;
use jack_core::Compiler;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Args)]
pub struct CompileArgs {
    /// A Jack file, or a directory of Jack files
    pub path: PathBuf,
    /// Directory for the output files (defaults to next to each source)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
    /// Also write the token document
    #[arg(short, long)]
    pub tokens: bool,
    /// Print the parse tree as JSON instead of writing XML
    #[arg(short, long)]
    pub json: bool,
}

impl CompileArgs {
    pub async fn run(&self, compiler: &Compiler) -> anyhow::Result<()> {
        let sources = collect_sources(&self.path).await?;
        if let Some(dir) = &self.out_dir {
            fs::create_dir_all(dir).await.with_context(|| format!("creating {}", dir.display()))?;
        }

        let mut failed = 0;
        for file in &sources {
            if let Err(error) = self.compile_file(compiler, file).await {
                failed += 1;
                eprintln!("{}: {:#}", file.display(), error);
            }
        }

        if failed > 0 {
            anyhow::bail!("{} of {} files failed", failed, sources.len());
        }
        Ok(())
    }

    async fn compile_file(&self, compiler: &Compiler, file: &Path) -> anyhow::Result<()> {
        let source = fs::read_to_string(file).await?;

        if self.json {
            println!("{}", tree_json(compiler, &source)?);
            return Ok(());
        }

        let paths = compiler.config().output_paths(file, self.out_dir.as_deref());
        let xml = compiler.compile(&source)?;
        fs::write(&paths.tree, xml).await?;
        tracing::info!(file = %file.display(), output = %paths.tree.display(), "compiled");

        if self.tokens || compiler.config().output.emit_tokens {
            fs::write(&paths.tokens, compiler.tokens(&source)?).await?;
            tracing::info!(output = %paths.tokens.display(), "wrote tokens");
        }
        Ok(())
    }
}

/// The parse tree of one unit as pretty-printed JSON.
pub fn tree_json(compiler: &Compiler, source: &str) -> anyhow::Result<String> {
    let tree = compiler.tree(source)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}
