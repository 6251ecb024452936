use super::collect_sources;
use clap::Args;
use jack_core::Compiler;
use std::path::PathBuf;
use tokio::fs;

#[derive(Args)]
pub struct CheckArgs {
    /// A Jack file, or a directory of Jack files
    pub path: PathBuf,
}

/// Files that failed, with their error messages, in source order.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl CheckArgs {
    pub async fn run(&self, compiler: &Compiler) -> anyhow::Result<()> {
        let report = self.check_all(compiler).await?;
        for (file, message) in &report.failures {
            eprintln!("{}: {}", file.display(), message);
        }

        if !report.failures.is_empty() {
            anyhow::bail!("{} of {} files failed", report.failures.len(), report.checked);
        }
        println!("Check successful!");
        Ok(())
    }

    /// Each file is its own unit; one failure does not stop the rest.
    pub async fn check_all(&self, compiler: &Compiler) -> anyhow::Result<CheckReport> {
        let sources = collect_sources(&self.path).await?;
        let mut report = CheckReport { checked: sources.len(), failures: Vec::new() };

        for file in sources {
            let source = fs::read_to_string(&file).await?;
            match compiler.check(&source) {
                Ok(()) => tracing::info!(file = %file.display(), "ok"),
                Err(error) => report.failures.push((file, error.to_string())),
            }
        }
        Ok(report)
    }
}
