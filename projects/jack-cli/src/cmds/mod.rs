mod check;
mod compile;
mod init;
mod tokens;

pub use check::{CheckArgs, CheckReport};
pub use compile::CompileArgs;
pub use init::InitArgs;
pub use tokens::TokensArgs;

use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const SOURCE_EXTENSION: &str = "jack";

/// A single file, or every `.jack` file directly inside a directory, sorted.
pub async fn collect_sources(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path).await.with_context(|| format!("reading {}", path.display()))?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file = entry.path();
        if file.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            sources.push(file);
        }
    }
    sources.sort();
    Ok(sources)
}
