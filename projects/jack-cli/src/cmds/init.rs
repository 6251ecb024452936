use clap::Args;
use jack_core::{JackConfig, CONFIG_FILE};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to create jack.toml in
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

impl InitArgs {
    pub async fn run(&self) -> anyhow::Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        JackConfig::default().update_file(&path)?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        InitArgs { dir: dir.path().to_path_buf() }.run().await.unwrap();

        let config = JackConfig::from_file(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, JackConfig::default());
    }

    #[tokio::test]
    async fn test_init_keeps_existing_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "# local overrides\n[output]\nindent = 4\n").unwrap();

        InitArgs { dir: dir.path().to_path_buf() }.run().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# local overrides"));
        let config = JackConfig::from_toml(&content).unwrap();
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.output.tokens_suffix, "T");
    }
}
