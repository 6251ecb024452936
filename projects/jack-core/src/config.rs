use jack_types::{JackError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item};

pub const CONFIG_FILE: &str = "jack.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JackConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spaces per nesting level in the parse output.
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Appended to the file stem of the token document: `Main` -> `MainT.xml`.
    #[serde(default = "default_tokens_suffix")]
    pub tokens_suffix: String,
    #[serde(default)]
    pub emit_tokens: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            extension: default_extension(),
            tokens_suffix: default_tokens_suffix(),
            emit_tokens: false,
        }
    }
}

fn default_indent() -> usize {
    2
}

fn default_extension() -> String {
    "xml".to_string()
}

fn default_tokens_suffix() -> String {
    "T".to_string()
}

impl JackConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| JackError::config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
    }

    /// Loads `jack.toml` from `dir`, or the defaults when there is none.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| JackError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Update an existing toml file while preserving comments/formatting
    pub fn update_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if path.exists() { std::fs::read_to_string(path)? } else { String::new() };

        let mut doc = content
            .parse::<DocumentMut>()
            .map_err(|e| JackError::config(format!("Failed to parse existing {}: {}", CONFIG_FILE, e)))?;
        let new_doc = self
            .to_toml()?
            .parse::<DocumentMut>()
            .map_err(|e| JackError::config(format!("Failed to serialize config: {}", e)))?;

        for (table_key, item) in new_doc.iter() {
            let merged = match (doc.get_mut(table_key).and_then(Item::as_table_mut), item.as_table()) {
                (Some(existing), Some(table)) => {
                    for (key, value) in table.iter() {
                        if !existing.contains_key(key) {
                            existing.insert(key, value.clone());
                        }
                    }
                    true
                }
                _ => false,
            };
            if !merged {
                doc.insert(table_key, item.clone());
            }
        }

        std::fs::write(path, doc.to_string())?;
        Ok(())
    }

    /// Where the parse output and token document for `input` go.
    pub fn output_paths(&self, input: &Path, out_dir: Option<&Path>) -> OutputPaths {
        let dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let stem = input.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();

        OutputPaths {
            tree: dir.join(format!("{}.{}", stem, self.output.extension)),
            tokens: dir.join(format!("{}{}.{}", stem, self.output.tokens_suffix, self.output.extension)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub tree: PathBuf,
    pub tokens: PathBuf,
}
