use anyhow::Context;
use clap::{Parser, Subcommand};
use jack_core::JackConfig;
use std::path::PathBuf;

mod cmds;

pub use cmds::{collect_sources, CheckArgs, CheckReport, CompileArgs, InitArgs, TokensArgs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct JackApplication {
    /// Configuration file (defaults to ./jack.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: JackCommands,
}

impl JackApplication {
    pub fn load_config(&self) -> anyhow::Result<JackConfig> {
        let config = match &self.config {
            Some(path) => JackConfig::from_file(path).with_context(|| format!("reading {}", path.display()))?,
            None => JackConfig::discover(".")?,
        };
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum JackCommands {
    /// Check Jack files for lexical and grammar errors
    Check(CheckArgs),
    /// Parse Jack files and write their structure as XML
    Compile(CompileArgs),
    /// Print the token document of a Jack file
    Tokens(TokensArgs),
    /// Create or update jack.toml
    Init(InitArgs),
}
