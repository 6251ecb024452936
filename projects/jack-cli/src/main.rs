use clap::Parser;
use jack_cli::{JackApplication, JackCommands};
use jack_core::Compiler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = JackApplication::parse();
    let compiler = Compiler::new(cli.load_config()?);

    match cli.command {
        JackCommands::Check(args) => args.run(&compiler).await?,
        JackCommands::Compile(args) => args.run(&compiler).await?,
        JackCommands::Tokens(args) => args.run(&compiler).await?,
        JackCommands::Init(args) => args.run().await?,
    }

    Ok(())
}
