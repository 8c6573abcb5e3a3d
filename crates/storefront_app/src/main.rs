mod cli;
mod render;
mod run;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    storefront_logging::initialize(&cli.log_settings())?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run::run(cli))
}
