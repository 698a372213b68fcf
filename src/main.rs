use anyhow::Result;
use clap::Parser;
use iris_pipeline::{cli::RunCli, infra::logging};

fn main() -> Result<()> {
    logging::init();

    let cli = RunCli::parse();
    cli.run()
}
