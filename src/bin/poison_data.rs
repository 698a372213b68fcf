use anyhow::Result;
use clap::Parser;
use iris_pipeline::{cli::PoisonCli, infra::logging};

fn main() -> Result<()> {
    logging::init();

    let cli = PoisonCli::parse();
    cli.run()
}
