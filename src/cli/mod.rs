// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry points for both binaries. Uses `clap` to parse
// arguments and delegates all work to Layer 2 (application).
//
//   RunCli    — `iris-run train|evaluate`
//   PoisonCli — `poison-data --level N`
//
// Only this layer writes to stdout, and only after a use case
// has succeeded.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Mode, PoisonArgs, RunArgs};

use crate::application::{
    evaluate_use_case::{render_markdown, EvaluateUseCase},
    poison_use_case::PoisonUseCase,
    train_use_case::TrainUseCase,
};

/// Train or evaluate the Iris decision tree.
#[derive(Parser, Debug)]
#[command(
    name = "iris-run",
    version,
    about = "Train a decision tree on the Iris dataset with run tracking, or evaluate the saved model."
)]
pub struct RunCli {
    /// Mode to run
    #[arg(value_enum)]
    pub mode: Mode,

    #[command(flatten)]
    pub args: RunArgs,
}

impl RunCli {
    /// Dispatch to the use case for the selected mode.
    pub fn run(self) -> Result<()> {
        match self.mode {
            Mode::Train    => Self::run_train(self.args),
            Mode::Evaluate => Self::run_evaluate(self.args),
        }
    }

    fn run_train(args: RunArgs) -> Result<()> {
        tracing::info!("--- Running in TRAIN mode ---");
        let outcome = TrainUseCase::new(args.into()).execute()?;

        println!("Accuracy: {:.3}", outcome.accuracy);
        println!("Model saved to {}", outcome.model_path);
        println!("View run at: {}", outcome.run_url);
        Ok(())
    }

    fn run_evaluate(args: RunArgs) -> Result<()> {
        tracing::info!("--- Running in EVALUATE mode ---");
        let evaluation = EvaluateUseCase::new(args.into()).execute()?;

        print!("{}", render_markdown(evaluation.accuracy, &evaluation.report));
        Ok(())
    }
}

/// Overwrite the Iris dataset with in-range random noise.
#[derive(Parser, Debug)]
#[command(
    name = "poison-data",
    version,
    about = "Replace the features of a percentage of Iris rows with random in-range values."
)]
pub struct PoisonCli {
    #[command(flatten)]
    pub args: PoisonArgs,
}

impl PoisonCli {
    pub fn run(self) -> Result<()> {
        let summary = PoisonUseCase::new(self.args.into()).execute()?;
        tracing::info!(
            "Poisoned {} of {} rows",
            summary.poisoned_rows.len(),
            summary.total_rows
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_parse_run_modes() {
        let cli = RunCli::try_parse_from(["iris-run", "evaluate"]).unwrap();
        assert_eq!(cli.mode, Mode::Evaluate);
        assert_eq!(cli.args.model_path, "artifacts/model.json");
        assert_eq!(cli.args.data, "data/iris.csv");

        let cli = RunCli::try_parse_from(["iris-run", "train", "--experiment", "x"]).unwrap();
        assert_eq!(cli.mode, Mode::Train);
        let cfg: TrainConfig = cli.args.into();
        assert_eq!(cfg.experiment_name, "x");
        assert_eq!(cfg.max_depth, 3);
    }

    #[test]
    fn test_mode_is_required_and_closed() {
        assert!(RunCli::try_parse_from(["iris-run"]).is_err());
        assert!(RunCli::try_parse_from(["iris-run", "predict"]).is_err());
    }

    #[test]
    fn test_poison_accepts_negative_level() {
        let cli = PoisonCli::try_parse_from(["poison-data", "--level", "-5"]).unwrap();
        assert_eq!(cli.args.level, -5);
        assert!(PoisonCli::try_parse_from(["poison-data"]).is_err());
    }

    #[test]
    fn test_cli_definitions_are_valid() {
        use clap::CommandFactory;
        RunCli::command().debug_assert();
        PoisonCli::command().debug_assert();
    }
}
