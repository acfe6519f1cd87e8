use std::path::PathBuf;

use clap::Parser;

use riffle_core::SplitSpread;
use riffle_sim::config::{ResolvedOutputs, SimulationConfig};
use riffle_sim::logging::init_logging;
use riffle_sim::trial::TrialRunner;

/// Riffle-shuffle mixing simulator.
#[derive(Debug, Parser)]
#[command(
    name = "riffle-sim",
    author,
    version,
    about = "Simulates imperfect riffle shuffles and records deck mixing"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/riffle.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of split-and-shuffle trials.
    #[arg(long, value_name = "TRIALS")]
    trials: Option<usize>,

    /// Override the RNG seed for the trial loop.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the probability of switching sides after each dropped card.
    #[arg(long, value_name = "PROB")]
    shuffle_accuracy: Option<f64>,

    /// Override how tightly cuts cluster around the midpoint.
    #[arg(long, value_name = "PROB")]
    split_accuracy: Option<f64>,

    /// Override the number of cards in the deck.
    #[arg(long, value_name = "CARDS")]
    deck_size: Option<usize>,

    /// Override the split-offset parameterization: 'deck_size' (reference)
    /// or 'split_accuracy' (corrected).
    #[arg(long, value_name = "MODE")]
    split_spread: Option<String>,

    /// Exit after validating the configuration (no simulation is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(trials) = cli.trials {
        config.trials.count = trials;
    }

    if let Some(seed) = cli.seed {
        config.trials.seed = Some(seed);
    }

    if let Some(shuffle_accuracy) = cli.shuffle_accuracy {
        config.shuffler.shuffle_accuracy = shuffle_accuracy;
    }

    if let Some(split_accuracy) = cli.split_accuracy {
        config.shuffler.split_accuracy = split_accuracy;
    }

    if let Some(deck_size) = cli.deck_size {
        config.shuffler.deck_size = deck_size;
    }

    if let Some(mode) = cli.split_spread.as_deref() {
        config.shuffler.split_spread = match mode {
            "deck_size" => SplitSpread::DeckSize,
            "split_accuracy" => SplitSpread::SplitAccuracy,
            other => anyhow::bail!(
                "unknown split spread '{other}' (expected 'deck_size' or 'split_accuracy')"
            ),
        };
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let trials = config.trials.count;
    let deck_size = config.shuffler.deck_size;

    println!("Loaded configuration '{run_id}' ({trials} trials, deck of {deck_size})");

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = TrialRunner::new(config, outputs);

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} trials → {} rows at {}",
        summary.trials_run,
        summary.rows_written,
        summary.history_path.display()
    );
    println!("Final deck: {}", summary.final_deck);
    println!(
        "Distinct identifiers: {}",
        summary.final_deck.distinct_count()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(plot_path) = summary.trajectories_plot.as_ref() {
        println!("Trajectory plot: {}", plot_path.display());
    }
    if let Some(plot_path) = summary.before_after_plot.as_ref() {
        println!("Before/after plot: {}", plot_path.display());
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
