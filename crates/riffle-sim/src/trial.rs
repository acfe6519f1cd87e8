use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng};
use riffle_core::{CardId, Deck, DeckError, Shuffler};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimulationConfig};
use crate::plot::{self, PlotError};
use crate::report::{self, ReportError};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("failed to encode history row: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// One JSONL row of the history artifact. Trial 0 is the unshuffled deck.
#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    trial: usize,
    deck: &'a [CardId],
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub trials_run: usize,
    pub rows_written: usize,
    pub final_deck: Deck,
    pub history_path: PathBuf,
    pub summary_path: PathBuf,
    pub trajectories_plot: Option<PathBuf>,
    pub before_after_plot: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
}

/// Drives the trial loop: repeatedly split-and-shuffle, adopt the result,
/// and record every intermediate deck state for downstream consumers.
pub struct TrialRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
}

impl TrialRunner {
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute the trial loop, streaming history rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.history_jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if !self.outputs.plots_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.outputs.plots_dir)?;
        }

        let mut rng = StdRng::seed_from_u64(self.config.trials.seed.unwrap_or(0));
        let mut shuffler = Shuffler::new(self.config.shuffler.to_params());

        let mut writer = BufWriter::new(File::create(&self.outputs.history_jsonl)?);
        let mut history: Vec<Vec<CardId>> = Vec::with_capacity(self.config.trials.count + 1);
        history.push(shuffler.deck().cards().to_vec());
        let mut rows_written = write_row(&mut writer, 0, shuffler.deck())?;

        for trial in 1..=self.config.trials.count {
            // An invariant violation here is fatal: adopting a corrupted deck
            // would poison every later trial.
            let next = shuffler.split_and_shuffle(&mut rng)?;
            event!(Level::DEBUG, trial, "trial complete");
            rows_written += write_row(&mut writer, trial, &next)?;
            history.push(next.cards().to_vec());
            shuffler.adopt(next);
        }

        writer.flush()?;

        let trajectories_plot =
            warn_on_plot_failure(plot::render_trajectories(&history, &self.outputs.plots_dir));
        let before_after_plot =
            warn_on_plot_failure(plot::render_before_after(&history, &self.outputs.plots_dir));

        report::write_summary(&self.outputs.summary_md, &self.config, shuffler.deck())?;

        let telemetry_path = if self.config.logging.enable_structured {
            self.outputs
                .summary_md
                .parent()
                .map(|dir| dir.join("telemetry.jsonl"))
        } else {
            None
        };

        Ok(RunSummary {
            trials_run: self.config.trials.count,
            rows_written,
            final_deck: shuffler.deck().clone(),
            history_path: self.outputs.history_jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            trajectories_plot,
            before_after_plot,
            telemetry_path,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_row(
    writer: &mut BufWriter<File>,
    trial: usize,
    deck: &Deck,
) -> Result<usize, RunnerError> {
    let row = HistoryRow {
        trial,
        deck: deck.cards(),
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(1)
}

fn warn_on_plot_failure(outcome: Result<PathBuf, PlotError>) -> Option<PathBuf> {
    match outcome {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("WARN: {}", err);
            None
        }
    }
}
