use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

use riffle_core::CardId;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Render(String),
}

/// Per-card position over trials: one line per card, so a well-mixed deck
/// shows trajectories dispersing from the initial diagonal.
pub fn render_trajectories(
    history: &[Vec<CardId>],
    dir: impl AsRef<Path>,
) -> Result<PathBuf, PlotError> {
    let dir = dir.as_ref();
    ensure_dir(dir)?;
    let output_path = dir.join("trajectories.png");

    let trajectories = card_trajectories(history);
    let trials = history.len().saturating_sub(1).max(1);
    let deck_size = history.first().map(Vec::len).unwrap_or(0).max(1);

    with_panic_guard(move || {
        let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption("Card position by trial", ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0..trials, 0..deck_size)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Trial")
            .y_desc("Position")
            .draw()
            .map_err(render_err)?;

        for (card, positions) in trajectories.iter().enumerate() {
            let color = Palette99::pick(card).mix(0.9);
            chart
                .draw_series(LineSeries::new(
                    positions.iter().enumerate().map(|(trial, &pos)| (trial, pos)),
                    &color,
                ))
                .map_err(render_err)?;
        }

        drop(chart);
        root.present().map_err(render_err)?;
        drop(root);

        Ok(output_path)
    })
}

/// Straight line per card from its initial to its final position.
pub fn render_before_after(
    history: &[Vec<CardId>],
    dir: impl AsRef<Path>,
) -> Result<PathBuf, PlotError> {
    let dir = dir.as_ref();
    ensure_dir(dir)?;
    let output_path = dir.join("before_after.png");

    let first = history.first().map(|deck| positions_of(deck)).unwrap_or_default();
    let last = history.last().map(|deck| positions_of(deck)).unwrap_or_default();
    let trials = history.len().saturating_sub(1).max(1);
    let deck_size = first.len().max(1);

    with_panic_guard(move || {
        let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption("Initial vs final position", ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0..trials, 0..deck_size)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Trial")
            .y_desc("Position")
            .draw()
            .map_err(render_err)?;

        for (card, (&before, &after)) in first.iter().zip(last.iter()).enumerate() {
            let color = Palette99::pick(card).mix(0.9);
            chart
                .draw_series(LineSeries::new([(0, before), (trials, after)], &color))
                .map_err(render_err)?;
        }

        drop(chart);
        root.present().map_err(render_err)?;
        drop(root);

        Ok(output_path)
    })
}

/// Positions indexed by card id, then by trial.
fn card_trajectories(history: &[Vec<CardId>]) -> Vec<Vec<usize>> {
    let deck_size = history.first().map(Vec::len).unwrap_or(0);
    let mut trajectories = vec![Vec::with_capacity(history.len()); deck_size];
    for snapshot in history {
        for (card, &pos) in positions_of(snapshot).iter().enumerate() {
            trajectories[card].push(pos);
        }
    }
    trajectories
}

fn positions_of(snapshot: &[CardId]) -> Vec<usize> {
    let mut positions = vec![0usize; snapshot.len()];
    for (pos, &card) in snapshot.iter().enumerate() {
        positions[usize::from(card)] = pos;
    }
    positions
}

fn ensure_dir(dir: &Path) -> Result<(), PlotError> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(|source| PlotError::Io {
            context: "creating plots directory",
            source,
        })?;
    }
    Ok(())
}

fn render_err(err: impl Display) -> PlotError {
    PlotError::Render(err.to_string())
}

fn with_panic_guard<T>(
    render: impl FnOnce() -> Result<T, PlotError> + std::panic::UnwindSafe,
) -> Result<T, PlotError> {
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let attempt = std::panic::catch_unwind(render);
    std::panic::set_hook(prev_hook);

    match attempt {
        Ok(result) => result,
        Err(_) => Err(PlotError::Render(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}
