use std::path::{Path, PathBuf};

use crate::data::loader;
use crate::error::{PlotError, Result};
use crate::state::dataset::TabularDataset;
use crate::state::plot_state::{PlotAction, PlotState};
use crate::state::selection::SelectionController;
use crate::state::series::bind_column;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the application knows: loaded files, open plots and the
/// current column selection. Owned by the eframe app and passed down by
/// reference each frame.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub datasets: Vec<TabularDataset>,
    pub plots: Vec<PlotState>,
    pub selection: SelectionController,
    next_plot_id: u64,
    figure_counter: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load files in order; each success is appended to the dataset list.
    /// Failures are returned alongside their path and do not stop the rest.
    pub fn load_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<(PathBuf, PlotError)> {
        let mut failures = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match loader::load_csv(path) {
                Ok(dataset) => self.datasets.push(dataset),
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {e}", path);
                    failures.push((path.to_path_buf(), e));
                }
            }
        }
        failures
    }

    pub fn current_dataset(&self) -> Option<&TabularDataset> {
        self.selection
            .current_dataset()
            .and_then(|i| self.datasets.get(i))
    }

    pub fn select_dataset(&mut self, index: usize) {
        if index < self.datasets.len() {
            self.selection.select_dataset(index);
        }
    }

    /// Toggle a column of the current dataset; out-of-range columns are ignored.
    pub fn toggle_column(&mut self, column: usize, ctrl: bool, shift: bool) {
        let columns = self.current_dataset().map(|d| d.column_count()).unwrap_or(0);
        if column < columns {
            self.selection.toggle_column(column, ctrl, shift);
        }
    }

    /// Register a new, empty plot and return it.
    pub fn new_plot(&mut self) -> &mut PlotState {
        self.next_plot_id += 1;
        self.figure_counter += 1;
        self.plots
            .push(PlotState::new(self.next_plot_id, self.figure_counter));
        let idx = self.plots.len() - 1;
        &mut self.plots[idx]
    }

    /// Create a plot from every selected column of the current dataset, in
    /// column order. Returns `None` when nothing is selected.
    pub fn plot_selected(&mut self) -> Result<Option<u64>> {
        let Some(dataset_idx) = self.selection.current_dataset() else {
            return Ok(None);
        };
        if self.selection.selected().is_empty() || dataset_idx >= self.datasets.len() {
            return Ok(None);
        }

        let columns: Vec<usize> = self.selection.selected().iter().copied().collect();
        let mut series = Vec::with_capacity(columns.len());
        for (i, &column) in columns.iter().enumerate() {
            series.push(bind_column(&self.datasets[dataset_idx], column, i)?);
        }

        let plot = self.new_plot();
        for s in series {
            plot.add_series(s);
        }
        tracing::info!("Created {} with {} series", plot.title, plot.series.len());
        Ok(Some(plot.id))
    }

    /// Append one column of the current dataset to an existing plot.
    pub fn bind_column_into(&mut self, plot_id: u64, column: usize) -> Result<()> {
        let Some(dataset_idx) = self.selection.current_dataset() else {
            return Ok(());
        };
        let Some(dataset) = self.datasets.get(dataset_idx) else {
            return Ok(());
        };
        let Some(plot) = self.plots.iter_mut().find(|p| p.id == plot_id) else {
            return Ok(());
        };
        let series = bind_column(dataset, column, plot.next_palette_index())?;
        tracing::info!("Added {:?} to {}", series.label, plot.title);
        plot.add_series(series);
        Ok(())
    }

    /// Open a new plot showing `series_index` of `plot_id` as a histogram.
    pub fn spawn_histogram(&mut self, plot_id: u64, series_index: usize) -> Option<u64> {
        let source = self
            .plot_by_id(plot_id)?
            .series
            .get(series_index)?
            .to_histogram();
        let plot = self.new_plot();
        plot.add_series(source);
        tracing::info!("Created histogram {}", plot.title);
        Some(plot.id)
    }

    /// Apply a data-changing plot action. `Capture` and `Focus` need the
    /// UI context and are left to the caller.
    pub fn handle_action(&mut self, plot_id: u64, action: PlotAction) -> Result<()> {
        match action {
            PlotAction::SpawnHistogram { series } => {
                self.spawn_histogram(plot_id, series);
            }
            PlotAction::DropColumn { column } => self.bind_column_into(plot_id, column)?,
            PlotAction::Capture | PlotAction::Focus => {}
        }
        Ok(())
    }

    /// Drop plots whose window was closed.
    pub fn sweep_closed(&mut self) {
        self.plots.retain(|p| p.is_open);
    }

    pub fn plot_by_id(&self, id: u64) -> Option<&PlotState> {
        self.plots.iter().find(|p| p.id == id)
    }

    pub fn plot_by_id_mut(&mut self, id: u64) -> Option<&mut PlotState> {
        self.plots.iter_mut().find(|p| p.id == id)
    }
}
