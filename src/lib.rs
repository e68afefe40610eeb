//! PlotDrop - drop CSV files, pick columns, plot them.
//!
//! Loaded files are listed in the main window together with the header
//! fields of the current file. Selected fields open a new figure; fields
//! can also be dragged onto an existing figure. Each figure supports data
//! tips, visibility toggling, per-series styling, histograms and a
//! screenshot export to the clipboard (HTML/RTF/bitmap) and a PNG file.
//!
//! # Example
//!
//! ```ignore
//! use plotdrop::state::app_state::AppState;
//!
//! let mut state = AppState::new();
//! state.load_paths(&["data.csv"]);
//! state.select_dataset(0);
//! state.toggle_column(1, false, false);
//! let plot_id = state.plot_selected()?;
//! ```

#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod processing;
pub mod state;
pub mod ui;

pub use error::{PlotError, Result};
