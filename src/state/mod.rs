pub mod app_state;
pub mod dataset;
pub mod plot_state;
pub mod selection;
pub mod series;
pub mod theme;
