pub mod main_window;
pub mod plot_window;
