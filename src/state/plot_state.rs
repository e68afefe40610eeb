use crate::state::series::{color_for_index, SeriesBinding};

/// A user-placed data tip: the sample nearest to where the user pressed the
/// data-tip key, drawn in the palette color of the series it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub point: [f64; 2],
    pub color: [u8; 4],
}

/// Result of a nearest-sample search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestSample {
    pub series_index: usize,
    pub sample_index: usize,
    pub point: [f64; 2],
    /// Squared distance in plot coordinates.
    pub distance_sq: f64,
}

/// Requests a plot window makes of the application; handled after the
/// frame's UI has been laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotAction {
    /// Open a histogram plot of the series at this index.
    SpawnHistogram { series: usize },
    /// A column of the current dataset was dropped on the plot.
    DropColumn { column: usize },
    /// Copy the plot region to the clipboard and the capture file.
    Capture,
    /// The window was clicked and now receives plot shortcuts.
    Focus,
}

#[derive(Debug, Clone)]
pub struct PlotState {
    pub id: u64,
    pub title: String,
    pub series: Vec<SeriesBinding>,
    pub annotations: Vec<Annotation>,
    pub x_label: String,
    pub y_label: String,
    /// Axis labels are set once, on the first render.
    pub axis_initialized: bool,
    /// Cleared when the user closes the window; swept by the app afterwards.
    pub is_open: bool,
    /// Screen rect of the plot region (set each frame for screenshot cropping).
    pub plot_rect: Option<egui::Rect>,
}

impl PlotState {
    /// `number` is the figure counter value used for the title.
    pub fn new(id: u64, number: u64) -> Self {
        Self {
            id,
            title: format!("Figure {number}"),
            series: Vec::new(),
            annotations: Vec::new(),
            x_label: String::new(),
            y_label: String::new(),
            axis_initialized: false,
            is_open: true,
            plot_rect: None,
        }
    }

    /// Palette index the next appended series would get.
    pub fn next_palette_index(&self) -> usize {
        self.series.len()
    }

    pub fn add_series(&mut self, series: SeriesBinding) {
        self.series.push(series);
    }

    pub fn is_histogram_plot(&self) -> bool {
        !self.series.is_empty() && self.series.iter().all(|s| s.is_histogram())
    }

    /// One-shot axis setup. Returns `true` on the call that initialized.
    pub fn initialize_axes(&mut self) -> bool {
        if self.axis_initialized {
            return false;
        }
        if self.is_histogram_plot() {
            self.x_label = "Value".to_string();
            self.y_label = match self.series[0].histogram.as_ref() {
                Some(h) if h.density => "Density".to_string(),
                _ => "Count".to_string(),
            };
        } else {
            self.x_label = "Sample".to_string();
            self.y_label = "Value".to_string();
        }
        self.axis_initialized = true;
        true
    }

    /// Find the sample closest to `(x, y)` over every series, where a
    /// sample's x coordinate is its row index. Ties keep the first found.
    pub fn nearest_sample(&self, x: f64, y: f64) -> Option<NearestSample> {
        let mut best: Option<NearestSample> = None;
        let mut best_dist = f64::MAX;
        for (series_index, series) in self.series.iter().enumerate() {
            for (sample_index, &v) in series.values.iter().enumerate() {
                let dx = sample_index as f64 - x;
                let dy = v - y;
                let dist = dx * dx + dy * dy;
                if dist < best_dist {
                    best_dist = dist;
                    best = Some(NearestSample {
                        series_index,
                        sample_index,
                        point: [sample_index as f64, v],
                        distance_sq: dist,
                    });
                }
            }
        }
        best
    }

    /// Append a data tip at the sample nearest to `(x, y)`.
    pub fn add_data_tip(&mut self, x: f64, y: f64) -> Option<Annotation> {
        let nearest = self.nearest_sample(x, y)?;
        let annotation = Annotation {
            point: nearest.point,
            color: color_for_index(nearest.series_index),
        };
        tracing::debug!(
            "{}: data tip at ({}, {}) on series {}",
            self.title,
            annotation.point[0],
            annotation.point[1],
            nearest.series_index
        );
        self.annotations.push(annotation);
        Some(annotation)
    }

    /// Rename the axes. An explicit label always wins over the defaults
    /// `initialize_axes` would pick.
    pub fn set_axis_labels(&mut self, x_label: impl Into<String>, y_label: impl Into<String>) {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self.axis_initialized = true;
    }

    /// Flip visibility of every series at once.
    pub fn toggle_all_visibility(&mut self) {
        for s in &mut self.series {
            s.style.visible = !s.style.visible;
        }
    }

    pub fn toggle_series_visibility(&mut self, index: usize) {
        if let Some(s) = self.series.get_mut(index) {
            s.style.visible = !s.style.visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::series::COLOR_PALETTE;

    fn plot_with(values: &[&[f64]]) -> PlotState {
        let mut plot = PlotState::new(1, 1);
        for (i, v) in values.iter().enumerate() {
            plot.add_series(SeriesBinding::new(format!("s{i}"), v.to_vec(), [9, 9, 9, 255]));
        }
        plot
    }

    #[test]
    fn title_uses_counter() {
        assert_eq!(PlotState::new(7, 3).title, "Figure 3");
    }

    #[test]
    fn data_tip_on_exact_sample() {
        let mut plot = plot_with(&[&[1.0, 4.0, 9.0]]);
        let nearest = plot.nearest_sample(1.0, 4.0).unwrap();
        assert_eq!(nearest.point, [1.0, 4.0]);
        assert_eq!(nearest.distance_sq, 0.0);

        let tip = plot.add_data_tip(1.0, 4.0).unwrap();
        assert_eq!(tip.point, [1.0, 4.0]);
        assert_eq!(plot.annotations, vec![tip]);
    }

    #[test]
    fn data_tip_uses_palette_color_of_series_index() {
        let mut plot = plot_with(&[&[100.0, 100.0], &[0.0, 0.0]]);
        let tip = plot.add_data_tip(0.0, 0.1).unwrap();
        assert_eq!(tip.point, [0.0, 0.0]);
        assert_eq!(tip.color, COLOR_PALETTE[1]);
    }

    #[test]
    fn ties_go_to_first_series_then_first_index() {
        let plot = plot_with(&[&[1.0, 1.0], &[1.0]]);
        let nearest = plot.nearest_sample(0.5, 1.0).unwrap();
        assert_eq!(nearest.series_index, 0);
        assert_eq!(nearest.sample_index, 0);
    }

    #[test]
    fn data_tip_on_empty_plot_appends_nothing() {
        let mut plot = PlotState::new(1, 1);
        assert!(plot.add_data_tip(0.0, 0.0).is_none());
        assert!(plot.annotations.is_empty());
    }

    #[test]
    fn toggle_all_flips_each_series() {
        let mut plot = plot_with(&[&[1.0], &[2.0]]);
        plot.series[1].style.visible = false;
        plot.toggle_all_visibility();
        assert!(!plot.series[0].style.visible);
        assert!(plot.series[1].style.visible);
    }

    #[test]
    fn axes_initialize_once() {
        let mut plot = plot_with(&[&[1.0]]);
        assert!(plot.initialize_axes());
        plot.x_label = "Time".to_string();
        assert!(!plot.initialize_axes());
        assert_eq!(plot.x_label, "Time");
    }

    #[test]
    fn edited_axis_labels_survive_initialization() {
        let mut plot = plot_with(&[&[1.0]]);
        plot.initialize_axes();
        plot.set_axis_labels("Time", "Diff [Kg]");
        assert!(!plot.initialize_axes());
        assert_eq!((plot.x_label.as_str(), plot.y_label.as_str()), ("Time", "Diff [Kg]"));

        let mut fresh = plot_with(&[&[1.0]]);
        fresh.set_axis_labels("t", "");
        assert!(!fresh.initialize_axes());
        assert_eq!(fresh.x_label, "t");
        assert_eq!(fresh.y_label, "");
    }

    #[test]
    fn legend_click_toggles_one_series() {
        let mut plot = plot_with(&[&[1.0], &[2.0]]);
        plot.toggle_series_visibility(1);
        assert!(plot.series[0].style.visible);
        assert!(!plot.series[1].style.visible);
        plot.toggle_series_visibility(1);
        assert!(plot.series[1].style.visible);
        plot.toggle_series_visibility(5);
        assert!(plot.series.iter().all(|s| s.style.visible));
    }

    #[test]
    fn histogram_plot_axis_labels() {
        let mut plot = PlotState::new(1, 1);
        plot.add_series(SeriesBinding::new("h", vec![1.0, 2.0], [0; 4]).to_histogram());
        plot.initialize_axes();
        assert_eq!(plot.x_label, "Value");
        assert_eq!(plot.y_label, "Count");
    }
}
