use crate::data::loader;
use crate::error::{PlotError, Result};
use crate::state::dataset::TabularDataset;

/// Default series palette (the "deep" qualitative colormap).
pub const COLOR_PALETTE: [[u8; 4]; 10] = [
    [76, 114, 176, 255],  // Blue
    [221, 132, 82, 255],  // Orange
    [85, 168, 104, 255],  // Green
    [196, 78, 82, 255],   // Red
    [129, 114, 179, 255], // Purple
    [147, 120, 96, 255],  // Brown
    [218, 139, 195, 255], // Pink
    [140, 140, 140, 255], // Gray
    [204, 185, 116, 255], // Olive
    [100, 181, 205, 255], // Cyan
];

pub fn color_for_index(index: usize) -> [u8; 4] {
    COLOR_PALETTE[index % COLOR_PALETTE.len()]
}

pub fn color32(color: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    None,
    Circle,
    Square,
    Diamond,
    Up,
    Down,
    Left,
    Right,
    Cross,
    Plus,
    Asterisk,
}

impl Default for MarkerKind {
    fn default() -> Self {
        MarkerKind::Circle
    }
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 11] = [
        MarkerKind::None,
        MarkerKind::Circle,
        MarkerKind::Square,
        MarkerKind::Diamond,
        MarkerKind::Up,
        MarkerKind::Down,
        MarkerKind::Left,
        MarkerKind::Right,
        MarkerKind::Cross,
        MarkerKind::Plus,
        MarkerKind::Asterisk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MarkerKind::None => "None",
            MarkerKind::Circle => "Circle",
            MarkerKind::Square => "Square",
            MarkerKind::Diamond => "Diamond",
            MarkerKind::Up => "Up",
            MarkerKind::Down => "Down",
            MarkerKind::Left => "Left",
            MarkerKind::Right => "Right",
            MarkerKind::Cross => "Cross",
            MarkerKind::Plus => "Plus",
            MarkerKind::Asterisk => "Asterisk",
        }
    }

    pub fn shape(&self) -> Option<egui_plot::MarkerShape> {
        use egui_plot::MarkerShape;
        match self {
            MarkerKind::None => None,
            MarkerKind::Circle => Some(MarkerShape::Circle),
            MarkerKind::Square => Some(MarkerShape::Square),
            MarkerKind::Diamond => Some(MarkerShape::Diamond),
            MarkerKind::Up => Some(MarkerShape::Up),
            MarkerKind::Down => Some(MarkerShape::Down),
            MarkerKind::Left => Some(MarkerShape::Left),
            MarkerKind::Right => Some(MarkerShape::Right),
            MarkerKind::Cross => Some(MarkerShape::Cross),
            MarkerKind::Plus => Some(MarkerShape::Plus),
            MarkerKind::Asterisk => Some(MarkerShape::Asterisk),
        }
    }
}

/// Per-series display settings edited from the legend popup.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    /// Connect samples with a line; otherwise draw a scatter.
    pub line: bool,
    pub marker: MarkerKind,
    /// Line width in points.
    pub thickness: f32,
    /// Opacity applied to marker and histogram fills.
    pub fill_alpha: f32,
    pub visible: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            line: false,
            marker: MarkerKind::default(),
            thickness: 1.0,
            fill_alpha: 0.5,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramConfig {
    pub bins: usize,
    pub cumulative: bool,
    pub density: bool,
    pub exclude_outliers: bool,
}

impl HistogramConfig {
    /// Defaults for a histogram over `len` samples; bin count from Sturges' rule.
    pub fn for_len(len: usize) -> Self {
        Self {
            bins: sturges_bins(len),
            cumulative: false,
            density: false,
            exclude_outliers: false,
        }
    }

    /// Largest bin count offered for editing.
    pub fn max_bins(len: usize) -> usize {
        (len / 2).max(2)
    }

    pub fn clamp_bins(&mut self, len: usize) {
        self.bins = self.bins.clamp(2, Self::max_bins(len));
    }
}

/// `ceil(1 + log2(n))`, never below 2.
pub fn sturges_bins(len: usize) -> usize {
    if len < 2 {
        return 2;
    }
    let bins = (1.0 + (len as f64).log2()).ceil() as usize;
    bins.max(2)
}

/// A numeric series bound from one dataset column, plus how to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBinding {
    pub label: String,
    /// Samples in row order; the index is the implicit x coordinate.
    pub values: Vec<f64>,
    pub color: [u8; 4],
    pub style: SeriesStyle,
    /// `Some` when the series is drawn as a histogram.
    pub histogram: Option<HistogramConfig>,
}

impl SeriesBinding {
    pub fn new(label: impl Into<String>, values: Vec<f64>, color: [u8; 4]) -> Self {
        Self {
            label: label.into(),
            values,
            color,
            style: SeriesStyle::default(),
            histogram: None,
        }
    }

    /// Same label, values and color, shown as a histogram.
    pub fn to_histogram(&self) -> Self {
        let mut hist = Self::new(self.label.clone(), self.values.clone(), self.color);
        hist.histogram = Some(HistogramConfig::for_len(self.values.len()));
        hist
    }

    pub fn is_histogram(&self) -> bool {
        self.histogram.is_some()
    }

    pub fn color32(&self) -> egui::Color32 {
        color32(self.color)
    }

    /// Series color with the fill alpha applied.
    pub fn fill_color32(&self) -> egui::Color32 {
        self.color32().gamma_multiply(self.style.fill_alpha.clamp(0.0, 1.0))
    }
}

/// Read one column of `dataset` into a new binding colored from `palette_index`.
///
/// Non-numeric cells become `0.0`; how many did so is logged.
pub fn bind_column(
    dataset: &TabularDataset,
    column: usize,
    palette_index: usize,
) -> Result<SeriesBinding> {
    let label = dataset.header(column).ok_or(PlotError::ColumnOutOfRange {
        column,
        columns: dataset.column_count(),
    })?;
    let (values, fallbacks) = loader::column_to_f64(dataset.column_cells(column));
    if fallbacks > 0 {
        tracing::warn!(
            "{}: {fallbacks} non-numeric cell(s) in column {label:?} read as leading number or 0",
            dataset.name
        );
    }
    Ok(SeriesBinding::new(label, values, color_for_index(palette_index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_dataset() -> TabularDataset {
        TabularDataset::new(
            "abc.csv",
            vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["1".into(), "2".into(), "3".into()],
                vec!["4".into(), "5".into(), "6".into()],
            ],
        )
    }

    #[test]
    fn bind_column_reads_label_and_values() {
        let ds = abc_dataset();
        let s = bind_column(&ds, 1, 0).unwrap();
        assert_eq!(s.label, "b");
        assert_eq!(s.values, vec![2.0, 5.0]);
        assert_eq!(s.values.len(), ds.rows().len() - 1);
        assert_eq!(s.color, COLOR_PALETTE[0]);
        assert!(!s.is_histogram());
    }

    #[test]
    fn bind_column_out_of_range() {
        let ds = abc_dataset();
        assert!(matches!(
            bind_column(&ds, 3, 0),
            Err(PlotError::ColumnOutOfRange { column: 3, columns: 3 })
        ));
    }

    #[test]
    fn sturges_rule() {
        assert_eq!(sturges_bins(16), 5);
        assert_eq!(sturges_bins(2), 2);
        assert_eq!(sturges_bins(1), 2);
        assert_eq!(sturges_bins(0), 2);
        assert_eq!(sturges_bins(100), 8);
        for n in 2..500 {
            let expected = (1.0 + (n as f64).log2()).ceil() as usize;
            assert_eq!(sturges_bins(n), expected.max(2));
        }
    }

    #[test]
    fn histogram_keeps_values_and_color() {
        let mut line = SeriesBinding::new("v", (0..16).map(|i| i as f64).collect(), [1, 2, 3, 255]);
        line.style.line = true;
        let hist = line.to_histogram();
        assert_eq!(hist.values, line.values);
        assert_eq!(hist.label, line.label);
        assert_eq!(hist.color, line.color);
        assert_eq!(hist.histogram.as_ref().map(|h| h.bins), Some(5));
    }

    #[test]
    fn bin_clamp_respects_sample_count() {
        let mut cfg = HistogramConfig::for_len(10);
        cfg.bins = 50;
        cfg.clamp_bins(10);
        assert_eq!(cfg.bins, 5);
        cfg.bins = 0;
        cfg.clamp_bins(3);
        assert_eq!(cfg.bins, 2);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(color_for_index(COLOR_PALETTE.len()), COLOR_PALETTE[0]);
        assert_eq!(color_for_index(3), COLOR_PALETTE[3]);
    }
}
