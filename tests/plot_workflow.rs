use std::io::Write;
use std::path::PathBuf;

use plotdrop::config::CaptureConfig;
use plotdrop::export::capture::CapturedImage;
use plotdrop::export::clipboard::{export_capture, ClipboardTarget, HtmlClip};
use plotdrop::processing::histogram::compute_bins;
use plotdrop::state::app_state::AppState;
use plotdrop::state::plot_state::PlotAction;
use plotdrop::PlotError;

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn drop_select_and_plot_one_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "abc.csv", "a,b,c\n1,2,3\n4,5,6\n");

    let mut state = AppState::new();
    assert!(state.load_paths(&[&path]).is_empty());
    state.select_dataset(0);
    state.toggle_column(1, false, false);

    let id = state.plot_selected().unwrap().unwrap();
    let plot = state.plot_by_id(id).unwrap();
    assert_eq!(plot.series.len(), 1);
    assert_eq!(plot.series[0].label, "b");
    assert_eq!(plot.series[0].values, vec![2.0, 5.0]);
}

#[test]
fn files_load_in_order_and_failures_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_csv(&dir, "first.csv", "x\n1\n");
    let empty = write_csv(&dir, "empty.csv", "\n\n");
    let missing = dir.path().join("missing.csv");
    let second = write_csv(&dir, "second.csv", "y\n2\n");

    let mut state = AppState::new();
    let failures = state.load_paths(&[&first, &empty, &missing, &second]);

    assert_eq!(state.datasets.len(), 2);
    assert_eq!(state.datasets[0].headers(), ["x"]);
    assert_eq!(state.datasets[1].headers(), ["y"]);
    assert_eq!(failures.len(), 2);
    assert!(matches!(failures[0].1, PlotError::EmptyFile { .. }));
    assert!(matches!(failures[1].1, PlotError::FileUnreadable { .. }));
    assert_eq!(state.selection.current_dataset(), None);
}

#[test]
fn dragged_column_comes_from_current_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let one = write_csv(&dir, "one.csv", "a,b\n1,2\n");
    let two = write_csv(&dir, "two.csv", "p,q\n7,8\n9,10\n");

    let mut state = AppState::new();
    state.load_paths(&[&one, &two]);
    state.select_dataset(0);
    state.toggle_column(0, false, false);
    let id = state.plot_selected().unwrap().unwrap();

    state.select_dataset(1);
    state.handle_action(id, PlotAction::DropColumn { column: 1 }).unwrap();

    let plot = state.plot_by_id(id).unwrap();
    assert_eq!(plot.series[1].label, "q");
    assert_eq!(plot.series[1].values, vec![8.0, 10.0]);
}

#[test]
fn histogram_of_sixteen_values_defaults_to_five_bins() {
    let rows: String = (0..16).map(|i| format!("{i}\n")).collect();
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "n.csv", &format!("n\n{rows}"));

    let mut state = AppState::new();
    state.load_paths(&[&path]);
    state.select_dataset(0);
    state.toggle_column(0, false, false);
    let id = state.plot_selected().unwrap().unwrap();
    let hist_id = state.spawn_histogram(id, 0).unwrap();

    let hist = state.plot_by_id(hist_id).unwrap();
    let config = hist.series[0].histogram.clone().unwrap();
    assert_eq!(config.bins, 5);
    let bins = compute_bins(&hist.series[0].values, &config);
    assert_eq!(bins.len(), 5);
    assert_eq!(bins.iter().map(|b| b.height).sum::<f64>(), 16.0);
}

struct NullClipboard;

impl ClipboardTarget for NullClipboard {
    fn write_html(&mut self, _html: &HtmlClip) -> plotdrop::Result<()> {
        Ok(())
    }
    fn write_rtf(&mut self, _rtf: &str) -> plotdrop::Result<()> {
        Ok(())
    }
    fn write_bitmap(&mut self, _image: &CapturedImage) -> plotdrop::Result<()> {
        Ok(())
    }
}

#[test]
fn capture_is_saved_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let config = CaptureConfig {
        path: dir.path().join("capture.png"),
        ..CaptureConfig::default()
    };
    let image = CapturedImage {
        width: 3,
        height: 2,
        rgba: vec![200; 3 * 2 * 4],
    };
    let mut target = NullClipboard;
    let report = export_capture(&image, &config, Ok(&mut target)).unwrap();
    assert!(report.is_complete());

    let decoded = image::open(&config.path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (3, 2));
}
