use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;

use crate::config::{AppConfig, PlotKeys};
use crate::error::{PlotError, Result};
use crate::export::capture::{crop_screenshot, CapturedImage};
use crate::export::clipboard::{export_capture, system_clipboard, ClipboardTarget, ExportReport};
use crate::state::app_state::AppState;
use crate::state::plot_state::PlotAction;
use crate::state::theme::Theme;
use crate::ui::main_window::{self, MainAction};
use crate::ui::plot_window;

/// Frames a screenshot request may stay undelivered before it is dropped.
const CAPTURE_TIMEOUT_FRAMES: u64 = 30;

/// Screenshot requests waiting for the backend, with the frame each was made on.
#[derive(Debug, Default)]
struct PendingCaptures {
    requests: Vec<(u64, u64)>,
}

impl PendingCaptures {
    /// Record a request; `false` if one for this plot is already in flight.
    fn request(&mut self, plot_id: u64, frame: u64) -> bool {
        if self.requests.iter().any(|&(id, _)| id == plot_id) {
            return false;
        }
        self.requests.push((plot_id, frame));
        true
    }

    /// Remove the request for `plot_id`, returning whether there was one.
    fn take(&mut self, plot_id: u64) -> bool {
        let before = self.requests.len();
        self.requests.retain(|&(id, _)| id != plot_id);
        self.requests.len() != before
    }

    /// Drop requests older than the timeout and return their plot ids.
    fn expire(&mut self, frame: u64) -> Vec<u64> {
        let mut expired = Vec::new();
        self.requests.retain(|&(id, requested)| {
            let alive = frame.saturating_sub(requested) <= CAPTURE_TIMEOUT_FRAMES;
            if !alive {
                expired.push(id);
            }
            alive
        });
        expired
    }

    fn retain_plots(&mut self, keep: impl Fn(u64) -> bool) {
        self.requests.retain(|&(id, _)| keep(id));
    }

    fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// The PlotDrop application.
pub struct PlotDropApp {
    pub state: AppState,
    config: AppConfig,
    keys: PlotKeys,
    theme: Theme,
    /// Plot that receives keyboard shortcuts (last window clicked).
    focused_plot: Option<u64>,
    /// Plots with a screenshot requested but not yet delivered.
    pending_captures: PendingCaptures,
    frame: u64,
    /// Opened on first capture and kept for the app's lifetime.
    clipboard: Option<Box<dyn ClipboardTarget>>,
    /// Latest user-facing error, shown in the footer until dismissed.
    pub error_message: Option<String>,
}

impl PlotDropApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, files: Vec<PathBuf>) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(20.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);

        let theme = config.window.theme;
        ctx.set_visuals(theme.visuals());

        let mut app = Self {
            state: AppState::new(),
            keys: config.keys.resolve(),
            config,
            theme,
            focused_plot: None,
            pending_captures: PendingCaptures::default(),
            frame: 0,
            clipboard: None,
            error_message: None,
        };
        if !files.is_empty() {
            app.load_files(&files);
        }
        app
    }

    /// Load files in order, reporting the last failure in the footer.
    fn load_files(&mut self, paths: &[PathBuf]) {
        let failures = self.state.load_paths(paths);
        if let Some((_, err)) = failures.last() {
            self.error_message = Some(if failures.len() > 1 {
                format!("{err} (and {} more)", failures.len() - 1)
            } else {
                err.to_string()
            });
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_files()
        {
            self.load_files(&paths);
        }
    }

    fn plot_selected(&mut self) {
        match self.state.plot_selected() {
            Ok(Some(id)) => self.focused_plot = Some(id),
            Ok(None) => {}
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    fn request_capture(&mut self, ctx: &egui::Context, plot_id: u64) {
        if !self.pending_captures.request(plot_id, self.frame) {
            return;
        }
        tracing::debug!("Requesting screenshot for plot {plot_id}");
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::new(plot_id)));
    }

    /// Crop a delivered screenshot to the plot and export it.
    fn finish_capture(&mut self, plot_id: u64, image: &egui::ColorImage, pixels_per_point: f32) {
        let captured = self
            .state
            .plot_by_id(plot_id)
            .and_then(|p| p.plot_rect)
            .ok_or(PlotError::CaptureUnavailable)
            .and_then(|rect| {
                crop_screenshot(
                    image,
                    rect,
                    pixels_per_point,
                    self.config.capture.max_width as usize,
                    self.config.capture.max_height as usize,
                )
            });

        match captured.and_then(|c| self.export(&c)) {
            Ok(report) if report.is_complete() => {}
            Ok(report) => {
                let steps: Vec<String> = report
                    .failures
                    .iter()
                    .map(|(step, e)| format!("{step:?}: {e}"))
                    .collect();
                self.error_message = Some(format!("Capture incomplete ({})", steps.join("; ")));
            }
            Err(e) => {
                tracing::warn!("Capture of plot {plot_id} skipped: {e}");
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn export(&mut self, captured: &CapturedImage) -> Result<ExportReport> {
        let mut open_error = None;
        if self.clipboard.is_none() {
            match system_clipboard() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => open_error = Some(e),
            }
        }
        let target: Result<&mut dyn ClipboardTarget> = match self.clipboard.as_deref_mut() {
            Some(clipboard) => Ok(clipboard),
            None => Err(open_error.unwrap_or_else(|| PlotError::clipboard("clipboard unavailable"))),
        };
        export_capture(captured, &self.config.capture, target)
    }

    fn apply_plot_action(&mut self, ctx: &egui::Context, plot_id: u64, action: PlotAction) {
        match action {
            PlotAction::Focus => self.focused_plot = Some(plot_id),
            PlotAction::Capture => self.request_capture(ctx, plot_id),
            other => {
                if let Err(e) = self.state.handle_action(plot_id, other) {
                    tracing::warn!("Plot {plot_id}: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
        }
    }
}

impl eframe::App for PlotDropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ------------------------------------------------------------------
        // 0. Screenshots requested on earlier frames
        // ------------------------------------------------------------------
        if !self.pending_captures.is_empty() {
            let mut delivered: Vec<(u64, Arc<egui::ColorImage>)> = Vec::new();
            ctx.input(|i| {
                for event in &i.raw.events {
                    if let egui::Event::Screenshot { image, user_data, .. } = event {
                        let plot_id = user_data
                            .data
                            .as_ref()
                            .and_then(|d| d.downcast_ref::<u64>())
                            .copied();
                        if let Some(plot_id) = plot_id {
                            delivered.push((plot_id, image.clone()));
                        }
                    }
                }
            });

            let ppp = ctx.pixels_per_point();
            for (plot_id, image) in delivered {
                if self.pending_captures.take(plot_id) {
                    self.finish_capture(plot_id, &image, ppp);
                }
            }
        }

        // ------------------------------------------------------------------
        // 1. Files dropped on the window
        // ------------------------------------------------------------------
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.load_files(&dropped);
        }

        // ------------------------------------------------------------------
        // 2. Main window and plot windows
        // ------------------------------------------------------------------
        let main_actions = main_window::show_main_window(
            ctx,
            &mut self.state,
            self.theme,
            self.error_message.as_deref(),
        );

        let mut plot_actions: Vec<(u64, PlotAction)> = Vec::new();
        for plot in &mut self.state.plots {
            let focused = self.focused_plot == Some(plot.id);
            let id = plot.id;
            for action in plot_window::show_plot_window(ctx, plot, &self.keys, focused) {
                plot_actions.push((id, action));
            }
        }

        // ------------------------------------------------------------------
        // 3. Actions collected during layout
        // ------------------------------------------------------------------
        for action in main_actions {
            match action {
                MainAction::OpenFiles => self.open_file_dialog(),
                MainAction::PlotSelected => self.plot_selected(),
                MainAction::ToggleTheme => {
                    self.theme = self.theme.toggle();
                    ctx.set_visuals(self.theme.visuals());
                }
                MainAction::DismissStatus => self.error_message = None,
            }
        }

        for (plot_id, action) in plot_actions {
            self.apply_plot_action(ctx, plot_id, action);
        }

        // ------------------------------------------------------------------
        // 4. Closed windows
        // ------------------------------------------------------------------
        self.state.sweep_closed();
        if let Some(id) = self.focused_plot {
            if self.state.plot_by_id(id).is_none() {
                self.focused_plot = None;
            }
        }
        let state = &self.state;
        self.pending_captures.retain_plots(|id| state.plot_by_id(id).is_some());
        for plot_id in self.pending_captures.expire(self.frame) {
            tracing::warn!("Screenshot for plot {plot_id} never arrived");
            self.error_message = Some(PlotError::CaptureUnavailable.to_string());
        }
        self.frame += 1;
        if !self.pending_captures.is_empty() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_request_is_ignored_until_delivered() {
        let mut pending = PendingCaptures::default();
        assert!(pending.request(1, 0));
        assert!(!pending.request(1, 1));
        assert!(pending.take(1));
        assert!(!pending.take(1));
        assert!(pending.request(1, 2));
    }

    #[test]
    fn undelivered_request_expires() {
        let mut pending = PendingCaptures::default();
        pending.request(1, 0);
        pending.request(2, 20);
        assert!(pending.expire(CAPTURE_TIMEOUT_FRAMES).is_empty());
        assert_eq!(pending.expire(CAPTURE_TIMEOUT_FRAMES + 1), vec![1]);
        assert!(pending.request(1, CAPTURE_TIMEOUT_FRAMES + 1));
        assert!(!pending.is_empty());
    }

    #[test]
    fn closed_plots_lose_their_requests() {
        let mut pending = PendingCaptures::default();
        pending.request(1, 0);
        pending.request(2, 0);
        pending.retain_plots(|id| id == 2);
        assert!(!pending.take(1));
        assert!(pending.take(2));
        assert!(pending.is_empty());
    }
}
