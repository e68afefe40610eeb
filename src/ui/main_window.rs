use crate::state::app_state::{AppState, VERSION};
use crate::state::theme::Theme;

/// Drag-and-drop payload carried from the field list to a plot window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDrag(pub usize);

/// Requests from the main window that the app handles after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    OpenFiles,
    PlotSelected,
    ToggleTheme,
    DismissStatus,
}

/// Render the header, the file/field lists and the status footer.
///
/// Clicking a file makes it current; clicking a field toggles it in the
/// selection using the current Ctrl/Shift state. Fields can also be dragged
/// onto a plot window.
pub fn show_main_window(
    ctx: &egui::Context,
    state: &mut AppState,
    theme: Theme,
    status: Option<&str>,
) -> Vec<MainAction> {
    let mut actions = Vec::new();

    egui::TopBottomPanel::top("header")
        .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("PlotDrop");
                ui.separator();
                if ui
                    .button("Open…")
                    .on_hover_text("Load one or more CSV files")
                    .clicked()
                {
                    actions.push(MainAction::OpenFiles);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(theme.toggle_label()).clicked() {
                        actions.push(MainAction::ToggleTheme);
                    }
                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
        });

    egui::TopBottomPanel::bottom("footer")
        .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let selected = state.selection.selected().len();
                let plot_btn = egui::Button::new(egui::RichText::new("PLOT").strong())
                    .min_size(egui::vec2(120.0, 28.0));
                if ui
                    .add_enabled(state.current_dataset().is_some() && selected > 0, plot_btn)
                    .on_hover_text("Open a new figure with the selected fields")
                    .clicked()
                {
                    actions.push(MainAction::PlotSelected);
                }

                ui.separator();
                let plots = state.plots.len();
                let label = if plots == 1 { "1 figure".to_string() } else { format!("{plots} figures") };
                ui.label(egui::RichText::new(label).weak());

                if let Some(msg) = status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                    if ui.small_button("dismiss").clicked() {
                        actions.push(MainAction::DismissStatus);
                    }
                }
            });
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        if state.datasets.is_empty() {
            ui.add_space(80.0);
            ui.vertical_centered(|ui| {
                ui.heading("Welcome to PlotDrop");
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new("Drop CSV files here, or click \"Open…\" above.").weak(),
                );
            });
            return;
        }

        ui.columns(2, |cols| {
            file_list(&mut cols[0], state);
            field_list(&mut cols[1], state);
        });
    });

    actions
}

fn file_list(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(egui::RichText::new("Files").strong());
    ui.add_space(2.0);
    let mut clicked = None;
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("file_list")
                .show(ui, |ui| {
                    for (i, dataset) in state.datasets.iter().enumerate() {
                        let current = state.selection.current_dataset() == Some(i);
                        if ui
                            .selectable_label(current, &dataset.name)
                            .on_hover_text(format!(
                                "{} columns, {} rows",
                                dataset.column_count(),
                                dataset.row_count()
                            ))
                            .clicked()
                        {
                            clicked = Some(i);
                        }
                    }
                });
        });
    if let Some(i) = clicked {
        tracing::debug!("Current dataset {i}");
        state.select_dataset(i);
    }
}

fn field_list(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(egui::RichText::new("Fields (Ctrl/Shift to multi-select, drag onto a figure)").strong());
    ui.add_space(2.0);
    let Some(dataset) = state.current_dataset() else {
        ui.label(egui::RichText::new("Select a file.").weak());
        return;
    };

    let mut clicked = None;
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("field_list")
                .show(ui, |ui| {
                    for (col, header) in dataset.headers().iter().enumerate() {
                        let resp = ui
                            .selectable_label(state.selection.is_selected(col), header)
                            .interact(egui::Sense::click_and_drag());
                        resp.dnd_set_drag_payload(ColumnDrag(col));
                        if resp.dragged() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                        }
                        if resp.clicked() {
                            clicked = Some(col);
                        }
                    }
                });
        });

    if let Some(col) = clicked {
        let modifiers = ui.input(|i| i.modifiers);
        state.toggle_column(col, modifiers.command, modifiers.shift);
    }
}
