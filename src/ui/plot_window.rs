use egui_plot::{Bar, BarChart, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::config::PlotKeys;
use crate::processing::histogram;
use crate::processing::statistics::SeriesStats;
use crate::state::plot_state::{PlotAction, PlotState};
use crate::state::series::{color32, HistogramConfig, MarkerKind, SeriesBinding};
use crate::ui::main_window::ColumnDrag;

const MARKER_RADIUS: f32 = 3.0;
const TIP_RADIUS: f32 = 4.5;

/// Render one plot in its own window. `focused` is true when this window was
/// the last one clicked; only then are the plot shortcuts active.
pub fn show_plot_window(
    ctx: &egui::Context,
    plot: &mut PlotState,
    keys: &PlotKeys,
    focused: bool,
) -> Vec<PlotAction> {
    let mut actions = Vec::new();
    let mut open = plot.is_open;

    if plot.initialize_axes() {
        tracing::debug!("{}: axes {:?} / {:?}", plot.title, plot.x_label, plot.y_label);
    }

    let window = egui::Window::new(plot.title.clone())
        .id(egui::Id::new(("plot_window", plot.id)))
        .open(&mut open)
        .default_size([800.0, 600.0])
        .show(ctx, |ui| {
            show_legend_strip(ui, plot, &mut actions);
            show_axis_editor(ui, plot);
            ui.separator();
            show_plot_area(ui, plot, keys, focused, &mut actions);
        });

    if let Some(window) = window {
        let pressed = ctx.input(|i| i.pointer.any_pressed());
        if pressed && window.response.contains_pointer() && !focused {
            actions.push(PlotAction::Focus);
        }
    }

    plot.is_open = open;
    actions
}

fn show_legend_strip(ui: &mut egui::Ui, plot: &mut PlotState, actions: &mut Vec<PlotAction>) {
    let mut toggle = None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 10.0;
        for (index, series) in plot.series.iter_mut().enumerate() {
            ui.push_id(index, |ui| {
                let text_color = if series.style.visible {
                    series.color32()
                } else {
                    ui.visuals().weak_text_color()
                };
                let resp = ui
                    .add(
                        egui::Label::new(egui::RichText::new(format!("■ {}", series.label)).color(text_color))
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_text("Click to show/hide, right-click to configure");
                if resp.clicked() {
                    toggle = Some(index);
                }
                resp.context_menu(|ui| {
                    series_config_popup(ui, index, series, actions);
                });
            });
        }
    });
    if let Some(index) = toggle {
        plot.toggle_series_visibility(index);
    }
}

fn show_axis_editor(ui: &mut egui::Ui, plot: &mut PlotState) {
    let mut x_label = plot.x_label.clone();
    let mut y_label = plot.y_label.clone();
    let changed = ui
        .horizontal(|ui| {
            ui.label("X axis");
            let x = ui.add(egui::TextEdit::singleline(&mut x_label).desired_width(160.0));
            ui.label("Y axis");
            let y = ui.add(egui::TextEdit::singleline(&mut y_label).desired_width(160.0));
            x.changed() || y.changed()
        })
        .inner;
    if changed {
        plot.set_axis_labels(x_label, y_label);
    }
}

fn series_config_popup(
    ui: &mut egui::Ui,
    index: usize,
    series: &mut SeriesBinding,
    actions: &mut Vec<PlotAction>,
) {
    ui.set_min_width(240.0);
    let heading = ui.label(egui::RichText::new(&series.label).strong());
    if let Some(stats) = SeriesStats::compute(&series.values) {
        heading.on_hover_text(stats.report(&series.label));
    }
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Color");
        ui.color_edit_button_srgba_unmultiplied(&mut series.color);
    });

    let len = series.values.len();
    match series.histogram.as_mut() {
        None => {
            ui.checkbox(&mut series.style.line, "Line");
            if series.style.line {
                ui.add(egui::Slider::new(&mut series.style.thickness, 0.0..=5.0).text("Thickness"));
            }
            egui::ComboBox::from_id_salt("marker")
                .selected_text(series.style.marker.label())
                .show_ui(ui, |ui| {
                    for kind in MarkerKind::ALL {
                        ui.selectable_value(&mut series.style.marker, kind, kind.label());
                    }
                })
                .response
                .on_hover_text("Marker");
        }
        Some(config) => {
            ui.checkbox(&mut config.cumulative, "Cumulative");
            ui.checkbox(&mut config.density, "Density");
            ui.checkbox(&mut config.exclude_outliers, "Remove outliers");
            config.clamp_bins(len);
            ui.add(
                egui::Slider::new(&mut config.bins, 2..=HistogramConfig::max_bins(len)).text("Bins"),
            );
        }
    }

    if series.style.marker != MarkerKind::None || series.is_histogram() {
        ui.add(egui::Slider::new(&mut series.style.fill_alpha, 0.0..=1.0).text("Fill"));
    }

    if !series.is_histogram() {
        ui.add_space(4.0);
        if ui.button("Histogram").clicked() {
            actions.push(PlotAction::SpawnHistogram { series: index });
            ui.close_menu();
        }
    }
}

fn series_points(series: &SeriesBinding) -> PlotPoints<'_> {
    series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect()
}

fn show_plot_area(
    ui: &mut egui::Ui,
    plot: &mut PlotState,
    keys: &PlotKeys,
    focused: bool,
    actions: &mut Vec<PlotAction>,
) {
    let area = ui.vertical(|ui| {
        Plot::new(("plot", plot.id))
            .x_axis_label(plot.x_label.clone())
            .y_axis_label(plot.y_label.clone())
            .show(ui, |plot_ui| {
                for annotation in &plot.annotations {
                    let color = color32(annotation.color);
                    let [x, y] = annotation.point;
                    plot_ui.points(
                        Points::new(vec![annotation.point])
                            .shape(MarkerShape::Circle)
                            .radius(TIP_RADIUS)
                            .filled(true)
                            .color(color),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), format!("  {x:.0}, {y:.3}"))
                            .color(color)
                            .anchor(egui::Align2::LEFT_BOTTOM),
                    );
                }

                for (index, series) in plot.series.iter().enumerate() {
                    if !series.style.visible {
                        continue;
                    }
                    let name = format!("{} #{index}", series.label);
                    match &series.histogram {
                        Some(config) => {
                            let bars: Vec<Bar> = histogram::compute_bins(&series.values, config)
                                .into_iter()
                                .map(|b| {
                                    Bar::new(b.center, b.height)
                                        .width(b.width)
                                        .fill(series.fill_color32())
                                        .stroke(egui::Stroke::new(1.0, series.color32()))
                                })
                                .collect();
                            plot_ui.bar_chart(BarChart::new(bars).name(name).color(series.color32()));
                        }
                        None if series.style.line => {
                            plot_ui.line(
                                Line::new(series_points(series))
                                    .color(series.color32())
                                    .width(series.style.thickness)
                                    .name(&name),
                            );
                            if let Some(shape) = series.style.marker.shape() {
                                plot_ui.points(marker_points(series, shape).name(name));
                            }
                        }
                        None => {
                            let shape = series.style.marker.shape().unwrap_or(MarkerShape::Circle);
                            plot_ui.points(marker_points(series, shape).name(name));
                        }
                    }
                }

                plot_ui.pointer_coordinate()
            })
    });
    let response = area.inner;
    plot.plot_rect = Some(area.response.rect);

    if response.response.dnd_hover_payload::<ColumnDrag>().is_some() {
        ui.painter().rect_stroke(
            response.response.rect,
            egui::CornerRadius::same(4),
            egui::Stroke::new(2.0, egui::Color32::from_rgb(80, 140, 255)),
            egui::StrokeKind::Inside,
        );
    }
    if let Some(payload) = response.response.dnd_release_payload::<ColumnDrag>() {
        actions.push(PlotAction::DropColumn { column: payload.0 });
    }

    if focused && !ui.ctx().wants_keyboard_input() {
        let (tip, toggle, capture) = ui.input(|i| {
            (
                i.key_pressed(keys.data_tip),
                i.key_pressed(keys.toggle_visibility),
                i.key_pressed(keys.capture),
            )
        });
        if tip {
            if let Some(pointer) = response.inner {
                plot.add_data_tip(pointer.x, pointer.y);
            }
        }
        if toggle {
            plot.toggle_all_visibility();
        }
        if capture {
            actions.push(PlotAction::Capture);
        }
    }
}

fn marker_points(series: &SeriesBinding, shape: MarkerShape) -> Points<'_> {
    let filled = series.style.fill_alpha > 0.0;
    let color = if filled { series.fill_color32() } else { series.color32() };
    Points::new(series_points(series))
        .shape(shape)
        .radius(MARKER_RADIUS)
        .filled(filled)
        .color(color)
}
