use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoints, Polygon};

use crate::choropleth::{Choropleth, Legend};
use crate::config::BaseLayer;
use crate::state::AppState;

const MAP_HEIGHT: f32 = 600.0;
const FILL_ALPHA: u8 = 190;

fn base_color(layer: BaseLayer) -> Color32 {
    match layer {
        BaseLayer::Light => Color32::from_rgb(0xf2, 0xf2, 0xef),
    }
}

// ---------------------------------------------------------------------------
// Choropleth map (central panel)
// ---------------------------------------------------------------------------

/// Render the legend and the choropleth of the current selection.
pub fn choropleth_map(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Reset view").clicked() {
            state.reset_view();
        }
        if ui.button("Fit selection").clicked() {
            state.fit_selection();
        }
    });

    let Some(map) = &state.choropleth else {
        return;
    };
    let pending = state.pending_bounds.take();

    let legend_hover = match &map.legend {
        Some(legend) if !state.view.is_empty() => legend_bar(ui, legend),
        _ => {
            ui.label("No neighborhoods selected.");
            None
        }
    };

    let hovered = draw_regions(ui, map, pending, legend_hover);

    if let Some(region) = hovered.inner.and_then(|i| map.regions.get(i)) {
        hovered.response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            for (alias, text) in &region.tooltip {
                ui.horizontal(|ui: &mut Ui| {
                    ui.strong(alias);
                    ui.label(text);
                });
            }
        });
    }
}

/// Draw every region; returns the index of the region under the pointer.
fn draw_regions(
    ui: &mut Ui,
    map: &Choropleth,
    pending: Option<([f64; 2], [f64; 2])>,
    legend_hover: Option<usize>,
) -> egui_plot::PlotResponse<Option<usize>> {
    let background = base_color(map.view.base_layer);
    let frame = egui::Rect::from_min_size(
        ui.cursor().min,
        egui::vec2(ui.available_width(), MAP_HEIGHT),
    );
    ui.painter().rect_filled(frame, 4.0, background);

    Plot::new("choropleth")
        .height(MAP_HEIGHT)
        .data_aspect((1.0 / map.view.lon_scale()) as f32)
        .show_background(false)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if let Some((min, max)) = pending {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }

            let hovered = plot_ui
                .pointer_coordinate()
                .and_then(|p| map.region_at(p.x, p.y));

            for (idx, region) in map.regions.iter().enumerate() {
                let highlighted = hovered == Some(idx) || legend_hover == Some(region.bin);
                let stroke = if highlighted {
                    Stroke::new(2.5, Color32::BLACK)
                } else {
                    Stroke::new(0.8, Color32::from_gray(90))
                };
                let [r, g, b, _] = region.fill.to_array();
                let fill = Color32::from_rgba_unmultiplied(r, g, b, FILL_ALPHA);

                for polygon in &region.geometry {
                    plot_ui.polygon(
                        Polygon::new(ring_points(polygon.exterior()))
                            .fill_color(fill)
                            .stroke(stroke),
                    );

                    for hole in polygon.interiors() {
                        plot_ui.polygon(
                            Polygon::new(ring_points(hole))
                                .fill_color(background)
                                .stroke(stroke),
                        );
                    }
                }
            }

            hovered
        })
}

fn ring_points(ring: &geo::LineString<f64>) -> PlotPoints {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// Colour bar for the current statistic. Returns the bin under the pointer,
/// whose regions the map then outlines.
fn legend_bar(ui: &mut Ui, legend: &Legend) -> Option<usize> {
    let mut hovered = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(&legend.label).strong());
        ui.add_space(8.0);
        ui.label(format_bound(legend.min));
        for (i, bin) in legend.bins.iter().enumerate() {
            let (rect, response) = ui.allocate_exact_size(egui::vec2(44.0, 14.0), Sense::hover());
            ui.painter().rect_filled(rect, 0.0, bin.color);
            if response.hovered() {
                hovered = Some(i);
                ui.painter()
                    .rect_stroke(rect, 0.0, Stroke::new(1.5, Color32::BLACK), egui::StrokeKind::Outside);
            }
            response.on_hover_text(format!(
                "{} – {}",
                format_bound(bin.lower),
                format_bound(bin.upper)
            ));
        }
        ui.label(format_bound(legend.max));
    });
    hovered
}

fn format_bound(value: f64) -> String {
    crate::data::model::format_grouped(value, 2)
}
