use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – statistic and neighborhood selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Choose A Statistic To Display");
    let current = state
        .descriptor()
        .map(|d| d.label.clone())
        .unwrap_or_default();
    let labels: Vec<String> = state
        .catalog
        .descriptors()
        .iter()
        .map(|d| d.label.clone())
        .collect();
    egui::ComboBox::from_id_salt("statistic")
        .width(ui.available_width())
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for (i, label) in labels.iter().enumerate() {
                if ui.selectable_label(current == *label, label).clicked() {
                    state.set_statistic(i);
                }
            }
        });
    ui.separator();

    ui.heading("Choose The Neighborhoods");
    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let n_selected = state.selection.len();
    let n_total = state.neighborhood_options.len();
    ui.label(format!("{n_selected}/{n_total} selected"));

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
        if ui.small_button("Defaults").clicked() {
            state.select_defaults();
        }
    });
    ui.add(egui::TextEdit::singleline(&mut state.neighborhood_query).hint_text("Search…"));

    // Clone what we need so we can mutate state inside the loop.
    let query = state.neighborhood_query.to_lowercase();
    let options: Vec<String> = state
        .neighborhood_options
        .iter()
        .filter(|n| query.is_empty() || n.to_lowercase().contains(&query))
        .cloned()
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in &options {
                let mut checked = state.selection.contains(name);
                if ui.checkbox(&mut checked, name).changed() {
                    state.toggle_neighborhood(name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.choropleth.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export map as GeoJSON…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} neighborhoods loaded, {} selected",
                table.len(),
                state.view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open neighborhood table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export map")
        .add_filter("GeoJSON", &["geojson", "json"])
        .set_file_name("choropleth.geojson")
        .save_file();

    if let Some(path) = file {
        state.export_geojson(&path);
    }
}

/// Load the bundled dataset if it is present next to the executable's
/// working directory.
pub fn open_default_dataset(state: &mut AppState, path: &Path) {
    if path.exists() {
        state.load(path);
    } else {
        log::info!("{} not found, waiting for File → Open…", path.display());
        state.status_message = Some("Open a neighborhood table (File → Open…)".to_string());
    }
}
