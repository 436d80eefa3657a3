use eframe::egui;

use crate::config::DEFAULT_DATASET_PATH;
use crate::state::AppState;
use crate::ui::{map, panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AtlasApp {
    pub state: AppState,
}

impl AtlasApp {
    /// Start with the bundled dataset when it is available.
    pub fn new() -> Self {
        let mut state = AppState::default();
        panels::open_default_dataset(&mut state, std::path::Path::new(DEFAULT_DATASET_PATH));
        Self { state }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selections ----
        egui::SidePanel::left("selection_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: ranking, map, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a neighborhood table  (File → Open…)");
                });
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                report::ranking_report(ui, &self.state);
                ui.separator();
                map::choropleth_map(ui, &mut self.state);
                ui.separator();
                egui::CollapsingHeader::new("Selected neighborhoods")
                    .default_open(false)
                    .show(ui, |ui| {
                        report::neighborhood_table(ui, &self.state);
                    });
            });
        });
    }
}
