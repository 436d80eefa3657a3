use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ranking report (top of the central panel)
// ---------------------------------------------------------------------------

/// Heading plus three metric callouts, or the reason ranking failed.
pub fn ranking_report(ui: &mut Ui, state: &AppState) {
    let Some(descriptor) = state.descriptor() else {
        return;
    };

    match &state.ranking {
        None => {}
        Some(Err(e)) => {
            ui.heading(format!("\"{}\"", descriptor.label));
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
        Some(Ok(report)) => {
            ui.heading(report.heading());
            ui.columns(3, |columns: &mut [Ui]| {
                let callouts = report.neighborhoods().into_iter().zip(report.values());
                for (col, (name, value)) in columns.iter_mut().zip(callouts) {
                    col.label(name);
                    col.label(RichText::new(descriptor.scale.format(value)).size(28.0));
                }
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Neighborhood table (below the map)
// ---------------------------------------------------------------------------

/// Selected neighborhoods with their value for the current statistic.
pub fn neighborhood_table(ui: &mut Ui, state: &AppState) {
    let Some(descriptor) = state.descriptor() else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .column(Column::auto().at_least(220.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong(crate::config::NAME_COLUMN);
            });
            header.col(|ui: &mut Ui| {
                ui.strong(&descriptor.label);
            });
        })
        .body(|mut body| {
            for rec in state.view.records() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&rec.name);
                    });
                    row.col(|ui: &mut Ui| {
                        let text = rec
                            .value(&descriptor.key)
                            .map(|v| descriptor.scale.format(v))
                            .unwrap_or_default();
                        ui.label(text);
                    });
                });
            }
        });
}
