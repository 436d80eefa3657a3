use std::path::Path;

use crate::choropleth::{build_choropleth, Choropleth};
use crate::config::{MapView, StatisticCatalog};
use crate::data::filter::{all_names, default_selection, filter, Selection};
use crate::data::model::{NeighborhoodTable, StatisticDescriptor};
use crate::data::ranking::{rank_extremes, RankingError, RankingReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The base table is read-only once loaded. Every selection change goes
/// through [`AppState::recompute`], which derives a fresh filtered view, the
/// ranking report and the choropleth from it.
pub struct AppState {
    /// Loaded base table (None until a file is loaded).
    pub table: Option<NeighborhoodTable>,

    /// Statistics offered in the selector.
    pub catalog: StatisticCatalog,

    /// Index into `catalog` of the displayed statistic.
    pub statistic: usize,

    /// Neighborhoods chosen in the multi-select.
    pub selection: Selection,

    /// Sorted option list for the multi-select.
    pub neighborhood_options: Vec<String>,

    /// Text typed into the neighborhood search box.
    pub neighborhood_query: String,

    /// Base table narrowed to `selection`.
    pub view: NeighborhoodTable,

    /// Result of ranking `view` by the current statistic.
    pub ranking: Option<Result<RankingReport, RankingError>>,

    /// Map model for `view` and the current statistic.
    pub choropleth: Option<Choropleth>,

    /// Initial camera of the map.
    pub map_view: MapView,

    /// Bounds the map should jump to on the next frame.
    pub pending_bounds: Option<([f64; 2], [f64; 2])>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            catalog: StatisticCatalog::standard(),
            statistic: 0,
            selection: Selection::new(),
            neighborhood_options: Vec::new(),
            neighborhood_query: String::new(),
            view: NeighborhoodTable::default(),
            ranking: None,
            choropleth: None,
            map_view: MapView::standard(),
            pending_bounds: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a table from `path`, reporting failures in the status line.
    pub fn load(&mut self, path: &Path) {
        match crate::data::loader::load_file(path, &self.catalog) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table with the default selection.
    pub fn set_table(&mut self, table: NeighborhoodTable) {
        self.neighborhood_options = all_names(&table);
        self.selection = default_selection(&table);
        self.table = Some(table);
        self.status_message = None;
        self.reset_view();
        self.recompute();
    }

    pub fn descriptor(&self) -> Option<&StatisticDescriptor> {
        self.catalog.get(self.statistic)
    }

    /// Re-derive the filtered view, the ranking and the choropleth.
    pub fn recompute(&mut self) {
        let (Some(table), Some(descriptor)) = (&self.table, self.catalog.get(self.statistic))
        else {
            self.view = NeighborhoodTable::default();
            self.ranking = None;
            self.choropleth = None;
            return;
        };

        self.view = filter(table, &self.selection);
        let ranking = rank_extremes(&self.view, descriptor);
        if let Err(e) = &ranking {
            log::warn!("Ranking unavailable: {e}");
        }
        self.ranking = Some(ranking);
        self.choropleth = Some(build_choropleth(&self.view, descriptor, self.map_view));

        log::debug!(
            "Recomputed view for '{}': {} of {} neighborhoods",
            descriptor.key,
            self.view.len(),
            table.len()
        );
    }

    /// Jump back to the fixed initial camera.
    pub fn reset_view(&mut self) {
        self.pending_bounds = Some(self.map_view.initial_bounds());
    }

    /// Zoom to the mapped neighborhoods, if any.
    pub fn fit_selection(&mut self) {
        if let Some(bounds) = self.choropleth.as_ref().and_then(|m| m.bounds()) {
            self.pending_bounds = Some(bounds);
        }
    }

    /// Switch the displayed statistic.
    pub fn set_statistic(&mut self, index: usize) {
        if index != self.statistic && index < self.catalog.len() {
            self.statistic = index;
            self.recompute();
        }
    }

    /// Add or remove one neighborhood from the selection.
    pub fn toggle_neighborhood(&mut self, name: &str) {
        if !self.selection.remove(name) {
            self.selection.insert(name.to_string());
        }
        self.recompute();
    }

    pub fn select_all(&mut self) {
        self.selection = self.neighborhood_options.iter().cloned().collect();
        self.recompute();
    }

    pub fn select_none(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Restore the fixed default selection.
    pub fn select_defaults(&mut self) {
        if let Some(table) = &self.table {
            self.selection = default_selection(table);
            self.recompute();
        }
    }

    /// Write the current map as GeoJSON.
    pub fn export_geojson(&mut self, path: &Path) {
        let Some(map) = &self.choropleth else {
            self.status_message = Some("Nothing to export yet.".to_string());
            return;
        };
        match map.write_geojson(path) {
            Ok(()) => self.status_message = Some(format!("Exported {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use pretty_assertions::assert_eq;

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        let catalog = StatisticCatalog::standard();
        let names = ["Calabazas", "West San Jose", "Winchester East", "Alviso", "Berryessa"];
        let records = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let mut rec = record(n, "unused", 0.0, i as f64 * 2.0);
                rec.statistics = catalog
                    .descriptors()
                    .iter()
                    .map(|d| (d.key.clone(), (i + 1) as f64 * 10.0))
                    .collect();
                rec
            })
            .collect();
        state.set_table(NeighborhoodTable::from_records(records).unwrap());
        state
    }

    #[test]
    fn loading_applies_default_selection() {
        let state = loaded_state();
        assert_eq!(state.view.len(), 3);
        assert_eq!(state.neighborhood_options.len(), 5);
        let report = state.ranking.clone().unwrap().unwrap();
        assert_eq!(report.neighborhoods(), vec!["Winchester East", "West San Jose", "Calabazas"]);
        assert_eq!(state.choropleth.as_ref().unwrap().regions.len(), 3);
    }

    #[test]
    fn deselecting_below_three_surfaces_an_error() {
        let mut state = loaded_state();
        state.toggle_neighborhood("Calabazas");
        assert_eq!(
            state.ranking,
            Some(Err(RankingError::InsufficientData { available: 2 }))
        );
        assert_eq!(state.choropleth.as_ref().unwrap().regions.len(), 2);
    }

    #[test]
    fn switching_statistic_flips_direction() {
        let mut state = loaded_state();
        state.select_all();
        let index = state
            .catalog
            .descriptors()
            .iter()
            .position(|d| d.key == "per_capital_income")
            .unwrap();
        state.set_statistic(index);
        let report = state.ranking.clone().unwrap().unwrap();
        assert_eq!(report.neighborhoods(), vec!["Calabazas", "West San Jose", "Winchester East"]);
    }

    #[test]
    fn base_table_is_never_narrowed() {
        let mut state = loaded_state();
        state.select_none();
        assert!(state.view.is_empty());
        assert_eq!(state.table.as_ref().unwrap().len(), 5);
        state.select_defaults();
        assert_eq!(state.view.len(), 3);
    }

    #[test]
    fn fit_selection_targets_mapped_regions() {
        let mut state = loaded_state();
        assert_eq!(state.pending_bounds, Some(state.map_view.initial_bounds()));
        state.pending_bounds = None;
        state.fit_selection();
        // Default selection covers the first three unit squares.
        assert_eq!(state.pending_bounds, Some(([0.0, 0.0], [5.0, 1.0])));
    }
}
