use std::collections::BTreeSet;

use crate::config::DEFAULT_NEIGHBORHOODS;

use super::model::NeighborhoodTable;

// ---------------------------------------------------------------------------
// Selection filter: which neighborhoods are on screen
// ---------------------------------------------------------------------------

/// Set of neighborhood names chosen in the multi-select.
pub type Selection = BTreeSet<String>;

/// Narrow `table` to the rows whose name is in `chosen`.
///
/// The source table is untouched; rows keep their source order together with
/// their full statistic set and geometry. Names in `chosen` that are not in
/// the table are ignored, and an empty selection yields an empty table.
pub fn filter(table: &NeighborhoodTable, chosen: &Selection) -> NeighborhoodTable {
    table.retain_view(|rec| chosen.contains(&rec.name))
}

/// The fixed default selection, restricted to names present in `table`.
pub fn default_selection(table: &NeighborhoodTable) -> Selection {
    DEFAULT_NEIGHBORHOODS
        .iter()
        .filter(|name| {
            let present = table.contains(name);
            if !present {
                log::debug!("Default neighborhood '{name}' not in table, skipping");
            }
            present
        })
        .map(|name| name.to_string())
        .collect()
}

/// Sorted unique names, used as the multi-select's options.
pub fn all_names(table: &NeighborhoodTable) -> Vec<String> {
    let names: BTreeSet<&str> = table.names().collect();
    names.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use pretty_assertions::assert_eq;

    fn table(names: &[&str]) -> NeighborhoodTable {
        let records = names
            .iter()
            .enumerate()
            .map(|(i, n)| record(n, "k", i as f64, i as f64))
            .collect();
        NeighborhoodTable::from_records(records).unwrap()
    }

    fn selection(names: &[&str]) -> Selection {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn keeps_only_chosen_rows_in_source_order() {
        let base = table(&["C", "A", "B", "D"]);
        let view = filter(&base, &selection(&["B", "C"]));
        assert_eq!(view.names().collect::<Vec<_>>(), vec!["C", "B"]);
        assert_eq!(view.get("B"), base.get("B"));
        assert_eq!(base.len(), 4);
    }

    #[test]
    fn empty_selection_gives_empty_table() {
        let base = table(&["A", "B"]);
        assert!(filter(&base, &Selection::new()).is_empty());
    }

    #[test]
    fn filtering_by_superset_is_idempotent() {
        let base = table(&["A", "B", "C", "D", "E"]);
        let once = filter(&base, &selection(&["A", "C", "E"]));
        let twice = filter(&once, &selection(&["A", "B", "C", "D", "E"]));
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_names_are_ignored() {
        let base = table(&["A", "B"]);
        let view = filter(&base, &selection(&["A", "Nowhere"]));
        assert_eq!(view.names().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn default_selection_skips_absent_names() {
        let base = table(&["Calabazas", "West San Jose", "Alviso"]);
        assert_eq!(
            default_selection(&base),
            selection(&["Calabazas", "West San Jose"])
        );
    }

    #[test]
    fn default_selection_covers_all_eighteen_when_present() {
        let base = table(&DEFAULT_NEIGHBORHOODS);
        assert_eq!(default_selection(&base).len(), 18);
    }

    #[test]
    fn option_list_is_sorted() {
        let base = table(&["Winchester East", "Calabazas", "Monta Loma"]);
        assert_eq!(
            all_names(&base),
            vec!["Calabazas", "Monta Loma", "Winchester East"]
        );
    }
}
