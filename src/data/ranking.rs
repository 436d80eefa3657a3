use std::fmt;

use super::model::{NeighborhoodTable, Polarity, StatisticDescriptor};

/// How many neighborhoods the report calls out.
pub const EXTREME_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Ranking report: the three most salient neighborhoods for a statistic
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum RankingError {
    #[error("need at least 3 neighborhoods with data to rank, only {available} selected")]
    InsufficientData { available: usize },
}

/// Which end of the value range the report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Greatest,
    Least,
}

impl Extreme {
    pub fn for_polarity(polarity: Polarity) -> Self {
        match polarity {
            Polarity::HigherIsWorse => Extreme::Greatest,
            Polarity::HigherIsBetter => Extreme::Least,
        }
    }
}

impl fmt::Display for Extreme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extreme::Greatest => write!(f, "Greatest"),
            Extreme::Least => write!(f, "Least"),
        }
    }
}

/// A neighborhood and its own value for the ranked statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNeighborhood {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingReport {
    pub label: String,
    pub extreme: Extreme,
    /// Every row whose value belongs to the extreme set, most extreme first.
    /// Usually three rows, more when a tied value sits at the cut-off.
    pub entries: Vec<RankedNeighborhood>,
}

impl RankingReport {
    pub fn heading(&self) -> String {
        format!(
            "Neighborhoods Where \"{}\" Is The {}",
            self.label, self.extreme
        )
    }

    /// The entries shown as metric callouts.
    pub fn callouts(&self) -> &[RankedNeighborhood] {
        let n = self.entries.len().min(EXTREME_COUNT);
        &self.entries[..n]
    }

    pub fn neighborhoods(&self) -> Vec<&str> {
        self.callouts().iter().map(|e| e.name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.callouts().iter().map(|e| e.value).collect()
    }
}

/// Rank `table` by the statistic described by `descriptor`.
///
/// The extreme set is the first three values of the ascending sort (or the
/// last three, reversed, when higher is worse). Rows are then selected by
/// membership of their value in that set, so a value tied with one of the
/// three picks pulls in every row carrying it. Selected rows are ordered by
/// the position of their value in the extreme set, ties in table order.
pub fn rank_extremes(
    table: &NeighborhoodTable,
    descriptor: &StatisticDescriptor,
) -> Result<RankingReport, RankingError> {
    let rows: Vec<(&str, f64)> = table
        .records()
        .iter()
        .filter_map(|r| r.value(&descriptor.key).map(|v| (r.name.as_str(), v)))
        .collect();

    if rows.len() < EXTREME_COUNT {
        return Err(RankingError::InsufficientData {
            available: rows.len(),
        });
    }

    let extreme = Extreme::for_polarity(descriptor.polarity());

    let mut sorted: Vec<f64> = rows.iter().map(|&(_, v)| v).collect();
    sorted.sort_by(f64::total_cmp);
    let extreme_set: Vec<f64> = match extreme {
        Extreme::Least => sorted[..EXTREME_COUNT].to_vec(),
        Extreme::Greatest => sorted.iter().rev().take(EXTREME_COUNT).copied().collect(),
    };

    let mut matched: Vec<(usize, RankedNeighborhood)> = rows
        .iter()
        .filter_map(|&(name, value)| {
            extreme_set
                .iter()
                .position(|&v| v == value)
                .map(|rank| {
                    (
                        rank,
                        RankedNeighborhood {
                            name: name.to_string(),
                            value,
                        },
                    )
                })
        })
        .collect();
    // Stable: equal ranks stay in table order.
    matched.sort_by_key(|(rank, _)| *rank);

    log::debug!(
        "Ranked {} rows by '{}': {} match the extreme set {:?}",
        rows.len(),
        descriptor.key,
        matched.len(),
        extreme_set
    );

    Ok(RankingReport {
        label: descriptor.label.clone(),
        extreme,
        entries: matched.into_iter().map(|(_, e)| e).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatisticCatalog;
    use crate::data::model::tests::record;
    use pretty_assertions::assert_eq;

    const CALFRESH: &str = "% Of Households Receiving CalFresh Benefits";
    const MEDIAN_INCOME: &str = "Median Household Income";

    fn descriptor(label: &str) -> StatisticDescriptor {
        StatisticCatalog::standard()
            .by_label(label)
            .cloned()
            .unwrap()
    }

    fn table(key: &str, rows: &[(&str, f64)]) -> NeighborhoodTable {
        NeighborhoodTable::from_records(
            rows.iter()
                .enumerate()
                .map(|(i, &(n, v))| record(n, key, v, i as f64))
                .collect(),
        )
        .unwrap()
    }

    fn names(report: &RankingReport) -> Vec<&str> {
        report.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn percentage_statistic_reports_greatest_three() {
        let d = descriptor(CALFRESH);
        let t = table(
            &d.key,
            &[("A", 10.0), ("B", 20.0), ("C", 30.0), ("D", 40.0), ("E", 50.0)],
        );
        let report = rank_extremes(&t, &d).unwrap();
        assert!(report.heading().contains("Greatest"));
        assert_eq!(
            report.heading(),
            format!("Neighborhoods Where \"{CALFRESH}\" Is The Greatest")
        );
        assert_eq!(report.neighborhoods(), vec!["E", "D", "C"]);
        assert_eq!(report.values(), vec![50.0, 40.0, 30.0]);
    }

    #[test]
    fn income_statistic_reports_least_three() {
        let d = descriptor(MEDIAN_INCOME);
        let t = table(
            &d.key,
            &[
                ("A", 70000.0),
                ("B", 50000.0),
                ("C", 90000.0),
                ("D", 60000.0),
                ("E", 80000.0),
            ],
        );
        let report = rank_extremes(&t, &d).unwrap();
        assert_eq!(report.extreme, Extreme::Least);
        assert!(report.heading().ends_with("Is The Least"));
        assert_eq!(report.neighborhoods(), vec!["B", "D", "A"]);
        assert_eq!(report.values(), vec![50000.0, 60000.0, 70000.0]);
    }

    #[test]
    fn direction_follows_label_for_every_statistic() {
        for d in StatisticCatalog::standard().descriptors() {
            let t = table(&d.key, &[("A", 1.0), ("B", 2.0), ("C", 3.0), ("D", 4.0)]);
            let report = rank_extremes(&t, d).unwrap();
            if d.label.starts_with('%') {
                assert_eq!(report.extreme, Extreme::Greatest);
                assert_eq!(report.neighborhoods(), vec!["D", "C", "B"]);
            } else {
                assert_eq!(report.extreme, Extreme::Least);
                assert_eq!(report.neighborhoods(), vec!["A", "B", "C"]);
            }
        }
    }

    #[test]
    fn exactly_three_rows_returns_all_of_them() {
        for label in [CALFRESH, MEDIAN_INCOME] {
            let d = descriptor(label);
            let t = table(&d.key, &[("A", 5.0), ("B", 1.0), ("C", 3.0)]);
            let report = rank_extremes(&t, &d).unwrap();
            let mut got = report.neighborhoods();
            got.sort_unstable();
            assert_eq!(got, vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn fewer_than_three_rows_is_an_error() {
        let d = descriptor(CALFRESH);
        let t = table(&d.key, &[("A", 5.0), ("B", 1.0)]);
        assert_eq!(
            rank_extremes(&t, &d),
            Err(RankingError::InsufficientData { available: 2 })
        );
        assert_eq!(
            rank_extremes(&NeighborhoodTable::default(), &d),
            Err(RankingError::InsufficientData { available: 0 })
        );
    }

    #[test]
    fn duplicates_below_the_cut_off_are_not_selected() {
        let d = descriptor(CALFRESH);
        let t = table(
            &d.key,
            &[("A", 10.0), ("B", 10.0), ("C", 20.0), ("D", 30.0), ("E", 40.0)],
        );
        let report = rank_extremes(&t, &d).unwrap();
        assert_eq!(names(&report), vec!["E", "D", "C"]);
    }

    #[test]
    fn tie_at_the_cut_off_selects_every_matching_row() {
        // Greatest three values are {40, 30, 20}; both 20s match.
        let d = descriptor(CALFRESH);
        let t = table(
            &d.key,
            &[("A", 10.0), ("B", 20.0), ("C", 20.0), ("D", 30.0), ("E", 40.0)],
        );
        let report = rank_extremes(&t, &d).unwrap();
        assert_eq!(names(&report), vec!["E", "D", "B", "C"]);
        assert_eq!(report.neighborhoods(), vec!["E", "D", "B"]);
    }

    #[test]
    fn tie_inside_the_extreme_set_keeps_pairing() {
        let d = descriptor(MEDIAN_INCOME);
        let t = table(
            &d.key,
            &[("A", 10.0), ("B", 10.0), ("C", 20.0), ("D", 30.0), ("E", 40.0)],
        );
        let report = rank_extremes(&t, &d).unwrap();
        assert_eq!(names(&report), vec!["A", "B", "C"]);
        for entry in &report.entries {
            let own = t.get(&entry.name).and_then(|r| r.value(&d.key));
            assert_eq!(own, Some(entry.value));
        }
    }
}
