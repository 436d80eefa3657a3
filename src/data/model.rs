use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::boundary::Boundary;

// ---------------------------------------------------------------------------
// StatisticDescriptor – one per statistic column
// ---------------------------------------------------------------------------

/// Which direction of a statistic is the salient one for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Larger values describe a worse outcome (labels starting with `%`).
    HigherIsWorse,
    /// Larger values describe a better outcome (income figures).
    HigherIsBetter,
}

/// How raw column values are stored and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Proportion in the source file, stored ×100 and rounded to 2 decimals.
    Percentage,
    /// Dollar amount, stored as-is.
    Currency,
}

impl Scale {
    /// Convert a raw value from the input file to its stored form.
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            Scale::Percentage => round_to(raw * 100.0, 2),
            Scale::Currency => raw,
        }
    }

    /// Localized rendering with thousands separators.
    pub fn format(self, value: f64) -> String {
        match self {
            Scale::Percentage => format_grouped(value, 2),
            Scale::Currency => format_grouped(value, 0),
        }
    }
}

/// Static description of a statistic column.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticDescriptor {
    /// Column name in the input file.
    pub key: String,
    /// Human-readable label shown in the UI.
    pub label: String,
    pub scale: Scale,
}

impl StatisticDescriptor {
    pub fn new(key: &str, label: &str, scale: Scale) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            scale,
        }
    }

    pub fn polarity(&self) -> Polarity {
        if self.label.starts_with('%') {
            Polarity::HigherIsWorse
        } else {
            Polarity::HigherIsBetter
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Render `value` with `,` thousands separators and at most `max_fraction`
/// fractional digits (trailing zeros dropped).
pub fn format_grouped(value: f64, max_fraction: usize) -> String {
    let rendered = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rendered.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value.is_sign_negative() && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

// ---------------------------------------------------------------------------
// NeighborhoodRecord – one row of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodRecord {
    /// Unique neighborhood name.
    pub name: String,
    /// Boundary; `None` when the row has no geometry.
    pub geometry: Option<Boundary>,
    /// Statistic key → stored (already scaled) value.
    pub statistics: BTreeMap<String, f64>,
}

impl NeighborhoodRecord {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.statistics.get(key).copied()
    }
}

// ---------------------------------------------------------------------------
// NeighborhoodTable – the complete (or filtered) table
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TableError {
    #[error("duplicate neighborhood name '{0}'")]
    DuplicateName(String),
}

/// Read-only table of neighborhoods, keyed by unique name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NeighborhoodTable {
    records: Vec<NeighborhoodRecord>,
}

impl NeighborhoodTable {
    /// Build a table, rejecting duplicate names.
    pub fn from_records(records: Vec<NeighborhoodRecord>) -> Result<Self, TableError> {
        let mut seen = BTreeSet::new();
        for rec in &records {
            if !seen.insert(rec.name.as_str()) {
                return Err(TableError::DuplicateName(rec.name.clone()));
            }
        }
        Ok(Self { records })
    }

    /// New table holding the rows accepted by `keep`, in source order.
    pub fn retain_view(&self, keep: impl Fn(&NeighborhoodRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    pub fn records(&self) -> &[NeighborhoodRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&NeighborhoodRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for NeighborhoodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with_geometry = self
            .records
            .iter()
            .filter(|r| r.geometry.is_some())
            .count();
        write!(
            f,
            "{} neighborhoods ({with_geometry} with geometry)",
            self.records.len()
        )
    }
}
