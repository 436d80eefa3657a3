//! Choropleth model: everything the map panel draws, derived from the
//! filtered table and the chosen statistic. Rebuilt on every selection change.

use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::color::{hex, SequentialScale};
use crate::config::{MapView, NAME_COLUMN};
use crate::data::boundary::{self, Boundary};
use crate::data::model::{NeighborhoodTable, StatisticDescriptor};

/// Number of equal-width colour classes across the value range.
pub const BIN_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LegendBin {
    pub lower: f64,
    pub upper: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub label: String,
    /// Smallest and largest value among the mapped neighborhoods.
    pub min: f64,
    pub max: f64,
    pub bins: Vec<LegendBin>,
}

impl Legend {
    fn new(label: &str, min: f64, max: f64, colors: Vec<Color32>) -> Self {
        let n = colors.len();
        let step = (max - min) / n as f64;
        let bins = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| LegendBin {
                lower: min + step * i as f64,
                upper: if i + 1 == n { max } else { min + step * (i + 1) as f64 },
                color,
            })
            .collect();
        Self {
            label: label.to_string(),
            min,
            max,
            bins,
        }
    }

    /// Index of the bin `value` falls in. The top edge belongs to the last bin.
    pub fn bin_index(&self, value: f64) -> usize {
        let n = self.bins.len();
        let span = self.max - self.min;
        if n == 0 || span <= 0.0 {
            return 0;
        }
        let idx = ((value - self.min) / span * n as f64).floor();
        (idx.max(0.0) as usize).min(n - 1)
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub value: f64,
    pub bin: usize,
    pub fill: Color32,
    pub geometry: Boundary,
    /// `(alias, text)` pairs shown on hover.
    pub tooltip: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choropleth {
    pub view: MapView,
    pub statistic_key: String,
    /// `None` when no neighborhood has a value to map.
    pub legend: Option<Legend>,
    pub regions: Vec<Region>,
}

impl Choropleth {
    /// Region under the given lon/lat, if any.
    pub fn region_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.regions
            .iter()
            .position(|r| boundary::contains(&r.geometry, lon, lat))
    }

    /// Bounding box of all regions.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        self.regions
            .iter()
            .filter_map(|r| boundary::bounds(&r.geometry))
            .reduce(|(amin, amax), (bmin, bmax)| {
                (
                    [amin[0].min(bmin[0]), amin[1].min(bmin[1])],
                    [amax[0].max(bmax[0]), amax[1].max(bmax[1])],
                )
            })
    }
}

/// Build the map model for `table` coloured by `descriptor`.
///
/// Only rows with a non-empty geometry become regions; the colour range is
/// computed over the rows of `table` alone.
pub fn build_choropleth(
    table: &NeighborhoodTable,
    descriptor: &StatisticDescriptor,
    view: MapView,
) -> Choropleth {
    let values: Vec<f64> = table
        .records()
        .iter()
        .filter_map(|r| r.value(&descriptor.key))
        .collect();

    let legend = values
        .iter()
        .copied()
        .reduce(f64::min)
        .zip(values.iter().copied().reduce(f64::max))
        .map(|(min, max)| {
            Legend::new(
                &descriptor.label,
                min,
                max,
                SequentialScale::yl_gn_bu().classes(BIN_COUNT),
            )
        });

    let regions: Vec<Region> = match &legend {
        None => Vec::new(),
        Some(legend) => table
            .records()
            .iter()
            .filter_map(|rec| {
                let geometry = rec.geometry.as_ref().filter(|g| !boundary::is_blank(g))?;
                let value = rec.value(&descriptor.key)?;
                let bin = legend.bin_index(value);
                Some(Region {
                    name: rec.name.clone(),
                    value,
                    bin,
                    fill: legend.bins[bin].color,
                    geometry: geometry.clone(),
                    tooltip: vec![
                        (format!("{NAME_COLUMN}: "), rec.name.clone()),
                        (
                            format!("{}: ", descriptor.label),
                            descriptor.scale.format(value),
                        ),
                    ],
                })
            })
            .collect(),
    };

    let skipped = table.len() - regions.len();
    if skipped > 0 {
        log::debug!("{skipped} selected neighborhoods have no geometry and are not mapped");
    }

    Choropleth {
        view,
        statistic_key: descriptor.key.clone(),
        legend,
        regions,
    }
}

// ---------------------------------------------------------------------------
// GeoJSON export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: JsonValue,
    geometry: FeatureGeometry,
}

#[derive(Serialize)]
struct FeatureGeometry {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<Vec<Vec<[f64; 2]>>>,
}

impl Choropleth {
    /// GeoJSON `FeatureCollection`, one `MultiPolygon` feature per region.
    pub fn to_geojson(&self) -> JsonValue {
        let features = self
            .regions
            .iter()
            .map(|region| Feature {
                kind: "Feature",
                properties: json!({
                    NAME_COLUMN: region.name,
                    self.statistic_key.as_str(): region.value,
                    "fill": hex(region.fill),
                    "tooltip": region
                        .tooltip
                        .iter()
                        .map(|(alias, text)| format!("{alias}{text}"))
                        .collect::<Vec<_>>(),
                }),
                geometry: FeatureGeometry {
                    kind: "MultiPolygon",
                    coordinates: boundary::rings(&region.geometry),
                },
            })
            .collect();

        serde_json::to_value(FeatureCollection {
            kind: "FeatureCollection",
            features,
        })
        .unwrap_or(JsonValue::Null)
    }

    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_geojson())
            .context("serializing GeoJSON")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Exported {} regions to {}",
            self.regions.len(),
            path.display()
        );
        Ok(())
    }
}
