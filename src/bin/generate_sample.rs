//! Writes a synthetic West Valley neighborhood table to `Datasets/` as both
//! CSV and Parquet, in the layout the viewer loads.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const NEIGHBORHOODS: [&str; 20] = [
    "Cupertino - Eastside",
    "Cupertino - Northside",
    "Cupertino - Southside",
    "Cupertino - Westside",
    "Los Gatos - Eastern",
    "Saratoga - Northwestern",
    "Saratoga - Southeastern",
    "San Tomas - North",
    "San Tomas - South",
    "Monte Sereno/Los Gatos - Western",
    "Cambrian Park West",
    "Cambrian Park West Central",
    "Calabazas",
    "Santa Clara - Southwest",
    "Santa Clara - West Central",
    "West San Jose",
    "Winchester West",
    "Winchester East",
    "Alviso",
    "Berryessa",
];

/// Proportion columns, stored as fractions in the file.
const PROPORTIONS: [&str; 7] = [
    "single_parent_households",
    "children_living_in_households",
    "households_without_full_time",
    "children_ages_0_17_below",
    "families_below_200_fpl",
    "households_receiving_calfresh",
    "households_with_gross_rent",
];

const INCOMES: [&str; 2] = ["per_capital_income", "median_household_income"];

const GRID_COLUMNS: usize = 5;
const CELL_DEG: f64 = 0.045;
const ORIGIN: (f64, f64) = (-122.08, 37.20);

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Jittered hexagon inside grid cell `index`, as WKT.
fn cell_polygon(index: usize, rng: &mut SimpleRng) -> String {
    let col = (index % GRID_COLUMNS) as f64;
    let row = (index / GRID_COLUMNS) as f64;
    let cx = ORIGIN.0 + (col + 0.5) * CELL_DEG;
    let cy = ORIGIN.1 + (row + 0.5) * CELL_DEG;

    let mut ring: Vec<(f64, f64)> = (0..6)
        .map(|k| {
            let angle = std::f64::consts::PI / 3.0 * k as f64;
            let radius = CELL_DEG * rng.uniform(0.38, 0.5);
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    ring.push(ring[0]);

    let coords: Vec<String> = ring
        .iter()
        .map(|(x, y)| format!("{x:.6} {y:.6}"))
        .collect();
    format!("MULTIPOLYGON ((({})))", coords.join(", "))
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let geometries: Vec<String> = (0..NEIGHBORHOODS.len())
        .map(|i| cell_polygon(i, &mut rng))
        .collect();

    // column name → one value per neighborhood
    let mut stats: Vec<(&str, Vec<f64>)> = Vec::new();
    for key in PROPORTIONS {
        let values = (0..NEIGHBORHOODS.len())
            .map(|_| (rng.uniform(0.02, 0.45) * 10_000.0).round() / 10_000.0)
            .collect();
        stats.push((key, values));
    }
    for key in INCOMES {
        let values = (0..NEIGHBORHOODS.len())
            .map(|_| rng.uniform(40_000.0, 180_000.0).round())
            .collect();
        stats.push((key, values));
    }

    std::fs::create_dir_all("Datasets").context("creating Datasets/")?;

    // ---- CSV ----
    let csv_path = "Datasets/WVCS_Mappable_CSV.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    let mut header = vec!["Neighborhood Name", "the_geom"];
    header.extend(stats.iter().map(|(k, _)| *k));
    writer.write_record(&header)?;
    for (i, name) in NEIGHBORHOODS.iter().enumerate() {
        let mut record = vec![name.to_string(), geometries[i].clone()];
        record.extend(stats.iter().map(|(_, v)| v[i].to_string()));
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;

    // ---- Parquet ----
    let mut fields = vec![
        Field::new("Neighborhood Name", DataType::Utf8, false),
        Field::new("the_geom", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(NEIGHBORHOODS.to_vec())),
        Arc::new(StringArray::from(
            geometries.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        )),
    ];
    for (key, values) in &stats {
        fields.push(Field::new(*key, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(values.clone())));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building RecordBatch")?;

    let parquet_path = "Datasets/WVCS_Mappable.parquet";
    let file = std::fs::File::create(parquet_path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing Parquet writer")?;

    println!(
        "Wrote {} neighborhoods to {csv_path} and {parquet_path}",
        NEIGHBORHOODS.len()
    );
    Ok(())
}
