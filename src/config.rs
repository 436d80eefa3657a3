use crate::data::model::{Scale, StatisticDescriptor};

// ---------------------------------------------------------------------------
// Fixed configuration tables
// ---------------------------------------------------------------------------

/// Dataset opened automatically at start-up when it exists.
pub const DEFAULT_DATASET_PATH: &str = "Datasets/WVCS_Mappable_CSV.csv";

/// Column holding the unique neighborhood name.
pub const NAME_COLUMN: &str = "Neighborhood Name";

/// Column holding the WKT boundary.
pub const GEOMETRY_COLUMN: &str = "the_geom";

/// Neighborhoods selected before the user makes an explicit choice.
pub const DEFAULT_NEIGHBORHOODS: [&str; 18] = [
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
];

const STANDARD_STATISTICS: [(&str, &str, Scale); 9] = [
    ("% Of Single Parent Households", "single_parent_households", Scale::Percentage),
    ("Per Capita Income", "per_capital_income", Scale::Currency),
    ("Median Household Income", "median_household_income", Scale::Currency),
    (
        "% Of Children Living In Assisted Households",
        "children_living_in_households",
        Scale::Percentage,
    ),
    (
        "% Of Households Without Full Time Employment",
        "households_without_full_time",
        Scale::Percentage,
    ),
    ("% Of Children Aged 0-17", "children_ages_0_17_below", Scale::Percentage),
    (
        "% Of Families Below 200% Of Federal Poverty Line",
        "families_below_200_fpl",
        Scale::Percentage,
    ),
    (
        "% Of Households Receiving CalFresh Benefits",
        "households_receiving_calfresh",
        Scale::Percentage,
    ),
    (
        "% Of Households Where Gross Rent >30% Of Income",
        "households_with_gross_rent",
        Scale::Percentage,
    ),
];

// ---------------------------------------------------------------------------
// StatisticCatalog – ordered descriptor table
// ---------------------------------------------------------------------------

/// Ordered set of statistics the viewer offers. The first entry is the
/// default selection.
#[derive(Debug, Clone)]
pub struct StatisticCatalog {
    descriptors: Vec<StatisticDescriptor>,
}

impl StatisticCatalog {
    /// The nine statistics of the West Valley dataset.
    pub fn standard() -> Self {
        Self::new(
            STANDARD_STATISTICS
                .iter()
                .map(|&(label, key, scale)| StatisticDescriptor::new(key, label, scale))
                .collect(),
        )
    }

    pub fn new(descriptors: Vec<StatisticDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &[StatisticDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, index: usize) -> Option<&StatisticDescriptor> {
        self.descriptors.get(index)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }
}

#[cfg(test)]
impl StatisticCatalog {
    pub fn by_label(&self, label: &str) -> Option<&StatisticDescriptor> {
        self.descriptors.iter().find(|d| d.label == label)
    }

    pub fn by_key(&self, key: &str) -> Option<&StatisticDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }
}

// ---------------------------------------------------------------------------
// MapView – initial camera of the choropleth
// ---------------------------------------------------------------------------

/// Background drawn under the neighborhood regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLayer {
    /// Light grey canvas in the style of the CartoDB "positron" tiles.
    Light,
}

/// Fixed initial camera: geographic center, web-map zoom level and base layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub base_layer: BaseLayer,
}

/// Number of 256px tiles assumed to fit across the map panel.
const TILES_ACROSS: f64 = 4.0;

impl MapView {
    pub fn standard() -> Self {
        Self {
            center_lat: 37.22,
            center_lon: -121.60,
            zoom: 10,
            base_layer: BaseLayer::Light,
        }
    }

    /// Horizontal extent (degrees of longitude) visible at the initial zoom.
    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powi(self.zoom as i32) * TILES_ACROSS
    }

    /// Width of one degree of longitude relative to one degree of latitude
    /// at the view center.
    pub fn lon_scale(&self) -> f64 {
        self.center_lat.to_radians().cos()
    }

    /// Initial `[min_lon, min_lat]`, `[max_lon, max_lat]` bounds.
    pub fn initial_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let half_lon = self.lon_span() / 2.0;
        let half_lat = half_lon * self.lon_scale();
        (
            [self.center_lon - half_lon, self.center_lat - half_lat],
            [self.center_lon + half_lon, self.center_lat + half_lat],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Polarity;

    #[test]
    fn standard_catalog_has_nine_statistics_in_order() {
        let catalog = StatisticCatalog::standard();
        assert_eq!(catalog.len(), 9);
        assert_eq!(
            catalog.get(0).map(|d| d.label.as_str()),
            Some("% Of Single Parent Households")
        );
        assert_eq!(
            catalog.by_label("Median Household Income").map(|d| d.key.as_str()),
            Some("median_household_income")
        );
    }

    #[test]
    fn polarity_follows_percent_prefix() {
        let catalog = StatisticCatalog::standard();
        for d in catalog.descriptors() {
            let expected = if d.label.starts_with('%') {
                Polarity::HigherIsWorse
            } else {
                Polarity::HigherIsBetter
            };
            assert_eq!(d.polarity(), expected, "{}", d.label);
        }
    }

    #[test]
    fn only_income_columns_are_currency() {
        let catalog = StatisticCatalog::standard();
        let currency: Vec<&str> = catalog
            .descriptors()
            .iter()
            .filter(|d| d.scale == Scale::Currency)
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(currency, vec!["per_capital_income", "median_household_income"]);
    }

    #[test]
    fn initial_bounds_are_centered() {
        let view = MapView::standard();
        let (min, max) = view.initial_bounds();
        assert!(((min[0] + max[0]) / 2.0 - view.center_lon).abs() < 1e-9);
        assert!(((min[1] + max[1]) / 2.0 - view.center_lat).abs() < 1e-9);
        assert!(max[0] - min[0] > max[1] - min[1]);
    }
}
