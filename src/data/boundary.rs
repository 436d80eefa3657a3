//! Neighborhood boundaries: WKT from the `the_geom` column, read into
//! `geo` multi-polygons in lon/lat (EPSG:4326).

use geo::{BoundingRect, Contains, Geometry, HasDimensions, MultiPolygon, Point};
use wkt::TryFromWkt;

/// A neighborhood boundary: one or more polygons.
pub type Boundary = MultiPolygon<f64>;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BoundaryError {
    #[error("invalid WKT: {0}")]
    Syntax(String),
    #[error("unsupported geometry type '{0}' (expected POLYGON or MULTIPOLYGON)")]
    UnsupportedType(&'static str),
}

/// Parse a `POLYGON` / `MULTIPOLYGON` WKT string. Z and M ordinates are
/// dropped; a single polygon becomes a one-member multi-polygon.
pub fn parse(text: &str) -> Result<Boundary, BoundaryError> {
    let geometry = Geometry::<f64>::try_from_wkt_str(text)
        .map_err(|e| BoundaryError::Syntax(e.to_string()))?;
    match geometry {
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        other => Err(BoundaryError::UnsupportedType(type_name(&other))),
    }
}

fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        _ => "GEOMETRY",
    }
}

/// True when no polygon has any exterior coordinates.
pub fn is_blank(boundary: &Boundary) -> bool {
    boundary.is_empty()
}

/// Point-in-boundary test; points inside holes are outside.
pub fn contains(boundary: &Boundary, lon: f64, lat: f64) -> bool {
    boundary.contains(&Point::new(lon, lat))
}

/// `([min_lon, min_lat], [max_lon, max_lat])`, or `None` when empty.
pub fn bounds(boundary: &Boundary) -> Option<([f64; 2], [f64; 2])> {
    boundary
        .bounding_rect()
        .map(|r| ([r.min().x, r.min().y], [r.max().x, r.max().y]))
}

/// Rings of every polygon as `[lon, lat]` lists, exterior first.
pub fn rings(boundary: &Boundary) -> Vec<Vec<Vec<[f64; 2]>>> {
    boundary
        .iter()
        .map(|p| {
            std::iter::once(p.exterior())
                .chain(p.interiors())
                .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};
    use pretty_assertions::assert_eq;

    fn square_with_hole() -> Boundary {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![LineString::from(vec![
                (1.0, 1.0),
                (3.0, 1.0),
                (3.0, 3.0),
                (1.0, 3.0),
                (1.0, 1.0),
            ])],
        )])
    }

    #[test]
    fn parses_polygon_with_hole() {
        let b = parse("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 2 1, 2 2, 1 1))").unwrap();
        let rings = rings(&b);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 2);
        assert_eq!(rings[0][0].len(), 5);
        assert_eq!(rings[0][1][1], [2.0, 1.0]);
    }

    #[test]
    fn parses_multipolygon_with_negative_coordinates() {
        let b = parse(
            "MULTIPOLYGON (((-122.05 37.31, -122.01 37.31, -122.01 37.34, -122.05 37.31)),\
             ((-121.9 37.2, -121.8 37.2, -121.8 37.3, -121.9 37.2)))",
        )
        .unwrap();
        let rings = rings(&b);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][0][0], [-122.05, 37.31]);
        assert_eq!(rings[1][0][2], [-121.8, 37.3]);
    }

    #[test]
    fn drops_extra_ordinates() {
        let b = parse("POLYGON Z ((0 0 5, 1 0 5, 1 1 5, 0 0 5))").unwrap();
        assert_eq!(rings(&b)[0][0][2], [1.0, 1.0]);

        let b = parse("POLYGON ZM ((0 0 1 2, 1 0 1 2, 1 1 1 2, 0 0 1 2))").unwrap();
        assert_eq!(rings(&b)[0][0], vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn empty_geometry() {
        let b = parse("MULTIPOLYGON EMPTY").unwrap();
        assert!(is_blank(&b));
        assert_eq!(bounds(&b), None);
    }

    #[test]
    fn rejects_other_geometry_types() {
        assert_eq!(parse("POINT (1 2)"), Err(BoundaryError::UnsupportedType("POINT")));
    }

    #[test]
    fn reports_malformed_text() {
        assert!(matches!(
            parse("POLYGON ((0 0, 1 x, 0 0))"),
            Err(BoundaryError::Syntax(_))
        ));
        assert!(matches!(
            parse("POLYGON ((0 0, 1 1, 0 0)"),
            Err(BoundaryError::Syntax(_))
        ));
    }

    #[test]
    fn contains_respects_holes() {
        let b = square_with_hole();
        assert!(contains(&b, 0.5, 0.5));
        assert!(!contains(&b, 2.0, 2.0));
        assert!(!contains(&b, 5.0, 2.0));
        assert_eq!(bounds(&b), Some(([0.0, 0.0], [4.0, 4.0])));
    }
}
