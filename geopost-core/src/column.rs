//! Column DDL type strings for spatial columns.
//!
//! Diesel migrations are hand-written SQL; these helpers produce the PostGIS
//! column type spellings (`geometry(PointZ,4326)` and friends) so CREATE TABLE
//! statements and the `table!` declarations stay in agreement.

use std::fmt;

/// OGC geometry type constrained in a column declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }
}

/// Builder for a spatial column type declaration.
///
/// # Example
///
/// ```
/// use geopost_core::column::{ColumnSpec, GeometryType};
///
/// let spec = ColumnSpec::geometry()
///     .with_type(GeometryType::Point)
///     .with_srid(4326)
///     .with_z();
/// assert_eq!(spec.sql_type(), "geometry(PointZ,4326)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    base: &'static str,
    geometry_type: Option<GeometryType>,
    srid: Option<i32>,
    z: bool,
}

impl ColumnSpec {
    /// A planar `geometry` column.
    pub fn geometry() -> Self {
        Self {
            base: "geometry",
            geometry_type: None,
            srid: None,
            z: false,
        }
    }

    /// A geodetic `geography` column.
    pub fn geography() -> Self {
        Self {
            base: "geography",
            ..Self::geometry()
        }
    }

    /// Constrain the column to a geometry type.
    pub fn with_type(mut self, geometry_type: GeometryType) -> Self {
        self.geometry_type = Some(geometry_type);
        self
    }

    /// Constrain the column to a spatial reference system.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// Declare three-dimensional coordinates (`PointZ`, `PolygonZ`, …).
    ///
    /// Ignored for `GeometryCollection`, which has no Z-suffixed spelling.
    pub fn with_z(mut self) -> Self {
        self.z = true;
        self
    }

    /// The column type as it appears in DDL.
    pub fn sql_type(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(geometry_type) = self.geometry_type else {
            // An unconstrained column is spelled without a modifier list.
            return f.write_str(self.base);
        };

        let z = match geometry_type {
            GeometryType::GeometryCollection => "",
            _ if self.z => "Z",
            _ => "",
        };
        match self.srid {
            Some(srid) => write!(f, "{}({}{z},{srid})", self.base, geometry_type.as_str()),
            None => write!(f, "{}({}{z})", self.base, geometry_type.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_column() {
        assert_eq!(ColumnSpec::geometry().sql_type(), "geometry");
        assert_eq!(ColumnSpec::geography().sql_type(), "geography");
    }

    #[test]
    fn typed_column() {
        assert_eq!(
            ColumnSpec::geometry()
                .with_type(GeometryType::Point)
                .sql_type(),
            "geometry(Point)"
        );
    }

    #[test]
    fn typed_column_with_srid() {
        assert_eq!(
            ColumnSpec::geometry()
                .with_type(GeometryType::MultiPolygon)
                .with_srid(4326)
                .sql_type(),
            "geometry(MultiPolygon,4326)"
        );
    }

    #[test]
    fn z_suffix() {
        assert_eq!(
            ColumnSpec::geometry()
                .with_type(GeometryType::Point)
                .with_srid(4326)
                .with_z()
                .sql_type(),
            "geometry(PointZ,4326)"
        );
        assert_eq!(
            ColumnSpec::geometry()
                .with_type(GeometryType::LineString)
                .with_z()
                .sql_type(),
            "geometry(LineStringZ)"
        );
    }

    #[test]
    fn geometry_collection_ignores_z() {
        assert_eq!(
            ColumnSpec::geometry()
                .with_type(GeometryType::GeometryCollection)
                .with_srid(4326)
                .with_z()
                .sql_type(),
            "geometry(GeometryCollection,4326)"
        );
    }

    // Every subtype at SRID 4326, plain and Z flavours.
    #[test]
    fn full_schema_spellings() {
        let cases = [
            (GeometryType::Point, false, "geometry(Point,4326)"),
            (GeometryType::Point, true, "geometry(PointZ,4326)"),
            (GeometryType::MultiPoint, false, "geometry(MultiPoint,4326)"),
            (GeometryType::MultiPoint, true, "geometry(MultiPointZ,4326)"),
            (GeometryType::LineString, false, "geometry(LineString,4326)"),
            (GeometryType::LineString, true, "geometry(LineStringZ,4326)"),
            (
                GeometryType::MultiLineString,
                false,
                "geometry(MultiLineString,4326)",
            ),
            (
                GeometryType::MultiLineString,
                true,
                "geometry(MultiLineStringZ,4326)",
            ),
            (GeometryType::Polygon, false, "geometry(Polygon,4326)"),
            (GeometryType::Polygon, true, "geometry(PolygonZ,4326)"),
            (
                GeometryType::MultiPolygon,
                false,
                "geometry(MultiPolygon,4326)",
            ),
            (
                GeometryType::MultiPolygon,
                true,
                "geometry(MultiPolygonZ,4326)",
            ),
        ];
        for (ty, z, expected) in cases {
            let mut spec = ColumnSpec::geometry().with_type(ty).with_srid(4326);
            if z {
                spec = spec.with_z();
            }
            assert_eq!(spec.sql_type(), expected);
        }
    }

    #[test]
    fn geography_spelling() {
        assert_eq!(
            ColumnSpec::geography()
                .with_type(GeometryType::Point)
                .with_srid(4326)
                .sql_type(),
            "geography(Point,4326)"
        );
    }
}
