//! Diesel SQL function declarations for PostGIS.
//!
//! Import the functions you need and use them directly in query-builder
//! expressions; PostGIS performs the computation and reports any geometry
//! errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use diesel::prelude::*;
//! use geopost_diesel::functions::*;
//!
//! let nearby: Vec<Feature> = features::table
//!     .filter(st_dwithin(features::geom, st_point(13.4050, 52.5200).nullable(), 1000.0))
//!     .load(&mut conn)?;
//! ```

use crate::types::{Box2d, Geometry};
use diesel::sql_types::{Binary, Bool, Double, Integer, Nullable, Text};

// ── I/O ───────────────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Parse WKT text into a geometry.
    fn st_geomfromtext(wkt: Text) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Parse WKT text with explicit SRID into a geometry.
    #[sql_name = "ST_GeomFromText"]
    fn st_geomfromtext_srid(wkt: Text, srid: Integer) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Serialize a geometry to WKT text.
    fn st_astext(geom: Nullable<Geometry>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Serialize a geometry to EWKT text (`SRID=n;WKT`).
    fn st_asewkt(geom: Nullable<Geometry>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Serialize a geometry to ISO WKB bytes (strips SRID).
    fn st_asbinary(geom: Nullable<Geometry>) -> Nullable<Binary>;
}

diesel::define_sql_function! {
    /// Serialize a geometry to EWKB bytes (preserves SRID).
    fn st_asewkb(geom: Nullable<Geometry>) -> Nullable<Binary>;
}

diesel::define_sql_function! {
    /// Parse ISO WKB bytes into a geometry.
    fn st_geomfromwkb(wkb: Nullable<Binary>) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Parse ISO WKB bytes with explicit SRID into a geometry.
    #[sql_name = "ST_GeomFromWKB"]
    fn st_geomfromwkb_srid(wkb: Nullable<Binary>, srid: Integer) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Parse EWKB bytes into a geometry.
    fn st_geomfromewkb(ewkb: Nullable<Binary>) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Serialize a geometry to GeoJSON text.
    fn st_asgeojson(geom: Nullable<Geometry>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Parse a GeoJSON geometry fragment into a geometry (SRID 4326).
    ///
    /// Errors on whole GeoJSON documents (Feature / FeatureCollection).
    fn st_geomfromgeojson(json: Text) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Compute a GeoHash text representation of a geometry (full precision).
    fn st_geohash(geom: Nullable<Geometry>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Compute a GeoHash truncated to `maxchars` characters.
    #[sql_name = "ST_GeoHash"]
    fn st_geohash_precision(geom: Nullable<Geometry>, maxchars: Integer) -> Nullable<Text>;
}

// ── Constructors ──────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Construct a Point geometry from X and Y coordinates.
    fn st_point(x: Double, y: Double) -> Geometry;
}

diesel::define_sql_function! {
    /// Construct a Point geometry from X and Y coordinates with explicit SRID.
    #[sql_name = "ST_Point"]
    fn st_point_srid(x: Double, y: Double, srid: Integer) -> Geometry;
}

diesel::define_sql_function! {
    /// Alias for `ST_Point`: construct a Point geometry from X and Y coordinates.
    #[sql_name = "ST_MakePoint"]
    fn st_makepoint(x: Double, y: Double) -> Geometry;
}

diesel::define_sql_function! {
    /// Construct a rectangular envelope polygon from corner coordinates.
    fn st_makeenvelope(xmin: Double, ymin: Double, xmax: Double, ymax: Double) -> Geometry;
}

diesel::define_sql_function! {
    /// Construct a rectangular envelope polygon with explicit SRID.
    #[sql_name = "ST_MakeEnvelope"]
    fn st_makeenvelope_srid(
        xmin: Double,
        ymin: Double,
        xmax: Double,
        ymax: Double,
        srid: Integer,
    ) -> Geometry;
}

diesel::define_sql_function! {
    /// Interpolate M measure values along a linestring between `m_start` and `m_end`.
    fn st_addmeasure(geom: Nullable<Geometry>, m_start: Double, m_end: Double) -> Nullable<Geometry>;
}

// ── Accessors ─────────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Return the SRID embedded in the geometry.
    fn st_srid(geom: Nullable<Geometry>) -> Nullable<Integer>;
}

diesel::define_sql_function! {
    /// Set (replace) the SRID of a geometry.
    fn st_setsrid(geom: Nullable<Geometry>, srid: Integer) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Return the OGC geometry type name (e.g. `ST_Point`, `ST_Polygon`).
    fn st_geometrytype(geom: Nullable<Geometry>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Return the X coordinate of a Point geometry, or NULL if not available.
    fn st_x(geom: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return the Y coordinate of a Point geometry, or NULL if not available.
    fn st_y(geom: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return whether the geometry is empty.
    fn st_isempty(geom: Nullable<Geometry>) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// Return the 2-D bounding box enclosing a geometry.
    #[sql_name = "Box2D"]
    fn box2d(geom: Nullable<Geometry>) -> Nullable<Box2d>;
}

// ── Validation ────────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Test whether a geometry is well-formed and valid in 2D per the OGC rules.
    fn st_isvalid(geom: Nullable<Geometry>) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// `ST_IsValid` with an ESRI flags argument (0 = OGC semantics).
    #[sql_name = "ST_IsValid"]
    fn st_isvalid_flags(geom: Nullable<Geometry>, flags: Integer) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// Return text stating whether a geometry is valid, and if not, why.
    fn st_isvalidreason(geom: Nullable<Geometry>) -> Nullable<Text>;
}

// ── Measurement ───────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Return the area of a polygonal geometry in SRID units.
    fn st_area(geom: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return the planar length of a linestring geometry.
    fn st_length(geom: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return the planar perimeter of a polygon geometry.
    fn st_perimeter(geom: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return the minimum planar distance between two geometries.
    fn st_distance(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return the spherical distance in metres between two lon/lat geometries.
    fn st_distancesphere(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Double>;
}

diesel::define_sql_function! {
    /// Return the 2D point on geometry A closest to geometry B.
    fn st_closestpoint(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Return the centroid of a geometry.
    fn st_centroid(geom: Nullable<Geometry>) -> Nullable<Geometry>;
}

// ── Predicates ────────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Return whether geometries share any interior or boundary points.
    fn st_intersects(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// Return whether geometry A fully contains geometry B.
    fn st_contains(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// Return whether geometry A is fully contained within geometry B.
    fn st_within(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// Return whether geometries are spatially equal.
    fn st_equals(a: Nullable<Geometry>, b: Nullable<Geometry>) -> Nullable<Bool>;
}

diesel::define_sql_function! {
    /// Return whether A and B are within the given planar distance.
    fn st_dwithin(a: Nullable<Geometry>, b: Nullable<Geometry>, distance: Double) -> Nullable<Bool>;
}

// ── Operations ────────────────────────────────────────────────────────────────

diesel::define_sql_function! {
    /// Expand or shrink a geometry by a given distance.
    fn st_buffer(geom: Nullable<Geometry>, distance: Double) -> Nullable<Geometry>;
}

diesel::define_sql_function! {
    /// Reproject a geometry into another spatial reference system.
    fn st_transform(geom: Nullable<Geometry>, srid: Integer) -> Nullable<Geometry>;
}
