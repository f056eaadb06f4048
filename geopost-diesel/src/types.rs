//! Diesel SQL type definitions and `FromSql` / `ToSql` implementations.
//!
//! Geometry columns exchange EWKB — PostGIS's binary wire representation —
//! decoded into `geojson::Geometry` values (or `geo::Geometry<f64>` for
//! planar work, or raw `Vec<u8>` for passthrough). The `box2d` type has no
//! binary send/receive pair in PostGIS, so it travels in its text form.

use std::io::Write as IoWrite;

use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};

use geopost_core::error::GeoPostError;
use geopost_core::{ewkb, WGS84_SRID};

// ── SQL types ─────────────────────────────────────────────────────────────────

/// Diesel SQL type for an unconstrained `geometry` column.
///
/// ```rust,ignore
/// diesel::table! {
///     features (id) {
///         id   -> Integer,
///         geom -> Nullable<geopost_diesel::types::Geometry>,
///     }
/// }
/// ```
#[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
#[diesel(postgres_type(name = "geometry"))]
pub struct Geometry;

/// Diesel SQL type for a `geography` column.
///
/// Same wire format as [`Geometry`], but the SRID must be 4326; decoding
/// anything else is an error, and encoding always stamps 4326.
#[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
#[diesel(postgres_type(name = "geography"))]
pub struct Geography;

/// Diesel SQL type for a `box2d` column.
///
/// PostGIS defines no binary send/receive functions for `box2d`, so values
/// cross the wire in the text form `BOX(xmin ymin,xmax ymax)`. Read the
/// column through a `::text` cast (e.g. `diesel::dsl::sql::<Nullable<Box2d>>
/// ("bbox::text")`) and write it with an explicit `::box2d` cast in SQL.
#[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
#[diesel(postgres_type(name = "box2d"))]
pub struct Box2d;

macro_rules! geometry_subtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
        #[diesel(postgres_type(name = "geometry"))]
        pub struct $name;
    };
}

geometry_subtype! {
    /// `geometry(Point)` column: decoding any other GeoJSON variant fails.
    Point
}
geometry_subtype! {
    /// `geometry(MultiPoint)` column.
    MultiPoint
}
geometry_subtype! {
    /// `geometry(LineString)` column.
    LineString
}
geometry_subtype! {
    /// `geometry(MultiLineString)` column.
    MultiLineString
}
geometry_subtype! {
    /// `geometry(Polygon)` column.
    Polygon
}
geometry_subtype! {
    /// `geometry(MultiPolygon)` column.
    MultiPolygon
}
geometry_subtype! {
    /// `geometry(GeometryCollection)` column.
    GeometryCollection
}

// ── Subtype → Geometry retyping ───────────────────────────────────────────────

/// Marker for SQL types that share the `geometry` wire type and may be
/// re-typed to [`Geometry`] without generating any SQL.
///
/// `Geography` is deliberately excluded: feeding a geography expression to a
/// geometry function needs a real `::geometry` cast in SQL, not a client-side
/// relabel.
pub trait GeometrySqlType {}

impl GeometrySqlType for diesel::sql_types::Nullable<Point> {}
impl GeometrySqlType for diesel::sql_types::Nullable<MultiPoint> {}
impl GeometrySqlType for diesel::sql_types::Nullable<LineString> {}
impl GeometrySqlType for diesel::sql_types::Nullable<MultiLineString> {}
impl GeometrySqlType for diesel::sql_types::Nullable<Polygon> {}
impl GeometrySqlType for diesel::sql_types::Nullable<MultiPolygon> {}
impl GeometrySqlType for diesel::sql_types::Nullable<GeometryCollection> {}

/// A subtype expression re-typed as `Nullable<Geometry>`; renders the inner
/// expression unchanged.
#[derive(Debug, Clone, Copy)]
pub struct AsGeometry<T>(pub(crate) T);

impl<T> diesel::expression::Expression for AsGeometry<T>
where
    T: diesel::expression::Expression,
    T::SqlType: GeometrySqlType,
{
    type SqlType = diesel::sql_types::Nullable<Geometry>;
}

impl<T, GB> diesel::expression::ValidGrouping<GB> for AsGeometry<T>
where
    T: diesel::expression::ValidGrouping<GB>,
{
    type IsAggregate = T::IsAggregate;
}

impl<T, QS> diesel::expression::SelectableExpression<QS> for AsGeometry<T>
where
    T: diesel::expression::SelectableExpression<QS>,
    Self: diesel::expression::AppearsOnTable<QS>,
{
}

impl<T, QS> diesel::expression::AppearsOnTable<QS> for AsGeometry<T>
where
    T: diesel::expression::AppearsOnTable<QS>,
    Self: diesel::expression::Expression,
{
}

impl<T> diesel::query_builder::QueryId for AsGeometry<T>
where
    T: diesel::query_builder::QueryId,
{
    type QueryId = T::QueryId;
    const HAS_STATIC_QUERY_ID: bool = T::HAS_STATIC_QUERY_ID;
}

impl<T> diesel::query_builder::QueryFragment<Pg> for AsGeometry<T>
where
    T: diesel::query_builder::QueryFragment<Pg>,
{
    fn walk_ast<'b>(
        &'b self,
        out: diesel::query_builder::AstPass<'_, 'b, Pg>,
    ) -> diesel::result::QueryResult<()> {
        self.0.walk_ast(out)
    }
}

/// Re-type a geometry-subtype expression as `Nullable<Geometry>` so the
/// spatial functions and operators apply.
///
/// ```rust,ignore
/// features::table.select(features::poly.as_geometry().st_area())
/// ```
pub trait AsGeometryExpression: diesel::expression::Expression + Sized
where
    Self::SqlType: GeometrySqlType,
{
    fn as_geometry(self) -> AsGeometry<Self> {
        AsGeometry(self)
    }
}

impl<T> AsGeometryExpression for T
where
    T: diesel::expression::Expression,
    T::SqlType: GeometrySqlType,
{
}

// ── Codec helpers ─────────────────────────────────────────────────────────────

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

fn decode_geometry(blob: &[u8]) -> deserialize::Result<geojson::Geometry> {
    ewkb::geometry_from_ewkb(blob).map_err(|e| Box::new(e) as BoxedError)
}

fn decode_geography(blob: &[u8]) -> deserialize::Result<geojson::Geometry> {
    match ewkb::extract_srid(blob) {
        Some(WGS84_SRID) => decode_geometry(blob),
        Some(other) => Err(Box::new(GeoPostError::InvalidInput(format!(
            "geography EWKB must use SRID 4326 (got {other})"
        ))) as BoxedError),
        None => Err(Box::new(GeoPostError::InvalidInput(
            "geography EWKB must include SRID 4326".into(),
        )) as BoxedError),
    }
}

fn expect_variant(
    geom: geojson::Geometry,
    expected: &'static str,
) -> deserialize::Result<geojson::Geometry> {
    let got = geom.value.type_name();
    if got == expected {
        Ok(geom)
    } else {
        Err(Box::new(GeoPostError::WrongType {
            expected,
            got: got.to_owned(),
        }) as BoxedError)
    }
}

fn encode_geometry<'b>(
    geom: &geojson::Geometry,
    out: &mut Output<'b, '_, Pg>,
) -> serialize::Result {
    // GeoJSON coordinates are WGS 84 by definition (RFC 7946 §4); stamp
    // SRID 4326 so inserts satisfy SRID-constrained columns. Same default
    // as `ST_GeomFromGeoJSON`.
    let blob = ewkb::geometry_to_ewkb(geom, Some(WGS84_SRID))
        .map_err(|e| Box::new(e) as BoxedError)?;
    IoWrite::write_all(out, &blob)?;
    Ok(IsNull::No)
}

// ── geojson::Geometry ─────────────────────────────────────────────────────────

impl FromSql<Geometry, Pg> for geojson::Geometry {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        decode_geometry(bytes.as_bytes())
    }
}

impl ToSql<Geometry, Pg> for geojson::Geometry {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        encode_geometry(self, out)
    }
}

impl FromSql<Geography, Pg> for geojson::Geometry {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        decode_geography(bytes.as_bytes())
    }
}

impl ToSql<Geography, Pg> for geojson::Geometry {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        encode_geometry(self, out)
    }
}

macro_rules! impl_subtype_codec {
    ($sql_type:ty, $expected:literal) => {
        impl FromSql<$sql_type, Pg> for geojson::Geometry {
            fn from_sql(
                bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
            ) -> deserialize::Result<Self> {
                expect_variant(decode_geometry(bytes.as_bytes())?, $expected)
            }
        }

        impl ToSql<$sql_type, Pg> for geojson::Geometry {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                let got = self.value.type_name();
                if got != $expected {
                    return Err(Box::new(GeoPostError::WrongType {
                        expected: $expected,
                        got: got.to_owned(),
                    }) as BoxedError);
                }
                encode_geometry(self, out)
            }
        }
    };
}

impl_subtype_codec!(Point, "Point");
impl_subtype_codec!(MultiPoint, "MultiPoint");
impl_subtype_codec!(LineString, "LineString");
impl_subtype_codec!(MultiLineString, "MultiLineString");
impl_subtype_codec!(Polygon, "Polygon");
impl_subtype_codec!(MultiPolygon, "MultiPolygon");
impl_subtype_codec!(GeometryCollection, "GeometryCollection");

// ── Raw EWKB bytes ────────────────────────────────────────────────────────────

macro_rules! impl_raw_bytes {
    ($sql_type:ty) => {
        impl FromSql<$sql_type, Pg> for Vec<u8> {
            fn from_sql(
                bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
            ) -> deserialize::Result<Self> {
                Ok(bytes.as_bytes().to_vec())
            }
        }

        impl ToSql<$sql_type, Pg> for Vec<u8> {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                IoWrite::write_all(out, self)?;
                Ok(IsNull::No)
            }
        }
    };
}

impl_raw_bytes!(Geometry);
impl_raw_bytes!(Geography);

impl ToSql<Geometry, Pg> for [u8] {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        IoWrite::write_all(out, self)?;
        Ok(IsNull::No)
    }
}

// ── geo::Geometry<f64> (XY only) ──────────────────────────────────────────────

impl FromSql<Geometry, Pg> for geo::Geometry<f64> {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let (geom, _srid) =
            ewkb::geo_from_ewkb(bytes.as_bytes()).map_err(|e| Box::new(e) as BoxedError)?;
        Ok(geom)
    }
}

impl ToSql<Geometry, Pg> for geo::Geometry<f64> {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        // The planar model carries no reference system; leave the SRID unset.
        let blob = ewkb::geo_to_ewkb(self, None).map_err(|e| Box::new(e) as BoxedError)?;
        IoWrite::write_all(out, &blob)?;
        Ok(IsNull::No)
    }
}

impl FromSql<Geography, Pg> for geo::Geometry<f64> {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let blob = bytes.as_bytes();
        match ewkb::extract_srid(blob) {
            Some(WGS84_SRID) => {
                let (geom, _) =
                    ewkb::geo_from_ewkb(blob).map_err(|e| Box::new(e) as BoxedError)?;
                Ok(geom)
            }
            Some(other) => Err(Box::new(GeoPostError::InvalidInput(format!(
                "geography EWKB must use SRID 4326 (got {other})"
            ))) as BoxedError),
            None => Err(Box::new(GeoPostError::InvalidInput(
                "geography EWKB must include SRID 4326".into(),
            )) as BoxedError),
        }
    }
}

impl ToSql<Geography, Pg> for geo::Geometry<f64> {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let blob =
            ewkb::geo_to_ewkb(self, Some(WGS84_SRID)).map_err(|e| Box::new(e) as BoxedError)?;
        IoWrite::write_all(out, &blob)?;
        Ok(IsNull::No)
    }
}

// ── box2d (text form) ─────────────────────────────────────────────────────────

impl FromSql<Box2d, Pg> for geopost_core::Box2d {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let text = std::str::from_utf8(bytes.as_bytes())?;
        text.parse().map_err(|e: GeoPostError| Box::new(e) as BoxedError)
    }
}

impl ToSql<Box2d, Pg> for geopost_core::Box2d {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        IoWrite::write_all(out, self.to_string().as_bytes())?;
        Ok(IsNull::No)
    }
}
