//! Extension trait for method-style spatial operations on geometry expressions.
//!
//! Import [`GeometryExpressionMethods`] (or `use geopost_diesel::prelude::*`)
//! to call spatial functions and operators as methods on any
//! `Nullable<Geometry>` expression:
//!
//! ```rust,ignore
//! use geopost_diesel::prelude::*;
//!
//! features::table
//!     .filter(features::geom.st_dwithin(st_point(13.4050, 52.5200).nullable(), 1000.0))
//!     .order_by(features::geom.distance_knn(Some(here)))
//!     .select((features::id, features::geom.st_asgeojson()))
//!     .load(&mut conn)?;
//! ```

use diesel::expression::{AsExpression, Expression};
use diesel::sql_types::{Double, Integer, Nullable};

use crate::functions;
use crate::operators;
use crate::types::Geometry;

/// Method-style access to spatial SQL functions and operators for
/// `Nullable<Geometry>` expressions.
///
/// Automatically implemented for any Diesel expression with
/// `SqlType = Nullable<Geometry>`. Each method delegates to the corresponding
/// free item in [`crate::functions`] or [`crate::operators`] and generates
/// identical SQL.
///
/// For non-nullable `Geometry` expressions, call `.nullable()` first — the
/// standard Diesel pattern.
pub trait GeometryExpressionMethods: Expression<SqlType = Nullable<Geometry>> + Sized {
    // ── I/O ─────────────────────────────────────────────────────────────

    /// Serialize this geometry to WKT text.
    fn st_astext(self) -> functions::st_astext<Self> {
        functions::st_astext(self)
    }

    /// Serialize this geometry to EWKT text (`SRID=n;WKT`).
    fn st_asewkt(self) -> functions::st_asewkt<Self> {
        functions::st_asewkt(self)
    }

    /// Serialize this geometry to GeoJSON text.
    fn st_asgeojson(self) -> functions::st_asgeojson<Self> {
        functions::st_asgeojson(self)
    }

    /// Compute this geometry's full-precision GeoHash.
    fn st_geohash(self) -> functions::st_geohash<Self> {
        functions::st_geohash(self)
    }

    /// Compute this geometry's GeoHash truncated to `maxchars` characters.
    fn st_geohash_precision<N>(self, maxchars: N) -> functions::st_geohash_precision<Self, N>
    where
        N: AsExpression<Integer>,
    {
        functions::st_geohash_precision(self, maxchars)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Return the SRID embedded in this geometry.
    fn st_srid(self) -> functions::st_srid<Self> {
        functions::st_srid(self)
    }

    /// Set (replace) the SRID of this geometry.
    fn st_setsrid<S>(self, srid: S) -> functions::st_setsrid<Self, S>
    where
        S: AsExpression<Integer>,
    {
        functions::st_setsrid(self, srid)
    }

    /// Return the OGC geometry type name (e.g. `ST_Point`).
    fn st_geometrytype(self) -> functions::st_geometrytype<Self> {
        functions::st_geometrytype(self)
    }

    /// Return the X coordinate of this Point geometry.
    fn st_x(self) -> functions::st_x<Self> {
        functions::st_x(self)
    }

    /// Return the Y coordinate of this Point geometry.
    fn st_y(self) -> functions::st_y<Self> {
        functions::st_y(self)
    }

    /// Return whether this geometry is empty.
    fn st_isempty(self) -> functions::st_isempty<Self> {
        functions::st_isempty(self)
    }

    /// Return the 2-D bounding box enclosing this geometry.
    fn box2d(self) -> functions::box2d<Self> {
        functions::box2d(self)
    }

    // ── Validation ──────────────────────────────────────────────────────

    /// Return whether this geometry is valid.
    fn st_isvalid(self) -> functions::st_isvalid<Self> {
        functions::st_isvalid(self)
    }

    /// Return the validity reason string.
    fn st_isvalidreason(self) -> functions::st_isvalidreason<Self> {
        functions::st_isvalidreason(self)
    }

    // ── Measurement ─────────────────────────────────────────────────────

    /// Return the area of this polygonal geometry.
    fn st_area(self) -> functions::st_area<Self> {
        functions::st_area(self)
    }

    /// Return the planar length of this linestring geometry.
    fn st_length(self) -> functions::st_length<Self> {
        functions::st_length(self)
    }

    /// Return the planar perimeter of this polygon geometry.
    fn st_perimeter(self) -> functions::st_perimeter<Self> {
        functions::st_perimeter(self)
    }

    /// Return the minimum planar distance to another geometry.
    fn st_distance<T>(self, other: T) -> functions::st_distance<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_distance(self, other)
    }

    /// Return the spherical distance in metres to another lon/lat geometry.
    fn st_distancesphere<T>(self, other: T) -> functions::st_distancesphere<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_distancesphere(self, other)
    }

    /// Return the 2D point on this geometry closest to another.
    fn st_closestpoint<T>(self, other: T) -> functions::st_closestpoint<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_closestpoint(self, other)
    }

    /// Return the centroid of this geometry.
    fn st_centroid(self) -> functions::st_centroid<Self> {
        functions::st_centroid(self)
    }

    // ── Predicates ──────────────────────────────────────────────────────

    /// Return whether this geometry shares any points with another.
    fn st_intersects<T>(self, other: T) -> functions::st_intersects<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_intersects(self, other)
    }

    /// Return whether this geometry fully contains another.
    fn st_contains<T>(self, other: T) -> functions::st_contains<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_contains(self, other)
    }

    /// Return whether this geometry is fully contained within another.
    fn st_within<T>(self, other: T) -> functions::st_within<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_within(self, other)
    }

    /// Return whether this geometry is spatially equal to another.
    fn st_equals<T>(self, other: T) -> functions::st_equals<Self, T>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        functions::st_equals(self, other)
    }

    /// Return whether this geometry and another are within the given distance.
    fn st_dwithin<T, D>(self, other: T, distance: D) -> functions::st_dwithin<Self, T, D>
    where
        T: AsExpression<Nullable<Geometry>>,
        D: AsExpression<Double>,
    {
        functions::st_dwithin(self, other, distance)
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Expand or shrink this geometry by a given distance.
    fn st_buffer<D>(self, distance: D) -> functions::st_buffer<Self, D>
    where
        D: AsExpression<Double>,
    {
        functions::st_buffer(self, distance)
    }

    /// Reproject this geometry into another spatial reference system.
    fn st_transform<S>(self, srid: S) -> functions::st_transform<Self, S>
    where
        S: AsExpression<Integer>,
    {
        functions::st_transform(self, srid)
    }

    /// Interpolate M measure values along this linestring.
    fn st_addmeasure<A, B>(self, m_start: A, m_end: B) -> functions::st_addmeasure<Self, A, B>
    where
        A: AsExpression<Double>,
        B: AsExpression<Double>,
    {
        functions::st_addmeasure(self, m_start, m_end)
    }

    // ── Bounding box operators ──────────────────────────────────────────

    /// `&&` — whether this geometry's 2D bounding box intersects another's.
    fn bbox_overlaps<T>(self, other: T) -> operators::BboxOverlaps<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxOverlaps::new(self, other.as_expression())
    }

    /// `&&&` — whether this geometry's n-D bounding box intersects another's.
    fn bbox_overlaps_nd<T>(self, other: T) -> operators::BboxOverlapsNd<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxOverlapsNd::new(self, other.as_expression())
    }

    /// `&<` — whether this bounding box overlaps or is to the left of another.
    fn bbox_overlaps_or_left<T>(
        self,
        other: T,
    ) -> operators::BboxOverlapsOrLeft<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxOverlapsOrLeft::new(self, other.as_expression())
    }

    /// `&<|` — whether this bounding box overlaps or is below another.
    fn bbox_overlaps_or_below<T>(
        self,
        other: T,
    ) -> operators::BboxOverlapsOrBelow<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxOverlapsOrBelow::new(self, other.as_expression())
    }

    /// `&>` — whether this bounding box overlaps or is to the right of another.
    fn bbox_overlaps_or_right<T>(
        self,
        other: T,
    ) -> operators::BboxOverlapsOrRight<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxOverlapsOrRight::new(self, other.as_expression())
    }

    /// `<<` — whether this bounding box is strictly to the left of another.
    fn bbox_left<T>(self, other: T) -> operators::BboxLeft<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxLeft::new(self, other.as_expression())
    }

    /// `<<|` — whether this bounding box is strictly below another.
    fn bbox_below<T>(self, other: T) -> operators::BboxBelow<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxBelow::new(self, other.as_expression())
    }

    /// `|&>` — whether this bounding box overlaps or is above another.
    fn bbox_overlaps_or_above<T>(
        self,
        other: T,
    ) -> operators::BboxOverlapsOrAbove<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxOverlapsOrAbove::new(self, other.as_expression())
    }

    /// `|>>` — whether this bounding box is strictly above another.
    fn bbox_above<T>(self, other: T) -> operators::BboxAbove<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxAbove::new(self, other.as_expression())
    }

    /// `>>` — whether this bounding box is strictly to the right of another.
    fn bbox_right<T>(self, other: T) -> operators::BboxRight<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxRight::new(self, other.as_expression())
    }

    /// `~=` — whether this bounding box is the same as another.
    fn bbox_same<T>(self, other: T) -> operators::BboxSame<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxSame::new(self, other.as_expression())
    }

    /// `@` — whether this bounding box is contained by another.
    fn bbox_contained<T>(self, other: T) -> operators::BboxContained<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxContained::new(self, other.as_expression())
    }

    /// `~` — whether this bounding box contains another.
    fn bbox_contains<T>(self, other: T) -> operators::BboxContains<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::BboxContains::new(self, other.as_expression())
    }

    /// `=` — whether this geometry's coordinates and order equal another's.
    fn geom_eq<T>(self, other: T) -> operators::GeomEq<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::GeomEq::new(self, other.as_expression())
    }

    // ── Distance operators ──────────────────────────────────────────────

    /// `<->` — 2D distance to another geometry (index-assisted in order-by).
    fn distance_knn<T>(self, other: T) -> operators::DistanceKnn<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::DistanceKnn::new(self, other.as_expression())
    }

    /// `|=|` — trajectory distance at closest point of approach.
    fn distance_cpa<T>(self, other: T) -> operators::DistanceCpa<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::DistanceCpa::new(self, other.as_expression())
    }

    /// `<#>` — 2D distance between bounding boxes.
    fn distance_box<T>(self, other: T) -> operators::DistanceBox<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::DistanceBox::new(self, other.as_expression())
    }

    /// `<<->>` — n-D distance between bounding box centroids.
    fn distance_centroid_nd<T>(
        self,
        other: T,
    ) -> operators::DistanceCentroidNd<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::DistanceCentroidNd::new(self, other.as_expression())
    }

    /// `<<#>>` — n-D distance between bounding boxes.
    fn distance_box_nd<T>(self, other: T) -> operators::DistanceBoxNd<Self, T::Expression>
    where
        T: AsExpression<Nullable<Geometry>>,
    {
        operators::DistanceBoxNd::new(self, other.as_expression())
    }
}

impl<E> GeometryExpressionMethods for E where E: Expression<SqlType = Nullable<Geometry>> + Sized {}
