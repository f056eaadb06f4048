//! SQL-generation tests (no database).
//!
//! Verifies that every `GeometryExpressionMethods` method produces identical
//! SQL to the corresponding free item, and that operators render through
//! PostgreSQL's `OPERATOR(...)` syntax with and without a configured schema.

use std::sync::{Mutex, MutexGuard, OnceLock};

use diesel::dsl::select;
use diesel::pg::Pg;
use diesel::sql_types::{Integer, Nullable};
use geopost_diesel::prelude::*;

/// Geometry literal helper (not Clone, so create fresh each time via macro).
macro_rules! g {
    () => {
        diesel::dsl::sql::<Nullable<Geometry>>("geom")
    };
}

macro_rules! d {
    () => {
        diesel::dsl::sql::<diesel::sql_types::Double>("1.0")
    };
}

macro_rules! i {
    () => {
        diesel::dsl::sql::<Integer>("1")
    };
}

macro_rules! sql_of {
    ($expr:expr) => {
        diesel::debug_query::<Pg, _>(&select($expr)).to_string()
    };
}

/// Assert method-style and function-style produce identical SQL.
macro_rules! assert_method_eq_func {
    ($method_expr:expr, $func_expr:expr) => {{
        let method_sql = diesel::debug_query::<Pg, _>(&select($method_expr)).to_string();
        let func_sql = diesel::debug_query::<Pg, _>(&select($func_expr)).to_string();
        assert_eq!(method_sql, func_sql);
    }};
}

/// The schema prefix is process-global; operator-text assertions serialize on
/// this lock so the schema test cannot interleave with them.
fn schema_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Function methods ────────────────────────────────────────────────────────

#[test]
fn method_st_astext() {
    assert_method_eq_func!(g!().st_astext(), st_astext(g!()));
}

#[test]
fn method_st_asewkt() {
    assert_method_eq_func!(g!().st_asewkt(), st_asewkt(g!()));
}

#[test]
fn method_st_asgeojson() {
    assert_method_eq_func!(g!().st_asgeojson(), st_asgeojson(g!()));
}

#[test]
fn method_st_geohash() {
    assert_method_eq_func!(g!().st_geohash(), st_geohash(g!()));
}

#[test]
fn method_st_geohash_precision() {
    assert_method_eq_func!(
        g!().st_geohash_precision(i!()),
        st_geohash_precision(g!(), i!())
    );
}

#[test]
fn method_st_srid() {
    assert_method_eq_func!(g!().st_srid(), st_srid(g!()));
}

#[test]
fn method_st_setsrid() {
    assert_method_eq_func!(g!().st_setsrid(i!()), st_setsrid(g!(), i!()));
}

#[test]
fn method_st_geometrytype() {
    assert_method_eq_func!(g!().st_geometrytype(), st_geometrytype(g!()));
}

#[test]
fn method_st_x() {
    assert_method_eq_func!(g!().st_x(), st_x(g!()));
}

#[test]
fn method_st_y() {
    assert_method_eq_func!(g!().st_y(), st_y(g!()));
}

#[test]
fn method_st_isempty() {
    assert_method_eq_func!(g!().st_isempty(), st_isempty(g!()));
}

#[test]
fn method_box2d() {
    assert_method_eq_func!(g!().box2d(), box2d(g!()));
}

#[test]
fn method_st_isvalid() {
    assert_method_eq_func!(g!().st_isvalid(), st_isvalid(g!()));
}

#[test]
fn method_st_isvalidreason() {
    assert_method_eq_func!(g!().st_isvalidreason(), st_isvalidreason(g!()));
}

#[test]
fn method_st_area() {
    assert_method_eq_func!(g!().st_area(), st_area(g!()));
}

#[test]
fn method_st_length() {
    assert_method_eq_func!(g!().st_length(), st_length(g!()));
}

#[test]
fn method_st_perimeter() {
    assert_method_eq_func!(g!().st_perimeter(), st_perimeter(g!()));
}

#[test]
fn method_st_distance() {
    assert_method_eq_func!(g!().st_distance(g!()), st_distance(g!(), g!()));
}

#[test]
fn method_st_distancesphere() {
    assert_method_eq_func!(g!().st_distancesphere(g!()), st_distancesphere(g!(), g!()));
}

#[test]
fn method_st_closestpoint() {
    assert_method_eq_func!(g!().st_closestpoint(g!()), st_closestpoint(g!(), g!()));
}

#[test]
fn method_st_centroid() {
    assert_method_eq_func!(g!().st_centroid(), st_centroid(g!()));
}

#[test]
fn method_st_intersects() {
    assert_method_eq_func!(g!().st_intersects(g!()), st_intersects(g!(), g!()));
}

#[test]
fn method_st_contains() {
    assert_method_eq_func!(g!().st_contains(g!()), st_contains(g!(), g!()));
}

#[test]
fn method_st_within() {
    assert_method_eq_func!(g!().st_within(g!()), st_within(g!(), g!()));
}

#[test]
fn method_st_equals() {
    assert_method_eq_func!(g!().st_equals(g!()), st_equals(g!(), g!()));
}

#[test]
fn method_st_dwithin() {
    assert_method_eq_func!(g!().st_dwithin(g!(), d!()), st_dwithin(g!(), g!(), d!()));
}

#[test]
fn method_st_buffer() {
    assert_method_eq_func!(g!().st_buffer(d!()), st_buffer(g!(), d!()));
}

#[test]
fn method_st_transform() {
    assert_method_eq_func!(g!().st_transform(i!()), st_transform(g!(), i!()));
}

#[test]
fn method_st_addmeasure() {
    assert_method_eq_func!(g!().st_addmeasure(d!(), d!()), st_addmeasure(g!(), d!(), d!()));
}

// ── Function rendering ──────────────────────────────────────────────────────

#[test]
fn functions_render_canonical_names() {
    assert!(sql_of!(st_astext(g!())).contains("st_astext("));
    assert!(sql_of!(st_geomfromtext("POINT(1 2)")).contains("st_geomfromtext("));
    assert!(sql_of!(st_point(1.0, 2.0)).contains("st_point("));
    assert!(sql_of!(st_makepoint(1.0, 2.0)).contains("ST_MakePoint("));
    assert!(sql_of!(st_geohash_precision(g!(), i!())).contains("ST_GeoHash("));
    assert!(sql_of!(st_isvalid_flags(g!(), i!())).contains("ST_IsValid("));
    assert!(sql_of!(box2d(g!())).contains("Box2D("));
}

#[test]
fn function_arguments_are_bound_not_spliced() {
    let sql = sql_of!(st_geomfromtext("POINT(1 2)"));
    assert!(sql.contains("$1"), "WKT should bind as a parameter: {sql}");
}

#[test]
fn as_geometry_is_sql_transparent() {
    let plain = sql_of!(diesel::dsl::sql::<Nullable<Point>>("pt"));
    let retyped = sql_of!(diesel::dsl::sql::<Nullable<Point>>("pt").as_geometry());
    assert_eq!(plain, retyped);
}

#[test]
fn as_geometry_feeds_geometry_functions() {
    let via_retype = sql_of!(diesel::dsl::sql::<Nullable<Point>>("pt").as_geometry().st_x());
    assert!(via_retype.contains("st_x("), "retyped column should render: {via_retype}");
}

// ── Operator methods ────────────────────────────────────────────────────────

#[test]
fn method_operators_match_free_functions() {
    let _guard = schema_lock();
    assert_method_eq_func!(g!().bbox_overlaps(g!()), bbox_overlaps(g!(), g!()));
    assert_method_eq_func!(g!().bbox_overlaps_nd(g!()), bbox_overlaps_nd(g!(), g!()));
    assert_method_eq_func!(
        g!().bbox_overlaps_or_left(g!()),
        bbox_overlaps_or_left(g!(), g!())
    );
    assert_method_eq_func!(
        g!().bbox_overlaps_or_below(g!()),
        bbox_overlaps_or_below(g!(), g!())
    );
    assert_method_eq_func!(
        g!().bbox_overlaps_or_right(g!()),
        bbox_overlaps_or_right(g!(), g!())
    );
    assert_method_eq_func!(g!().bbox_left(g!()), bbox_left(g!(), g!()));
    assert_method_eq_func!(g!().bbox_below(g!()), bbox_below(g!(), g!()));
    assert_method_eq_func!(
        g!().bbox_overlaps_or_above(g!()),
        bbox_overlaps_or_above(g!(), g!())
    );
    assert_method_eq_func!(g!().bbox_above(g!()), bbox_above(g!(), g!()));
    assert_method_eq_func!(g!().bbox_right(g!()), bbox_right(g!(), g!()));
    assert_method_eq_func!(g!().bbox_same(g!()), bbox_same(g!(), g!()));
    assert_method_eq_func!(g!().bbox_contained(g!()), bbox_contained(g!(), g!()));
    assert_method_eq_func!(g!().bbox_contains(g!()), bbox_contains(g!(), g!()));
    assert_method_eq_func!(g!().geom_eq(g!()), geom_eq(g!(), g!()));
    assert_method_eq_func!(g!().distance_knn(g!()), distance_knn(g!(), g!()));
    assert_method_eq_func!(g!().distance_cpa(g!()), distance_cpa(g!(), g!()));
    assert_method_eq_func!(g!().distance_box(g!()), distance_box(g!(), g!()));
    assert_method_eq_func!(
        g!().distance_centroid_nd(g!()),
        distance_centroid_nd(g!(), g!())
    );
    assert_method_eq_func!(g!().distance_box_nd(g!()), distance_box_nd(g!(), g!()));
}

// ── Operator rendering ──────────────────────────────────────────────────────

#[test]
fn operators_render_explicit_operator_syntax() {
    let _guard = schema_lock();
    let cases = [
        (sql_of!(bbox_overlaps(g!(), g!())), "OPERATOR(&&)"),
        (sql_of!(bbox_overlaps_nd(g!(), g!())), "OPERATOR(&&&)"),
        (sql_of!(bbox_overlaps_or_left(g!(), g!())), "OPERATOR(&<)"),
        (sql_of!(bbox_overlaps_or_below(g!(), g!())), "OPERATOR(&<|)"),
        (sql_of!(bbox_overlaps_or_right(g!(), g!())), "OPERATOR(&>)"),
        (sql_of!(bbox_left(g!(), g!())), "OPERATOR(<<)"),
        (sql_of!(bbox_below(g!(), g!())), "OPERATOR(<<|)"),
        (sql_of!(bbox_overlaps_or_above(g!(), g!())), "OPERATOR(|&>)"),
        (sql_of!(bbox_above(g!(), g!())), "OPERATOR(|>>)"),
        (sql_of!(bbox_right(g!(), g!())), "OPERATOR(>>)"),
        (sql_of!(geom_eq(g!(), g!())), "OPERATOR(=)"),
        (sql_of!(bbox_same(g!(), g!())), "OPERATOR(~=)"),
        (sql_of!(bbox_contained(g!(), g!())), "OPERATOR(@)"),
        (sql_of!(bbox_contains(g!(), g!())), "OPERATOR(~)"),
        (sql_of!(distance_knn(g!(), g!())), "OPERATOR(<->)"),
        (sql_of!(distance_cpa(g!(), g!())), "OPERATOR(|=|)"),
        (sql_of!(distance_box(g!(), g!())), "OPERATOR(<#>)"),
        (sql_of!(distance_centroid_nd(g!(), g!())), "OPERATOR(<<->>)"),
        (sql_of!(distance_box_nd(g!(), g!())), "OPERATOR(<<#>>)"),
    ];
    for (sql, expected) in cases {
        assert!(sql.contains(expected), "{expected} missing from: {sql}");
    }
}

#[test]
fn operator_right_operand_binds_with_left_sql_type() {
    let _guard = schema_lock();
    let value = geojson::Geometry::new(geojson::Value::Point(vec![1.0, 2.0]));
    let sql = sql_of!(bbox_overlaps(g!(), Some(value)));
    assert!(
        sql.contains("OPERATOR(&&) $1"),
        "value operand should bind as a parameter: {sql}"
    );
}

#[test]
fn operators_qualify_with_configured_schema() {
    let _guard = schema_lock();
    geopost_diesel::config::set_postgis_schema("extensions");
    let qualified = sql_of!(bbox_overlaps(g!(), g!()));
    geopost_diesel::config::clear_postgis_schema();

    assert!(
        qualified.contains("OPERATOR(extensions.&&)"),
        "expected schema-qualified operator: {qualified}"
    );

    let unqualified = sql_of!(bbox_overlaps(g!(), g!()));
    assert!(
        unqualified.contains("OPERATOR(&&)") && !unqualified.contains("extensions."),
        "clearing the schema must drop the prefix: {unqualified}"
    );
}
