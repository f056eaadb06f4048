//! PostGIS binary operators as typed query-builder expressions.
//!
//! Every operator renders through PostgreSQL's explicit-operator syntax,
//! `left OPERATOR(op) right`, picking up the schema prefix from
//! [`crate::config`] when one is configured (`OPERATOR(extensions.&&)`).
//! That syntax is the only way SQL can qualify an operator at all, which is
//! why operators — unlike functions — carry the prefix themselves.
//!
//! The right operand is bound with the left operand's SQL type, so a GeoJSON
//! value can be compared directly against a geometry column:
//!
//! ```rust,ignore
//! use geopost_diesel::prelude::*;
//!
//! features::table
//!     .filter(bbox_overlaps(features::geom, Some(search_area)))
//!     .order_by(distance_knn(features::geom, Some(here)))
//!     .load(&mut conn)?;
//! ```

use diesel::expression::{
    AppearsOnTable, AsExpression, Expression, MixedAggregates, SelectableExpression,
    TypedExpressionType, ValidGrouping,
};
use diesel::pg::Pg;
use diesel::query_builder::{AstPass, QueryFragment, QueryId};
use diesel::result::QueryResult;
use diesel::sql_types::{Bool, Double, Nullable, SqlType};

macro_rules! postgis_operator {
    ($type_name:ident, $fn_name:ident, $op:literal, $ret:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy)]
        pub struct $type_name<L, R> {
            left: L,
            right: R,
        }

        impl<L, R> $type_name<L, R> {
            pub(crate) fn new(left: L, right: R) -> Self {
                Self { left, right }
            }
        }

        impl<L, R> Expression for $type_name<L, R>
        where
            L: Expression,
            R: Expression,
        {
            type SqlType = $ret;
        }

        impl<L, R, GB> ValidGrouping<GB> for $type_name<L, R>
        where
            L: ValidGrouping<GB>,
            R: ValidGrouping<GB>,
            L::IsAggregate: MixedAggregates<R::IsAggregate>,
        {
            type IsAggregate = <L::IsAggregate as MixedAggregates<R::IsAggregate>>::Output;
        }

        impl<L, R, QS> SelectableExpression<QS> for $type_name<L, R>
        where
            L: SelectableExpression<QS>,
            R: SelectableExpression<QS>,
            Self: AppearsOnTable<QS>,
        {
        }

        impl<L, R, QS> AppearsOnTable<QS> for $type_name<L, R>
        where
            L: AppearsOnTable<QS>,
            R: AppearsOnTable<QS>,
            Self: Expression,
        {
        }

        impl<L, R> QueryId for $type_name<L, R>
        where
            L: QueryId,
            R: QueryId,
        {
            type QueryId = ();
            // The rendered SQL depends on the runtime schema configuration;
            // a statically cached statement could outlive a schema change.
            // Statement caching keys on the generated SQL text instead.
            const HAS_STATIC_QUERY_ID: bool = false;
        }

        impl<L, R> QueryFragment<Pg> for $type_name<L, R>
        where
            L: QueryFragment<Pg>,
            R: QueryFragment<Pg>,
        {
            fn walk_ast<'b>(&'b self, mut out: AstPass<'_, 'b, Pg>) -> QueryResult<()> {
                out.push_sql("(");
                self.left.walk_ast(out.reborrow())?;
                out.push_sql(" OPERATOR(");
                if let Some(schema) = crate::config::postgis_schema() {
                    out.push_sql(&schema);
                    out.push_sql(".");
                }
                out.push_sql($op);
                out.push_sql(") ");
                self.right.walk_ast(out.reborrow())?;
                out.push_sql(")");
                Ok(())
            }
        }

        #[doc = $doc]
        pub fn $fn_name<L, R>(left: L, right: R) -> $type_name<L, R::Expression>
        where
            L: Expression,
            L::SqlType: SqlType + TypedExpressionType,
            R: AsExpression<L::SqlType>,
        {
            $type_name::new(left, right.as_expression())
        }
    };
}

// ── Bounding box operators ────────────────────────────────────────────────────

postgis_operator!(
    BboxOverlaps,
    bbox_overlaps,
    "&&",
    Nullable<Bool>,
    "`&&` — true if A's 2D bounding box intersects B's 2D bounding box."
);
postgis_operator!(
    BboxOverlapsNd,
    bbox_overlaps_nd,
    "&&&",
    Nullable<Bool>,
    "`&&&` — true if A's n-D bounding box intersects B's n-D bounding box."
);
postgis_operator!(
    BboxOverlapsOrLeft,
    bbox_overlaps_or_left,
    "&<",
    Nullable<Bool>,
    "`&<` — true if A's bounding box overlaps or is to the left of B's."
);
postgis_operator!(
    BboxOverlapsOrBelow,
    bbox_overlaps_or_below,
    "&<|",
    Nullable<Bool>,
    "`&<|` — true if A's bounding box overlaps or is below B's."
);
postgis_operator!(
    BboxOverlapsOrRight,
    bbox_overlaps_or_right,
    "&>",
    Nullable<Bool>,
    "`&>` — true if A's bounding box overlaps or is to the right of B's."
);
postgis_operator!(
    BboxLeft,
    bbox_left,
    "<<",
    Nullable<Bool>,
    "`<<` — true if A's bounding box is strictly to the left of B's."
);
postgis_operator!(
    BboxBelow,
    bbox_below,
    "<<|",
    Nullable<Bool>,
    "`<<|` — true if A's bounding box is strictly below B's."
);
postgis_operator!(
    BboxOverlapsOrAbove,
    bbox_overlaps_or_above,
    "|&>",
    Nullable<Bool>,
    "`|&>` — true if A's bounding box overlaps or is above B's."
);
postgis_operator!(
    BboxAbove,
    bbox_above,
    "|>>",
    Nullable<Bool>,
    "`|>>` — true if A's bounding box is strictly above B's."
);
postgis_operator!(
    BboxRight,
    bbox_right,
    ">>",
    Nullable<Bool>,
    "`>>` — true if A's bounding box is strictly to the right of B's."
);
postgis_operator!(
    BboxSame,
    bbox_same,
    "~=",
    Nullable<Bool>,
    "`~=` — true if A's bounding box is the same as B's."
);
postgis_operator!(
    BboxContained,
    bbox_contained,
    "@",
    Nullable<Bool>,
    "`@` — true if A's bounding box is contained by B's."
);
postgis_operator!(
    BboxContains,
    bbox_contains,
    "~",
    Nullable<Bool>,
    "`~` — true if A's bounding box contains B's."
);

// ── Exact equality ────────────────────────────────────────────────────────────

postgis_operator!(
    GeomEq,
    geom_eq,
    "=",
    Nullable<Bool>,
    "`=` — true if A's coordinates and coordinate order equal B's."
);

// ── Distance operators ────────────────────────────────────────────────────────

postgis_operator!(
    DistanceKnn,
    distance_knn,
    "<->",
    Nullable<Double>,
    "`<->` — the 2D distance between A and B (index-assisted in KNN order-by)."
);
postgis_operator!(
    DistanceCpa,
    distance_cpa,
    "|=|",
    Nullable<Double>,
    "`|=|` — the distance between A and B trajectories at their closest point of approach."
);
postgis_operator!(
    DistanceBox,
    distance_box,
    "<#>",
    Nullable<Double>,
    "`<#>` — the 2D distance between A's and B's bounding boxes."
);
postgis_operator!(
    DistanceCentroidNd,
    distance_centroid_nd,
    "<<->>",
    Nullable<Double>,
    "`<<->>` — the n-D distance between the centroids of A's and B's bounding boxes."
);
postgis_operator!(
    DistanceBoxNd,
    distance_box_nd,
    "<<#>>",
    Nullable<Double>,
    "`<<#>>` — the n-D distance between A's and B's bounding boxes."
);
