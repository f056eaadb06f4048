//! Convenience re-exports for geopost-diesel.
//!
//! ```rust,ignore
//! use geopost_diesel::prelude::*;
//! ```

pub use crate::config::set_postgis_schema;
pub use crate::expression_methods::GeometryExpressionMethods;
pub use crate::functions::*;
pub use crate::operators::*;
pub use crate::types::{
    AsGeometryExpression, Box2d, Geography, Geometry, GeometryCollection, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
