#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geopost-diesel`.

pub mod config;
pub mod expression_methods;
pub mod functions;
pub mod operators;
pub mod prelude;
pub mod types;

pub use expression_methods::GeometryExpressionMethods;
pub use types::{AsGeometryExpression, Box2d, Geography, Geometry};
