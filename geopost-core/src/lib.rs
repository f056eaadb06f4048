#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geopost-core`.

pub mod box2d;
pub mod column;
pub mod error;
pub mod ewkb;

pub use box2d::Box2d;
pub use error::{GeoPostError, Result};

/// SRID of WGS 84, the GeoJSON coordinate reference system (RFC 7946 §4).
pub const WGS84_SRID: i32 = 4326;
