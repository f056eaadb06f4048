//! The `box2d` value type: a 2-D bounding box (xmin, ymin, xmax, ymax).
//!
//! PostGIS prints the type as `BOX(xmin ymin,xmax ymax)` and accepts the same
//! form as input; `box2d` has no binary wire representation, so this text form
//! is the wire format.

use std::fmt;
use std::str::FromStr;

use crate::error::{GeoPostError, Result};

/// Two-dimensional bounding box enclosing a geometry or collection of
/// geometries.
///
/// # Example
///
/// ```
/// use geopost_core::box2d::Box2d;
///
/// let b: Box2d = "BOX(1 2,6.2 10.15)".parse().unwrap();
/// assert_eq!(b, Box2d::new(1.0, 2.0, 6.2, 10.15));
/// assert_eq!(b.to_string(), "BOX(1 2,6.2 10.15)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2d {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Box2d {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Build from min/max corner points.
    pub fn from_corners(min: (f64, f64), max: (f64, f64)) -> Self {
        Self::new(min.0, min.1, max.0, max.1)
    }

    /// `[xmin, ymin, xmax, ymax]` — the GeoJSON bbox ordering.
    pub fn to_array(self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl From<[f64; 4]> for Box2d {
    fn from(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl FromStr for Box2d {
    type Err = GeoPostError;

    /// Parse PostGIS `BOX(xmin ymin,xmax ymax)` output.
    ///
    /// Corner pairs may be separated by a comma, whitespace, or both; any f64
    /// literal is accepted, including negatives and exponents.
    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .trim()
            .strip_prefix("BOX(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| GeoPostError::InvalidBox2d(s.to_owned()))?;

        let mut coords = inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(f64::from_str);

        let mut next = || {
            coords
                .next()
                .ok_or_else(|| GeoPostError::InvalidBox2d(s.to_owned()))?
                .map_err(|_| GeoPostError::InvalidBox2d(s.to_owned()))
        };
        let parsed = Self::new(next()?, next()?, next()?, next()?);
        if coords.next().is_some() {
            return Err(GeoPostError::InvalidBox2d(s.to_owned()));
        }
        Ok(parsed)
    }
}

impl fmt::Display for Box2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BOX({} {},{} {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_postgis_output() {
        let b: Box2d = "BOX(1 2,6.2 10.15)".parse().unwrap();
        assert_eq!(b.to_array(), [1.0, 2.0, 6.2, 10.15]);
    }

    #[test]
    fn parses_comma_space_variants() {
        for s in [
            "BOX(1 2,6.2 10.15)",
            "BOX(1 2, 6.2 10.15)",
            "BOX(1 2 6.2 10.15)",
        ] {
            let b: Box2d = s.parse().unwrap();
            assert_eq!(b.to_array(), [1.0, 2.0, 6.2, 10.15], "input: {s}");
        }
    }

    #[test]
    fn parses_negative_and_exponent_coordinates() {
        let b: Box2d = "BOX(-79.01694 37.10411,-1.5e1 4e1)".parse().unwrap();
        assert_eq!(b.to_array(), [-79.01694, 37.10411, -15.0, 40.0]);
    }

    #[test]
    fn rejects_malformed_input() {
        for s in ["", "BOX()", "BOX(1 2)", "BOX(1 2,3 4", "1 2,3 4", "BOX(1 2,3 x)"] {
            assert!(s.parse::<Box2d>().is_err(), "should reject {s:?}");
        }
        assert!("BOX(1 2,3 4,5 6)".parse::<Box2d>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        let b = Box2d::new(1.0, 3.0, 6.6, 7.15);
        let reparsed: Box2d = b.to_string().parse().unwrap();
        assert_eq!(b, reparsed);
    }

    #[test]
    fn array_conversions() {
        let b = Box2d::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(b, Box2d::from_corners((1.0, 2.0), (3.0, 4.0)));
        assert_eq!(b.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }
}
