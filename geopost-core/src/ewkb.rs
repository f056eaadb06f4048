//! EWKB (Extended Well-Known Binary) header handling and value conversion.
//!
//! Wire format:
//!   [0x01|0x00]   — byte order marker (little-endian or big-endian)
//!   [u32]         — geometry type with flags (in the declared byte order)
//!                   Bit 29 (0x20000000): SRID present
//!                   Bit 31 (0x80000000): Z dimension
//!                   Bit 30 (0x40000000): M dimension
//!                   Bits 0–28: geometry type (1=Point, 2=LineString, …)
//!   [i32]         — SRID (only when SRID flag set, in declared byte order)
//!   …             — ISO WKB geometry payload
//!
//! Payload encoding and decoding is delegated to geozero; only the header is
//! read and patched by hand. Conversions target the GeoJSON value model
//! (`geojson::Geometry`), with an XY-only `geo::Geometry<f64>` path for
//! planar-computation users.

use geojson::{Geometry, Value};
use geozero::geojson::GeoJsonWriter;
use geozero::wkb::Ewkb;
use geozero::{CoordDimensions, GeozeroGeometry, ToGeo, ToWkb};

use crate::error::{GeoPostError, Result};

// ── EWKB flag constants ───────────────────────────────────────────────────────
pub const EWKB_SRID_FLAG: u32 = 0x20000000;
pub const EWKB_Z_FLAG: u32 = 0x80000000;
pub const EWKB_M_FLAG: u32 = 0x40000000;

// ── Geometry type codes (ISO WKB) ─────────────────────────────────────────────
pub const WKB_POINT: u32 = 1;
pub const WKB_LINESTRING: u32 = 2;
pub const WKB_POLYGON: u32 = 3;
pub const WKB_MULTIPOINT: u32 = 4;
pub const WKB_MULTILINESTRING: u32 = 5;
pub const WKB_MULTIPOLYGON: u32 = 6;
pub const WKB_GEOMETRYCOLLECTION: u32 = 7;

fn read_f64(bytes: [u8; 8], little_endian: bool) -> f64 {
    if little_endian {
        f64::from_le_bytes(bytes)
    } else {
        f64::from_be_bytes(bytes)
    }
}

fn dimensions_label(has_z: bool, has_m: bool) -> &'static str {
    match (has_z, has_m) {
        (true, true) => "ZM",
        (true, false) => "Z",
        (false, true) => "M",
        (false, false) => "XY",
    }
}

/// Reject Z/M coordinate layouts when the operation can only process XY.
pub fn ensure_xy_only(has_z: bool, has_m: bool) -> Result<()> {
    if has_z || has_m {
        return Err(GeoPostError::UnsupportedDimensions {
            dimensions: dimensions_label(has_z, has_m),
        });
    }
    Ok(())
}

fn point_is_empty_with_header(blob: &[u8], header: &EwkbHeader) -> Result<bool> {
    if header.geom_type != WKB_POINT {
        return Ok(false);
    }

    let dims = 2 + usize::from(header.has_z) + usize::from(header.has_m);
    let needed = header.data_offset + 8 * dims;
    if blob.len() < needed {
        return Err(GeoPostError::InvalidEwkb("point payload truncated"));
    }

    let mut x_bytes = [0u8; 8];
    x_bytes.copy_from_slice(&blob[header.data_offset..header.data_offset + 8]);
    let mut y_bytes = [0u8; 8];
    y_bytes.copy_from_slice(&blob[header.data_offset + 8..header.data_offset + 16]);

    let x = read_f64(x_bytes, header.little_endian);
    let y = read_f64(y_bytes, header.little_endian);
    Ok(x.is_nan() && y.is_nan())
}

/// Return true when the EWKB blob encodes `POINT EMPTY`.
pub fn is_empty_point_blob(blob: &[u8]) -> Result<bool> {
    let header = parse_ewkb_header(blob)?;
    point_is_empty_with_header(blob, &header)
}

/// Render an EWKB payload as GeoJSON text, carrying the Z dimension through.
///
/// The writer's dimensions must be requested explicitly or the reader hands
/// it XY pairs only.
fn ewkb_to_json(blob: &[u8], has_z: bool) -> Result<String> {
    let dims = if has_z {
        CoordDimensions::xyz()
    } else {
        CoordDimensions::xy()
    };
    let mut out: Vec<u8> = Vec::new();
    let mut writer = GeoJsonWriter::with_dims(&mut out, dims);
    Ewkb(blob).process_geom(&mut writer)?;
    String::from_utf8(out).map_err(|_| GeoPostError::InvalidEwkb("non-UTF8 GeoJSON output"))
}

/// Validate EWKB header + payload without deserializing into a value type.
pub fn validate_ewkb_payload(blob: &[u8]) -> Result<EwkbHeader> {
    let header = parse_ewkb_header(blob)?;
    if !point_is_empty_with_header(blob, &header)? {
        let _ = ewkb_to_json(blob, header.has_z)?;
    }
    Ok(header)
}

/// Parsed EWKB header metadata.
#[derive(Debug, Clone)]
pub struct EwkbHeader {
    /// Base geometry type code (1=Point, 2=LineString, ..., 7=GeometryCollection).
    pub geom_type: u32,
    /// SRID embedded in the EWKB, if the SRID flag is set.
    pub srid: Option<i32>,
    /// Whether the geometry has Z coordinates.
    pub has_z: bool,
    /// Whether the geometry has M coordinates.
    pub has_m: bool,
    /// Byte offset where the geometry payload starts (after header + optional SRID).
    pub data_offset: usize,
    /// Whether numeric header fields are encoded in little-endian order.
    pub little_endian: bool,
}

/// Peek at the EWKB header without parsing the geometry payload.
///
/// # Example
///
/// ```
/// use geojson::{Geometry, Value};
/// use geopost_core::ewkb::{geometry_to_ewkb, parse_ewkb_header};
///
/// let geom = Geometry::new(Value::Point(vec![1.0, 2.0]));
/// let blob = geometry_to_ewkb(&geom, Some(4326)).unwrap();
/// let hdr = parse_ewkb_header(&blob).unwrap();
/// assert_eq!(hdr.geom_type, 1); // WKB_POINT
/// assert_eq!(hdr.srid, Some(4326));
/// ```
pub fn parse_ewkb_header(blob: &[u8]) -> Result<EwkbHeader> {
    if blob.len() < 5 {
        return Err(GeoPostError::InvalidEwkb("blob too short"));
    }

    let little_endian = match blob[0] {
        0x01 => true,
        0x00 => false,
        _ => return Err(GeoPostError::InvalidEwkb("invalid byte order marker")),
    };

    let read_u32 = |bytes: [u8; 4]| {
        if little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        }
    };
    let read_i32 = |bytes: [u8; 4]| {
        if little_endian {
            i32::from_le_bytes(bytes)
        } else {
            i32::from_be_bytes(bytes)
        }
    };

    let raw_type = read_u32([blob[1], blob[2], blob[3], blob[4]]);
    let has_srid = (raw_type & EWKB_SRID_FLAG) != 0;
    let has_z = (raw_type & EWKB_Z_FLAG) != 0;
    let has_m = (raw_type & EWKB_M_FLAG) != 0;
    let geom_type = raw_type & 0x1FFFFFFF;

    let mut offset = 5usize;
    let srid = if has_srid {
        if blob.len() < 9 {
            return Err(GeoPostError::InvalidEwkb(
                "SRID flag set but blob too short",
            ));
        }
        let s = read_i32([blob[5], blob[6], blob[7], blob[8]]);
        offset += 4;
        Some(s)
    } else {
        None
    };

    Ok(EwkbHeader {
        geom_type,
        srid,
        has_z,
        has_m,
        data_offset: offset,
        little_endian,
    })
}

/// Extract only the SRID from an EWKB blob (cheap, no geometry parsing).
///
/// # Example
///
/// ```
/// use geojson::{Geometry, Value};
/// use geopost_core::ewkb::{extract_srid, geometry_to_ewkb};
///
/// let geom = Geometry::new(Value::Point(vec![1.0, 2.0]));
/// assert_eq!(extract_srid(&geometry_to_ewkb(&geom, Some(4326)).unwrap()), Some(4326));
/// assert_eq!(extract_srid(&geometry_to_ewkb(&geom, None).unwrap()), None);
/// ```
pub fn extract_srid(blob: &[u8]) -> Option<i32> {
    parse_ewkb_header(blob).ok().and_then(|h| h.srid)
}

/// Rewrite the SRID in an existing EWKB blob without re-encoding the payload.
///
/// # Example
///
/// ```
/// use geojson::{Geometry, Value};
/// use geopost_core::ewkb::{extract_srid, geometry_to_ewkb, set_srid};
///
/// let geom = Geometry::new(Value::Point(vec![1.0, 2.0]));
/// let blob = geometry_to_ewkb(&geom, Some(4326)).unwrap();
/// let updated = set_srid(&blob, 3857).unwrap();
/// assert_eq!(extract_srid(&updated), Some(3857));
/// ```
pub fn set_srid(blob: &[u8], new_srid: i32) -> Result<Vec<u8>> {
    // Validate the full payload before rewriting header bytes so malformed
    // EWKB cannot be silently "fixed" by adding/replacing an SRID.
    let header = validate_ewkb_payload(blob)?;

    let mut out = Vec::with_capacity(blob.len() + 4);
    out.push(if header.little_endian { 0x01 } else { 0x00 });

    let raw_type = if header.little_endian {
        u32::from_le_bytes([blob[1], blob[2], blob[3], blob[4]])
    } else {
        u32::from_be_bytes([blob[1], blob[2], blob[3], blob[4]])
    };
    let ewkb_type = raw_type | EWKB_SRID_FLAG;
    if header.little_endian {
        out.extend_from_slice(&ewkb_type.to_le_bytes());
        out.extend_from_slice(&new_srid.to_le_bytes());
    } else {
        out.extend_from_slice(&ewkb_type.to_be_bytes());
        out.extend_from_slice(&new_srid.to_be_bytes());
    }

    // Skip old SRID bytes if they were present, copy remaining payload
    out.extend_from_slice(&blob[header.data_offset..]);
    Ok(out)
}

// ── GeoJSON conversion ────────────────────────────────────────────────────────

fn first_position(value: &Value) -> Option<&Vec<f64>> {
    match value {
        Value::Point(p) => Some(p),
        Value::MultiPoint(ps) | Value::LineString(ps) => ps.first(),
        Value::MultiLineString(ls) | Value::Polygon(ls) => ls.first().and_then(|l| l.first()),
        Value::MultiPolygon(polys) => polys
            .first()
            .and_then(|p| p.first())
            .and_then(|r| r.first()),
        Value::GeometryCollection(geoms) => {
            geoms.first().and_then(|g| first_position(&g.value))
        }
    }
}

/// Whether the geometry carries third (elevation) coordinates.
pub fn value_has_z(value: &Value) -> bool {
    first_position(value).is_some_and(|pos| pos.len() > 2)
}

fn is_empty_point_value(value: &Value) -> bool {
    matches!(value, Value::Point(p) if p.is_empty())
}

/// Parse an EWKB blob into a GeoJSON geometry value.
///
/// Z coordinates are preserved as third positions. M values have no GeoJSON
/// representation and are rejected rather than silently dropped. `POINT EMPTY`
/// (NaN NaN payload) decodes to a Point with empty coordinates, matching what
/// PostGIS emits from `ST_AsGeoJSON`.
///
/// # Example
///
/// ```
/// use geojson::{Geometry, Value};
/// use geopost_core::ewkb::{geometry_from_ewkb, geometry_to_ewkb};
///
/// let geom = Geometry::new(Value::Point(vec![1.0, 2.0, 3.0]));
/// let blob = geometry_to_ewkb(&geom, Some(4326)).unwrap();
/// assert_eq!(geometry_from_ewkb(&blob).unwrap(), geom);
/// ```
pub fn geometry_from_ewkb(blob: &[u8]) -> Result<Geometry> {
    let header = parse_ewkb_header(blob)?;
    if header.has_m {
        return Err(GeoPostError::UnsupportedDimensions {
            dimensions: dimensions_label(header.has_z, true),
        });
    }
    if point_is_empty_with_header(blob, &header)? {
        return Ok(Geometry::new(Value::Point(vec![])));
    }
    let json = ewkb_to_json(blob, header.has_z)?;
    Ok(serde_json::from_str(&json)?)
}

/// Serialise a GeoJSON geometry value to EWKB with an optional SRID.
///
/// Coordinate dimensions (XY vs XYZ) are detected from the positions. If
/// `srid` is `None`, the SRID flag and field are omitted. A Point with empty
/// coordinates encodes as the NaN NaN payload PostGIS uses for `POINT EMPTY`.
pub fn geometry_to_ewkb(geom: &Geometry, srid: Option<i32>) -> Result<Vec<u8>> {
    if is_empty_point_value(&geom.value) {
        let mut out = Vec::with_capacity(if srid.is_some() { 25 } else { 21 });
        out.push(0x01);
        let mut geom_type = WKB_POINT;
        if srid.is_some() {
            geom_type |= EWKB_SRID_FLAG;
        }
        out.extend_from_slice(&geom_type.to_le_bytes());
        if let Some(srid_val) = srid {
            out.extend_from_slice(&srid_val.to_le_bytes());
        }
        out.extend_from_slice(&f64::NAN.to_le_bytes());
        out.extend_from_slice(&f64::NAN.to_le_bytes());
        return Ok(out);
    }

    let dims = if value_has_z(&geom.value) {
        CoordDimensions::xyz()
    } else {
        CoordDimensions::xy()
    };
    let json = serde_json::to_string(geom)?;
    Ok(geozero::geojson::GeoJson(&json).to_ewkb(dims, srid)?)
}

// ── Hex transport ─────────────────────────────────────────────────────────────
// Text-protocol drivers exchange geometry as hex-encoded EWKB; PostGIS prints
// uppercase digits.

/// Hex-encode an EWKB blob the way PostGIS prints it.
pub fn encode_hex(blob: &[u8]) -> String {
    let mut out = String::with_capacity(blob.len() * 2);
    for b in blob {
        out.push_str(&format!("{b:02X}"));
    }
    out
}

/// Decode hex-encoded EWKB (case-insensitive).
pub fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(GeoPostError::InvalidEwkb("odd-length hex input"));
    }
    let mut out = Vec::with_capacity(hex.len() / 2);
    let bytes = hex.as_bytes();
    for pair in bytes.chunks_exact(2) {
        let hi = (pair[0] as char)
            .to_digit(16)
            .ok_or(GeoPostError::InvalidEwkb("invalid hex digit"))?;
        let lo = (pair[1] as char)
            .to_digit(16)
            .ok_or(GeoPostError::InvalidEwkb("invalid hex digit"))?;
        out.push(((hi << 4) | lo) as u8);
    }
    Ok(out)
}

/// Parse hex-encoded EWKB (the textual wire form) into a GeoJSON geometry.
///
/// # Example
///
/// ```
/// use geojson::{Geometry, Value};
/// use geopost_core::ewkb::{encode_hex, geometry_from_hex_ewkb, geometry_to_ewkb};
///
/// let geom = Geometry::new(Value::Point(vec![1.0, 2.0]));
/// let hex = encode_hex(&geometry_to_ewkb(&geom, Some(4326)).unwrap());
/// assert_eq!(geometry_from_hex_ewkb(&hex).unwrap(), geom);
/// ```
pub fn geometry_from_hex_ewkb(hex: &str) -> Result<Geometry> {
    geometry_from_ewkb(&decode_hex(hex)?)
}

// ── geo::Geometry interop (XY only) ───────────────────────────────────────────

/// Parse an EWKB blob into a `geo::Geometry<f64>`. Returns `(geometry, srid)`.
///
/// Z/M payloads are rejected, not flattened; the planar model cannot carry
/// them.
pub fn geo_from_ewkb(blob: &[u8]) -> Result<(geo::Geometry<f64>, Option<i32>)> {
    let header = parse_ewkb_header(blob)?;
    ensure_xy_only(header.has_z, header.has_m)?;
    if point_is_empty_with_header(blob, &header)? {
        return Ok((
            geo::Geometry::Point(geo::Point::new(f64::NAN, f64::NAN)),
            header.srid,
        ));
    }
    let geom = Ewkb(blob).to_geo()?;
    Ok((geom, header.srid))
}

fn patch_wkb_with_srid(iso_wkb: &[u8], srid_val: i32) -> Result<Vec<u8>> {
    if iso_wkb.len() < 5 {
        return Err(GeoPostError::InvalidEwkb("WKB output too short"));
    }
    let little_endian = match iso_wkb[0] {
        0x01 => true,
        0x00 => false,
        _ => return Err(GeoPostError::InvalidEwkb("invalid byte order marker")),
    };
    let raw_type = if little_endian {
        u32::from_le_bytes([iso_wkb[1], iso_wkb[2], iso_wkb[3], iso_wkb[4]])
    } else {
        u32::from_be_bytes([iso_wkb[1], iso_wkb[2], iso_wkb[3], iso_wkb[4]])
    };
    let ewkb_type = raw_type | EWKB_SRID_FLAG;

    // ISO WKB: [byte_order(1)][type_u32(4)][payload…]
    // EWKB:    [byte_order(1)][type_u32_with_flag(4)][srid_i32(4)][payload…]
    let mut out = Vec::with_capacity(iso_wkb.len() + 4);
    out.push(iso_wkb[0]);
    if little_endian {
        out.extend_from_slice(&ewkb_type.to_le_bytes());
        out.extend_from_slice(&srid_val.to_le_bytes());
    } else {
        out.extend_from_slice(&ewkb_type.to_be_bytes());
        out.extend_from_slice(&srid_val.to_be_bytes());
    }
    out.extend_from_slice(&iso_wkb[5..]);
    Ok(out)
}

/// Serialise a `geo::Geometry<f64>` to EWKB with an optional SRID.
///
/// If `srid` is `None`, produces standard ISO WKB (no SRID flag).
pub fn geo_to_ewkb(geom: &geo::Geometry<f64>, srid: Option<i32>) -> Result<Vec<u8>> {
    if let geo::Geometry::Point(p) = geom {
        if p.x().is_nan() && p.y().is_nan() {
            return geometry_to_ewkb(&Geometry::new(Value::Point(vec![])), srid);
        }
    }

    let iso_wkb = geom
        .to_wkb(CoordDimensions::xy())
        .map_err(GeoPostError::Geozero)?;

    if let Some(srid_val) = srid {
        patch_wkb_with_srid(&iso_wkb, srid_val)
    } else {
        Ok(iso_wkb)
    }
}
