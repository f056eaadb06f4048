//! Process-wide PostGIS schema qualification.
//!
//! When PostGIS is installed outside the search path (commonly in an
//! `extensions` schema on managed hosts), its operators can only be reached
//! through PostgreSQL's explicit `OPERATOR(schema.op)` syntax. Set the schema
//! once at startup and every spatial operator rendered by this crate is
//! qualified with it:
//!
//! ```rust,ignore
//! geopost_diesel::config::set_postgis_schema("extensions");
//! // … renders e.g. `a OPERATOR(extensions.&&) b`
//! ```
//!
//! Function calls keep their canonical unqualified names; point `search_path`
//! at the PostGIS schema for those (`SET search_path = public, extensions`).

use std::sync::RwLock;

static POSTGIS_SCHEMA: RwLock<Option<String>> = RwLock::new(None);

/// Set the schema PostGIS is installed in.
///
/// The name is embedded verbatim in generated SQL (it is a deployment
/// constant, not user input) — pass it unquoted and unescaped.
pub fn set_postgis_schema(schema: &str) {
    let mut guard = POSTGIS_SCHEMA
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(schema.to_owned());
}

/// Remove a previously configured schema; operators render unqualified again.
pub fn clear_postgis_schema() {
    let mut guard = POSTGIS_SCHEMA
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = None;
}

/// The currently configured PostGIS schema, if any.
pub fn postgis_schema() -> Option<String> {
    POSTGIS_SCHEMA
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
