use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoPostError {
    #[error("invalid EWKB: {0}")]
    InvalidEwkb(&'static str),

    #[error("geozero error: {0}")]
    Geozero(#[from] geozero::error::GeozeroError),

    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("geometry is not a {expected} (got {got})")]
    WrongType {
        expected: &'static str,
        got: String,
    },

    #[error("invalid box2d text: {0}")]
    InvalidBox2d(String),

    #[error("unsupported coordinate dimensions: {dimensions}")]
    UnsupportedDimensions { dimensions: &'static str },

    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, GeoPostError>;
