// error.rs — fatal compile-abort conditions

use thiserror::Error;

/// Unrecoverable conditions. Any of these aborts the whole level build;
/// there is no partial-level output on failure. Cancellation is not an
/// error and does not appear here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Malformed upstream geometry: a direction that cannot be normalized.
    #[error("degenerate {what} vector (zero length)")]
    DegenerateVector { what: &'static str },

    /// Texture name does not fit the fixed format buffer.
    #[error("texture name \"{name}\" exceeds {limit} chars")]
    TextureNameTooLong { name: String, limit: usize },

    /// A format-imposed hard table limit was reached.
    #[error("{table} table full ({limit} entries)")]
    TableOverflow { table: &'static str, limit: usize },

    /// Sun lights need a sky-visibility test, not a point-light trace.
    #[error("sun light is not supported by the point-light shading model")]
    SunLightUnsupported,
}
