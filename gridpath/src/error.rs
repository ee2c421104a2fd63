use thiserror::Error;

/// Failures surfaced by graph construction, the identifier codec and the
/// path searches. Each is local to the call that detects it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid grid size {width}x{height}, both dimensions must be positive")]
    InvalidGridSize { width: i32, height: i32 },

    #[error("node '{0}' does not exist in the graph")]
    UnknownNode(String),

    #[error("malformed identifier '{0}'")]
    MalformedIdentifier(String),

    #[error("no path from '{start}' to '{goal}'")]
    NoPathFound { start: String, goal: String },
}
