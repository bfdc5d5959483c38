//! Error types for display-list recording and tessellation.

use thiserror::Error;

/// Result type for paint operations.
pub type Result<T> = std::result::Result<T, PaintError>;

/// Errors that can occur while recording or flattening a display list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    /// A pop was issued without a matching push.
    #[error("unbalanced {0} pop")]
    Unbalanced(&'static str),

    /// A color string could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Gradient has no stops to sample.
    #[error("gradient brush has no stops")]
    EmptyGradient,

    /// Vertex count exceeded the 16-bit index range.
    #[error("mesh exceeds {0} vertices")]
    MeshTooLarge(usize),
}
