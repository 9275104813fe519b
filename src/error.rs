//! Errors surfaced by the drawing entry points

use std::fmt;

/// Rendering input errors
///
/// Out-of-bounds pixel writes are not an error: they are dropped with a
/// diagnostic. Errors are reserved for inputs that cannot be drawn at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An input slice has the wrong length: a Coons boundary that is not
    /// 12 points, a color list that is not 4 entries, or a pixel buffer
    /// whose length is not `4 * width * height`
    MalformedGeometry { expected: usize, got: usize },
    /// A control point coordinate is NaN or infinite
    DegenerateGeometry,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedGeometry { expected, got } => {
                write!(f, "malformed geometry: expected length {}, got {}", expected, got)
            }
            Error::DegenerateGeometry => {
                write!(f, "degenerate geometry: non-finite control point coordinate")
            }
        }
    }
}

impl std::error::Error for Error {}
