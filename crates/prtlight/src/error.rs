use prtmath::Float;
use thiserror::Error;

/// Error produced when deriving band rotation matrices for a transform.
///
/// These are precondition violations. There is no fallback rotation; a
/// caller that cannot proceed should keep its previous output explicitly
/// (see [`crate::FailurePolicy`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotationError {
    /// Sample directions do not span the band, so the sample matrix cannot be
    /// inverted.
    #[error("sample directions for band {band} produce a singular matrix")]
    SingularSampleMatrix {
        /// Band whose sample matrix is singular.
        band: usize,
    },
    /// A rotated sample direction is not unit length, which means the
    /// transform is not a pure rotation.
    #[error("rotated sample direction for band {band} has length {length}, expected 1")]
    NonUnitDirection {
        /// Band being built when the direction was rejected.
        band: usize,
        /// Length of the rotated direction.
        length: Float,
    },
}

/// Error produced when transport data does not have the layout of 3 color
/// channels with 9 coefficients each.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Wrong number of color channels for a vertex.
    #[error("vertex {vertex} has {got} channels, expected {expected}")]
    ChannelCount {
        /// Index of the offending vertex.
        vertex: usize,
        /// Required number of channels.
        expected: usize,
        /// Actual number of channels.
        got: usize,
    },
    /// Wrong number of coefficients in one channel of a vertex.
    #[error("vertex {vertex} channel {channel} has {got} coefficients, expected {expected}")]
    CoefficientCount {
        /// Index of the offending vertex.
        vertex: usize,
        /// Index of the offending channel.
        channel: usize,
        /// Required number of coefficients.
        expected: usize,
        /// Actual number of coefficients.
        got: usize,
    },
    /// Flat buffer length is not a whole number of vertices.
    #[error("flat buffer of length {len} is not a multiple of {stride}")]
    FlatLength {
        /// Length of the buffer.
        len: usize,
        /// Number of values per vertex.
        stride: usize,
    },
}

/// Any error produced by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrtError {
    /// Band rotation failed.
    #[error(transparent)]
    Rotation(#[from] RotationError),
    /// Transport data has the wrong shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
