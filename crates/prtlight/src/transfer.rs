//! Per-vertex transport data and its rotation.

use prtmath::Float;

use crate::{BandRotations, NUM_CHANNELS, PackedSh, SH_COEFFICIENTS, ShCoefficients, ShapeError};

/// Number of values per vertex in flat transport buffers.
pub const VERTEX_STRIDE: usize = NUM_CHANNELS * SH_COEFFICIENTS;

/// Precomputed, unrotated light transport: 3 color channels of 9
/// coefficients per vertex.
///
/// The shape is checked at construction, so every vertex always has exactly
/// one coefficient vector per channel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PerVertexTransport {
    vertices: Vec<[ShCoefficients; NUM_CHANNELS]>,
}

impl PerVertexTransport {
    /// Constructs transport data from per-vertex channel coefficients.
    pub fn new(vertices: Vec<[ShCoefficients; NUM_CHANNELS]>) -> Self {
        Self { vertices }
    }

    /// Constructs transport data from nested sequences indexed by vertex,
    /// then channel, then coefficient.
    ///
    /// Returns an error if any vertex does not have exactly 3 channels of 9
    /// coefficients.
    pub fn from_nested(vertices: &[Vec<Vec<Float>>]) -> Result<Self, ShapeError> {
        let vertices = vertices
            .iter()
            .enumerate()
            .map(|(vertex, channels)| {
                let channels: &[Vec<Float>; NUM_CHANNELS] =
                    channels.as_slice().try_into().map_err(|_| ShapeError::ChannelCount {
                        vertex,
                        expected: NUM_CHANNELS,
                        got: channels.len(),
                    })?;
                let mut ret = [ShCoefficients::ZERO; NUM_CHANNELS];
                for (channel, (out, coeffs)) in std::iter::zip(&mut ret, channels).enumerate() {
                    out.0 = coeffs.as_slice().try_into().map_err(|_| {
                        ShapeError::CoefficientCount {
                            vertex,
                            channel,
                            expected: SH_COEFFICIENTS,
                            got: coeffs.len(),
                        }
                    })?;
                }
                Ok(ret)
            })
            .collect::<Result<_, ShapeError>>()?;
        Ok(Self { vertices })
    }

    /// Constructs transport data from a flat buffer indexed by vertex, then
    /// channel, then coefficient.
    ///
    /// Returns an error if the length of `values` is not a multiple of
    /// [`VERTEX_STRIDE`].
    pub fn from_flat(values: &[Float]) -> Result<Self, ShapeError> {
        let (chunks, []) = values.as_chunks::<VERTEX_STRIDE>() else {
            return Err(ShapeError::FlatLength {
                len: values.len(),
                stride: VERTEX_STRIDE,
            });
        };
        let vertices = chunks
            .iter()
            .map(|chunk| {
                std::array::from_fn(|channel| {
                    ShCoefficients(std::array::from_fn(|i| chunk[channel * SH_COEFFICIENTS + i]))
                })
            })
            .collect();
        Ok(Self { vertices })
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    /// Returns whether there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
    /// Returns the coefficients of every vertex.
    pub fn vertices(&self) -> &[[ShCoefficients; NUM_CHANNELS]] {
        &self.vertices
    }
    /// Returns the coefficients of a vertex, or `None` if it is out of range.
    pub fn get(&self, vertex: usize) -> Option<&[ShCoefficients; NUM_CHANNELS]> {
        self.vertices.get(vertex)
    }
}

impl FromIterator<[ShCoefficients; NUM_CHANNELS]> for PerVertexTransport {
    fn from_iter<T: IntoIterator<Item = [ShCoefficients; NUM_CHANNELS]>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Rotated transport: one packed matrix per color channel per vertex.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RotatedTransport {
    vertices: Vec<[PackedSh; NUM_CHANNELS]>,
}

impl RotatedTransport {
    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    /// Returns whether there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
    /// Returns the packed matrices of every vertex.
    pub fn vertices(&self) -> &[[PackedSh; NUM_CHANNELS]] {
        &self.vertices
    }
    /// Returns the packed matrices of a vertex, or `None` if it is out of
    /// range.
    pub fn get(&self, vertex: usize) -> Option<&[PackedSh; NUM_CHANNELS]> {
        self.vertices.get(vertex)
    }

    /// Returns single-precision attribute data in vertex, then channel order.
    pub fn to_attribute_buffer(&self) -> Vec<[f32; SH_COEFFICIENTS]> {
        self.vertices
            .iter()
            .flatten()
            .map(PackedSh::to_f32_array)
            .collect()
    }

    /// Returns the attribute buffer as raw bytes.
    #[cfg(feature = "bytemuck")]
    pub fn to_attribute_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_attribute_buffer()).to_vec()
    }
}

impl FromIterator<[PackedSh; NUM_CHANNELS]> for RotatedTransport {
    fn from_iter<T: IntoIterator<Item = [PackedSh; NUM_CHANNELS]>>(iter: T) -> Self {
        Self {
            vertices: iter.into_iter().collect(),
        }
    }
}

/// Rotates the color channels of one vertex and packs each one.
///
/// This also works for an RGB light expressed in the spherical harmonic
/// basis.
pub fn rotate_channels(
    channels: &[ShCoefficients; NUM_CHANNELS],
    rotations: &BandRotations,
) -> [PackedSh; NUM_CHANNELS] {
    channels.map(|coeffs| PackedSh::from_coefficients(&rotations.rotate(&coeffs)))
}

/// Rotates every vertex of `transport`.
///
/// `rotations` is computed once by the caller; nothing here depends on the
/// transform itself.
pub fn rotate_transport(
    transport: &PerVertexTransport,
    rotations: &BandRotations,
) -> RotatedTransport {
    transport
        .vertices
        .iter()
        .map(|channels| rotate_channels(channels, rotations))
        .collect()
}
