//! Reshaping between coefficient-major and channel-major layouts.
//!
//! Nothing here does arithmetic, so every value is preserved exactly.

use prtmath::Float;

use crate::transfer::VERTEX_STRIDE;
use crate::{NUM_CHANNELS, PackedSh, RotatedTransport, SH_COEFFICIENTS, ShapeError};

/// One contiguous array of packed matrices per color channel, indexed by
/// vertex.
pub type ChannelArrays = [Vec<PackedSh>; NUM_CHANNELS];

/// Splits RGB coefficients indexed by coefficient, then channel, into one
/// packed matrix per channel.
pub fn repack_rgb(rgb: &[[Float; NUM_CHANNELS]; SH_COEFFICIENTS]) -> [PackedSh; NUM_CHANNELS] {
    std::array::from_fn(|channel| PackedSh::from_array(rgb.map(|coeff| coeff[channel])))
}

/// Applies [`repack_rgb()`] to every vertex, gathering the result into one
/// array per channel.
pub fn repack_vertices(vertices: &[[[Float; NUM_CHANNELS]; SH_COEFFICIENTS]]) -> ChannelArrays {
    let mut ret: ChannelArrays = Default::default();
    for out in &mut ret {
        out.reserve_exact(vertices.len());
    }
    for rgb in vertices {
        for (out, packed) in std::iter::zip(&mut ret, repack_rgb(rgb)) {
            out.push(packed);
        }
    }
    ret
}

/// Same as [`repack_vertices()`], but takes a flat buffer indexed by vertex,
/// then coefficient, then channel.
///
/// Returns an error if the length of `values` is not a multiple of 27.
pub fn repack_flat(values: &[Float]) -> Result<ChannelArrays, ShapeError> {
    let (chunks, []) = values.as_chunks::<VERTEX_STRIDE>() else {
        return Err(ShapeError::FlatLength {
            len: values.len(),
            stride: VERTEX_STRIDE,
        });
    };
    let vertices: Vec<[[Float; NUM_CHANNELS]; SH_COEFFICIENTS]> = chunks
        .iter()
        .map(|chunk| {
            std::array::from_fn(|coeff| {
                std::array::from_fn(|channel| chunk[coeff * NUM_CHANNELS + channel])
            })
        })
        .collect();
    Ok(repack_vertices(&vertices))
}

/// Splits rotated transport into one array per channel.
pub fn split_channels(rotated: &RotatedTransport) -> ChannelArrays {
    std::array::from_fn(|channel| {
        rotated
            .vertices()
            .iter()
            .map(|vertex| vertex[channel])
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{BandRotations, PerVertexTransport, ShCoefficients, rotate_transport};

    /// Values that would change if any arithmetic touched them.
    fn awkward(i: usize) -> Float {
        match i % 5 {
            0 => -0.0,
            1 => Float::MIN_POSITIVE / 3.0,
            2 => 0.1 + i as Float * 1e-17,
            3 => -Float::MAX,
            _ => (i as Float).sqrt(),
        }
    }

    fn assert_bits_eq(a: Float, b: Float) {
        assert_eq!(a.to_bits(), b.to_bits(), "{a:e} vs {b:e}");
    }

    #[test]
    fn test_repack_rgb() {
        let rgb: [[Float; 3]; 9] = std::array::from_fn(|coeff| {
            std::array::from_fn(|channel| (coeff * 10 + channel) as Float)
        });
        let [r, g, b] = repack_rgb(&rgb);
        assert_eq!(r.0, [[0.0, 10.0, 20.0], [30.0, 40.0, 50.0], [60.0, 70.0, 80.0]]);
        assert_eq!(g.to_array()[4], 41.0);
        assert_eq!(b.0[2][2], 82.0);
    }

    #[test]
    fn test_repack_flat_is_exact() {
        const VERTICES: usize = 7;
        let values: Vec<Float> = (0..VERTICES * VERTEX_STRIDE).map(awkward).collect();
        let channels = repack_flat(&values).expect("valid length");
        for (channel, packed) in channels.iter().enumerate() {
            assert_eq!(packed.len(), VERTICES);
            for (vertex, m) in packed.iter().enumerate() {
                for (coeff, &x) in m.to_array().iter().enumerate() {
                    let i = vertex * VERTEX_STRIDE + coeff * NUM_CHANNELS + channel;
                    assert_bits_eq(x, values[i]);
                }
            }
        }
    }

    #[test]
    fn test_repack_flat_rejects_partial_vertex() {
        assert_eq!(
            repack_flat(&[0.0; 30]),
            Err(ShapeError::FlatLength {
                len: 30,
                stride: 27,
            }),
        );
        assert!(repack_flat(&[]).is_ok_and(|channels| channels.iter().all(Vec::is_empty)));
    }

    #[test]
    fn test_split_channels() {
        let transport: PerVertexTransport = (0..5)
            .map(|vertex| {
                std::array::from_fn::<_, NUM_CHANNELS, _>(|channel| {
                    ShCoefficients(std::array::from_fn(|coeff| {
                        awkward(vertex * VERTEX_STRIDE + channel * SH_COEFFICIENTS + coeff)
                    }))
                })
            })
            .collect();
        let rotated = rotate_transport(&transport, &BandRotations::IDENT);
        let channels = split_channels(&rotated);
        for (channel, packed) in channels.iter().enumerate() {
            assert_eq!(packed.len(), 5);
            for (vertex, m) in packed.iter().enumerate() {
                assert_eq!(m, &rotated.vertices()[vertex][channel]);
            }
        }
    }
}
