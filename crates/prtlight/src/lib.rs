//! Rotation of precomputed radiance transfer (PRT) coefficients.
//!
//! Light transport is precomputed once per vertex in object space as
//! spherical harmonic coefficients for bands 0 through 2, one vector of 9
//! coefficients per color channel. When the scene or light rotates, each band
//! transforms independently by a small rotation matrix, so the rotated
//! coefficients can be derived without recomputing transport:
//!
//! 1. [`BandRotationBuilder::build()`] derives a [`BandRotations`] for a
//!    [`RotationTransform`], once per change of rotation.
//! 2. [`rotate_transport()`] applies it to every vertex of a
//!    [`PerVertexTransport`], producing one [`PackedSh`] per channel.
//! 3. [`split_channels()`] and the other repacking functions reshape the
//!    result into one contiguous array per channel.
//!
//! [`Relighter`] wraps these steps and skips them when the rotation has not
//! changed.

mod band;
mod basis;
mod direction;
mod error;
mod packed;
mod relight;
mod repack;
mod transfer;

pub use band::*;
pub use basis::*;
pub use direction::*;
pub use error::*;
pub use packed::*;
pub use prtmath::{Float, Mat3, Mat5};
pub use relight::*;
pub use repack::*;
pub use transfer::*;

/// Number of color channels.
pub const NUM_CHANNELS: usize = 3;
