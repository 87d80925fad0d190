//! Caller-owned cache that recomputes rotated transport only when the
//! transform changes.

use prtmath::Float;
use prtmath::approx::AbsDiffEq;

use crate::{
    BandRotationBuilder, BandRotations, PerVertexTransport, PrtError, RotatedTransport,
    RotationError, RotationTransform, rotate_transport,
};

/// What to do when the band rotations for a new transform cannot be built.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Discard the previous output and return the error.
    #[default]
    Propagate,
    /// Keep the previous output, log a warning, and report it as stale.
    ///
    /// Output is only kept if it has the same number of vertices as the
    /// transport being updated; otherwise the error is returned.
    KeepStale,
}

/// Configuration for a [`Relighter`].
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RelightConfig {
    /// Behavior when a transform is rejected.
    pub on_failure: FailurePolicy,
    /// Maximum elementwise difference between two transforms for them to be
    /// considered the same.
    pub change_epsilon: Float,
}

impl Default for RelightConfig {
    fn default() -> Self {
        Self::STRICT
    }
}

impl RelightConfig {
    /// Returns errors and never reuses output across a rejected transform.
    pub const STRICT: Self = Self {
        on_failure: FailurePolicy::Propagate,
        change_epsilon: prtmath::EPSILON,
    };

    /// Keeps showing the last valid output when a transform is rejected.
    pub const TOLERANT: Self = Self {
        on_failure: FailurePolicy::KeepStale,
        change_epsilon: prtmath::EPSILON,
    };
}

/// Result of [`Relighter::update()`].
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// The transform changed and the output was recomputed.
    Recomputed,
    /// The transform did not change, so the output was reused.
    Unchanged,
    /// The transform was rejected and the output from a previous transform
    /// was kept.
    Stale(RotationError),
}

#[derive(Debug, Clone)]
struct RelightState {
    transform: RotationTransform,
    rotations: BandRotations,
    output: RotatedTransport,
}

/// Holds rotated transport for the most recent transform.
///
/// If the transport data itself changes without changing its vertex count,
/// call [`Relighter::invalidate()`] before the next update.
#[derive(Debug, Clone)]
pub struct Relighter {
    config: RelightConfig,
    builder: BandRotationBuilder,
    state: Option<RelightState>,
}

impl Relighter {
    /// Constructs an empty relighter.
    pub fn new(config: RelightConfig) -> Result<Self, RotationError> {
        Ok(Self {
            config,
            builder: BandRotationBuilder::new()?,
            state: None,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RelightConfig {
        &self.config
    }

    /// Brings the output up to date with `transform`.
    ///
    /// Band rotations are rebuilt at most once per call, and only if
    /// `transform` differs from the previous one.
    pub fn update(
        &mut self,
        transport: &PerVertexTransport,
        transform: &RotationTransform,
    ) -> Result<Refresh, PrtError> {
        if let Some(state) = &self.state
            && state.output.len() == transport.len()
            && state
                .transform
                .abs_diff_eq(transform, self.config.change_epsilon)
        {
            log::trace!("transform unchanged; reusing rotated transport");
            return Ok(Refresh::Unchanged);
        }

        match self.builder.build(transform) {
            Ok(rotations) => {
                let output = rotate_transport(transport, &rotations);
                self.state = Some(RelightState {
                    transform: *transform,
                    rotations,
                    output,
                });
                Ok(Refresh::Recomputed)
            }
            Err(e)
                if self.config.on_failure == FailurePolicy::KeepStale
                    && self
                        .state
                        .as_ref()
                        .is_some_and(|state| state.output.len() == transport.len()) =>
            {
                log::warn!("keeping stale rotated transport: {e}");
                Ok(Refresh::Stale(e))
            }
            Err(e) => {
                self.state = None;
                Err(e.into())
            }
        }
    }

    /// Returns the most recent output, or `None` if there is none.
    pub fn output(&self) -> Option<&RotatedTransport> {
        Some(&self.state.as_ref()?.output)
    }
    /// Returns the band rotations used for the most recent output.
    pub fn rotations(&self) -> Option<&BandRotations> {
        Some(&self.state.as_ref()?.rotations)
    }
    /// Returns the transform used for the most recent output.
    pub fn transform(&self) -> Option<&RotationTransform> {
        Some(&self.state.as_ref()?.transform)
    }

    /// Discards the output so that the next update recomputes it.
    pub fn invalidate(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ShCoefficients;

    fn transport() -> PerVertexTransport {
        PerVertexTransport::new(vec![
            [ShCoefficients(std::array::from_fn(|i| i as Float)); 3];
            3
        ])
    }

    fn scaled() -> RotationTransform {
        RotationTransform::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 3.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[test]
    fn test_recompute_only_on_change() {
        let transport = transport();
        let mut relighter = Relighter::new(RelightConfig::default()).expect("valid samples");
        assert_eq!(relighter.output(), None);

        let r1 = RotationTransform::from_rotation_y(0.5);
        assert_eq!(relighter.update(&transport, &r1), Ok(Refresh::Recomputed));
        assert_eq!(relighter.output().map(RotatedTransport::len), Some(3));
        assert_eq!(relighter.update(&transport, &r1), Ok(Refresh::Unchanged));

        let r2 = RotationTransform::from_rotation_y(0.5 + 1e-9);
        assert_eq!(relighter.update(&transport, &r2), Ok(Refresh::Unchanged));
        assert_eq!(relighter.transform(), Some(&r1));

        let r3 = RotationTransform::from_rotation_y(0.6);
        assert_eq!(relighter.update(&transport, &r3), Ok(Refresh::Recomputed));
        assert_eq!(relighter.transform(), Some(&r3));
    }

    #[test]
    fn test_vertex_count_change_recomputes() {
        let mut relighter = Relighter::new(RelightConfig::STRICT).expect("valid samples");
        let r = RotationTransform::from_rotation_x(1.0);
        assert_eq!(relighter.update(&transport(), &r), Ok(Refresh::Recomputed));
        let shorter = PerVertexTransport::new(transport().vertices()[..1].to_vec());
        assert_eq!(relighter.update(&shorter, &r), Ok(Refresh::Recomputed));
        assert_eq!(relighter.output().map(RotatedTransport::len), Some(1));

        relighter.invalidate();
        assert_eq!(relighter.rotations(), None);
        assert_eq!(relighter.update(&shorter, &r), Ok(Refresh::Recomputed));
    }

    #[test]
    fn test_propagate_policy() {
        let transport = transport();
        let mut relighter = Relighter::new(RelightConfig::STRICT).expect("valid samples");
        let r = RotationTransform::from_rotation_z(0.3);
        relighter.update(&transport, &r).expect("valid rotation");

        let result = relighter.update(&transport, &scaled());
        assert!(matches!(
            result,
            Err(PrtError::Rotation(RotationError::NonUnitDirection { .. })),
        ));
        assert_eq!(relighter.output(), None);
    }

    #[test]
    fn test_keep_stale_policy() {
        let transport = transport();
        let mut relighter = Relighter::new(RelightConfig::TOLERANT).expect("valid samples");

        // Nothing to keep yet.
        assert!(relighter.update(&transport, &scaled()).is_err());

        let r = RotationTransform::from_rotation_z(0.3);
        relighter.update(&transport, &r).expect("valid rotation");
        let before = relighter.output().cloned();

        let result = relighter.update(&transport, &scaled());
        assert!(matches!(
            result,
            Ok(Refresh::Stale(RotationError::NonUnitDirection { .. })),
        ));
        assert_eq!(relighter.output().cloned(), before);
        assert_eq!(relighter.transform(), Some(&r));
    }

    #[test]
    fn test_keep_stale_requires_same_vertex_count() {
        let mut relighter = Relighter::new(RelightConfig::TOLERANT).expect("valid samples");
        let r = RotationTransform::from_rotation_z(0.3);
        relighter.update(&transport(), &r).expect("valid rotation");

        let larger = PerVertexTransport::new(vec![[ShCoefficients::ZERO; 3]; 5]);
        let result = relighter.update(&larger, &scaled());
        assert!(matches!(
            result,
            Err(PrtError::Rotation(RotationError::NonUnitDirection { .. })),
        ));
        assert_eq!(relighter.output(), None);
    }
}
