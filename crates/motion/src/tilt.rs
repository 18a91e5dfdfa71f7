use glitterconfig::ShimmerSettings;
use tracing::debug;

use crate::animation::Animation;
use crate::curve::Curve;

/// Constant depth component mixed into every tilt vector before
/// normalization. Lower values exaggerate the apparent tilt sensitivity.
const Z_TILT: f64 = 0.15;

/// Weight of the damped gravity contribution on top of orientation offsets.
const GRAVITY_EFFECT: f64 = 0.3;

/// Minimum summed per-axis gravity delta that counts as real movement.
/// Deltas at or below this are sensor jitter and must not cause redraws.
const GRAVITY_CHANGE_THRESHOLD: f64 = 0.05;

/// Viewer-perspective offset pushed by the motion collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationOffset {
    pub horizontal: f64,
    pub vertical: f64,
}

impl OrientationOffset {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// A `(0, 0)` offset means the sensor has not produced a reading yet.
    pub fn is_idle(&self) -> bool {
        self.horizontal == 0.0 && self.vertical == 0.0
    }
}

/// Raw gravity reading from the motion collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GravitySample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GravitySample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Summed per-axis absolute difference, the distance metric used by the
    /// change gate.
    pub fn absolute_difference(&self, other: GravitySample) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

/// Unit-length light direction handed to the shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TiltVector {
    /// Fallback direction for a degenerate (zero-length) accumulator.
    pub const FACING: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    fn normalized(x: f64, y: f64, z: f64) -> Self {
        let length = (x * x + y * y + z * z).sqrt();
        if length > 0.0 && length.is_finite() {
            Self {
                x: x / length,
                y: y / length,
                z: z / length,
            }
        } else {
            Self::FACING
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Narrows to the `f32` triple the uniform structs carry.
    pub fn to_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

struct Shimmer {
    animation: Animation,
    strength: f64,
}

/// Fuses orientation offsets, gravity, and an optional shimmer episode into
/// the unit tilt vector consumed by the shaders.
///
/// All timestamps are seconds on the caller's monotonic clock; `new` captures
/// the construction instant so the ambient fallback oscillation has a phase
/// origin.
pub struct TiltEstimator {
    created_at: f64,
    offset: Option<OrientationOffset>,
    gravity: Option<GravitySample>,
    shimmer: Option<Shimmer>,
}

impl TiltEstimator {
    pub fn new(now: f64) -> Self {
        Self {
            created_at: now,
            offset: None,
            gravity: None,
            shimmer: None,
        }
    }

    /// Records a viewer-perspective offset. Idle `(0, 0)` readings are
    /// ignored so a not-yet-started sensor keeps the ambient fallback alive.
    /// Returns true when the stored offset actually changed.
    pub fn observe_offset(&mut self, offset: OrientationOffset) -> bool {
        if offset.is_idle() {
            return false;
        }
        if self.offset == Some(offset) {
            return false;
        }
        self.offset = Some(offset);
        true
    }

    /// Runs a gravity reading through the hysteresis gate.
    ///
    /// The first reading is always accepted. Afterwards a reading is accepted
    /// only when the summed per-axis delta from the last accepted sample
    /// exceeds the threshold; a delta of exactly the threshold is jitter.
    /// Returns true when the sample was accepted.
    pub fn observe_gravity(&mut self, sample: GravitySample) -> bool {
        let changed = match self.gravity {
            Some(previous) => previous.absolute_difference(sample) > GRAVITY_CHANGE_THRESHOLD,
            None => true,
        };
        if changed {
            debug!(x = sample.x, y = sample.y, z = sample.z, "accepted gravity sample");
            self.gravity = Some(sample);
        }
        changed
    }

    /// Begins a new shimmer episode, replacing any previous one. The episode
    /// sweeps the shimmer angle linearly through the configured number of
    /// full rotations.
    pub fn start_shimmer(&mut self, now: f64, settings: &ShimmerSettings) {
        self.shimmer = Some(Shimmer {
            animation: Animation::new(
                now,
                settings.duration.as_secs_f64(),
                0.0,
                std::f64::consts::TAU * settings.rotations,
                Curve::Linear,
            ),
            strength: settings.strength,
        });
    }

    /// True while a shimmer episode exists and has not run to completion.
    pub fn shimmer_running(&self, now: f64) -> bool {
        self.shimmer
            .as_ref()
            .map(|shimmer| !shimmer.animation.sample(now).finished)
            .unwrap_or(false)
    }

    /// Computes the current unit tilt vector.
    pub fn estimate(&self, now: f64) -> TiltVector {
        let mut x_tilt;
        let mut y_tilt;
        if let Some(offset) = self.offset {
            x_tilt = offset.horizontal;
            y_tilt = offset.vertical;
            if let Some(gravity) = self.gravity {
                // A small gravity term keeps the surface shimmering even when
                // the perspective offset is pegged at its extreme.
                x_tilt += (gravity.x + gravity.z / 2.0).sin() * GRAVITY_EFFECT;
                y_tilt += (gravity.y + gravity.z / 2.0).sin() * GRAVITY_EFFECT;
            }
        } else {
            // No sensor reading yet: drift slowly on the wall clock.
            let elapsed = now - self.created_at;
            x_tilt = ((elapsed * 0.9).sin() + 1.0) / 2.0;
            y_tilt = ((elapsed * 0.8).cos() + 1.0) / 2.0;
        }

        if let Some(shimmer) = &self.shimmer {
            let state = shimmer.animation.sample(now);
            let amount = Curve::ImpulsePulse.apply(state.percent) * shimmer.strength;
            x_tilt += state.value.sin() * amount;
            y_tilt += state.value.cos() * amount * 0.5;
        }

        TiltVector::normalized(x_tilt, y_tilt, Z_TILT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn shimmer_settings() -> ShimmerSettings {
        ShimmerSettings {
            duration: Duration::from_secs(3),
            rotations: 2.0,
            strength: 0.3,
        }
    }

    #[test]
    fn estimate_is_unit_length_for_all_input_combinations() {
        let mut estimator = TiltEstimator::new(0.0);
        let mut check = |estimator: &TiltEstimator, now: f64| {
            let tilt = estimator.estimate(now);
            assert!((tilt.length() - 1.0).abs() < 1e-5, "length at t={now}");
        };

        // Ambient fallback only.
        for step in 0..20 {
            check(&estimator, step as f64 * 0.37);
        }

        // Orientation offset, then gravity, then shimmer on top.
        estimator.observe_offset(OrientationOffset::new(0.8, -0.4));
        check(&estimator, 1.0);
        estimator.observe_gravity(GravitySample::new(0.1, -0.9, 0.3));
        check(&estimator, 1.5);
        estimator.start_shimmer(2.0, &shimmer_settings());
        for step in 0..30 {
            check(&estimator, 2.0 + step as f64 * 0.1);
        }
    }

    #[test]
    fn degenerate_accumulator_falls_back_to_facing() {
        assert_eq!(TiltVector::normalized(0.0, 0.0, 0.0), TiltVector::FACING);
    }

    #[test]
    fn gravity_gate_uses_strict_threshold() {
        let mut estimator = TiltEstimator::new(0.0);
        assert!(
            estimator.observe_gravity(GravitySample::new(0.0, 0.0, -1.0)),
            "first sample is always accepted"
        );

        // Summed delta of exactly 0.05 must not trigger.
        assert!(!estimator.observe_gravity(GravitySample::new(0.05, 0.0, -1.0)));
        // Under the threshold, split across axes.
        assert!(!estimator.observe_gravity(GravitySample::new(0.02, 0.02, -1.0)));
        // Just over it.
        assert!(estimator.observe_gravity(GravitySample::new(0.051, 0.0, -1.0)));
    }

    #[test]
    fn rejected_samples_do_not_move_the_reference() {
        let mut estimator = TiltEstimator::new(0.0);
        estimator.observe_gravity(GravitySample::new(0.0, 0.0, -1.0));
        // Each step is under the gate, but the sum drifts past it; the gate
        // compares against the last accepted sample, so the drift eventually
        // registers.
        assert!(!estimator.observe_gravity(GravitySample::new(0.03, 0.0, -1.0)));
        assert!(estimator.observe_gravity(GravitySample::new(0.06, 0.0, -1.0)));
    }

    #[test]
    fn idle_offset_is_ignored() {
        let mut estimator = TiltEstimator::new(0.0);
        assert!(!estimator.observe_offset(OrientationOffset::new(0.0, 0.0)));
        let ambient = estimator.estimate(1.0);

        assert!(estimator.observe_offset(OrientationOffset::new(0.5, 0.5)));
        assert!(!estimator.observe_offset(OrientationOffset::new(0.5, 0.5)));
        assert_ne!(estimator.estimate(1.0), ambient);
    }

    #[test]
    fn shimmer_runs_for_its_duration_then_stops() {
        let mut estimator = TiltEstimator::new(0.0);
        estimator.start_shimmer(10.0, &shimmer_settings());
        assert!(estimator.shimmer_running(10.0));
        assert!(estimator.shimmer_running(12.9));
        assert!(!estimator.shimmer_running(13.0));
        assert!(!estimator.shimmer_running(20.0));
    }

    #[test]
    fn finished_shimmer_barely_perturbs_the_tilt() {
        let mut with_shimmer = TiltEstimator::new(0.0);
        with_shimmer.observe_offset(OrientationOffset::new(0.3, 0.3));
        let mut without = TiltEstimator::new(0.0);
        without.observe_offset(OrientationOffset::new(0.3, 0.3));

        with_shimmer.start_shimmer(0.0, &shimmer_settings());
        let active = with_shimmer.estimate(0.4);
        let finished = with_shimmer.estimate(3.0);
        let baseline = without.estimate(3.0);

        // Mid-episode the impulse is clearly visible; at completion the
        // impulse tail is tiny and the vectors nearly agree.
        assert!((active.x - baseline.x).abs() > 1e-3);
        assert!((finished.x - baseline.x).abs() < 1e-2);
    }
}
