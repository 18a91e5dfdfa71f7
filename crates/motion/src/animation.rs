use crate::curve::Curve;

/// Time-driven value generator: an immutable description of one animation
/// episode, sampled with an explicit timestamp.
///
/// Timestamps are seconds on whatever monotonic clock the caller uses; only
/// differences matter. Sampling never mutates the animation, so the owner can
/// probe it at arbitrary times and always gets a consistent snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    start_time: f64,
    duration: f64,
    start_value: f64,
    range: f64,
    curve: Curve,
}

/// Snapshot of an [`Animation`] at one point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Clamped progress in `[0, 1]`.
    pub percent: f64,
    /// `start_value + range * curve.apply(percent)`.
    pub value: f64,
    /// True exactly when `percent == 1.0`; monotonic for a monotonic clock.
    pub finished: bool,
}

impl Animation {
    /// Builds an animation running from `start_value` to `end_value` over
    /// `duration` seconds, starting at `start_time`.
    pub fn new(
        start_time: f64,
        duration: f64,
        start_value: f64,
        end_value: f64,
        curve: Curve,
    ) -> Self {
        Self::with_range(start_time, duration, start_value, end_value - start_value, curve)
    }

    pub fn with_range(
        start_time: f64,
        duration: f64,
        start_value: f64,
        range: f64,
        curve: Curve,
    ) -> Self {
        Self {
            start_time,
            duration,
            start_value,
            range,
            curve,
        }
    }

    /// Evaluates the animation at `now`.
    ///
    /// A non-positive duration would divide by zero, so it is treated as an
    /// episode that finished instantly at full progress; no NaN ever reaches
    /// the caller.
    pub fn sample(&self, now: f64) -> AnimationState {
        let percent = if self.duration > 0.0 {
            ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        AnimationState {
            percent,
            value: self.start_value + self.range * self.curve.apply(percent),
            finished: percent == 1.0,
        }
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_animation_advances_and_clamps() {
        let animation = Animation::new(0.0, 10.0, 0.0, 100.0, Curve::Linear);

        let midway = animation.sample(5.0);
        assert_eq!(midway.percent, 0.5);
        assert_eq!(midway.value, 50.0);
        assert!(!midway.finished);

        let boundary = animation.sample(10.0);
        assert_eq!(boundary.percent, 1.0);
        assert_eq!(boundary.value, 100.0);
        assert!(boundary.finished);

        let past = animation.sample(15.0);
        assert_eq!(past.percent, 1.0);
        assert_eq!(past.value, 100.0);
        assert!(past.finished, "finished must stay true once reached");
    }

    #[test]
    fn sampling_before_start_clamps_to_zero() {
        let animation = Animation::new(100.0, 10.0, 5.0, 25.0, Curve::Linear);
        let state = animation.sample(50.0);
        assert_eq!(state.percent, 0.0);
        assert_eq!(state.value, 5.0);
        assert!(!state.finished);
    }

    #[test]
    fn zero_duration_finishes_immediately_without_nan() {
        let animation = Animation::new(0.0, 0.0, 2.0, 6.0, Curve::Linear);
        let state = animation.sample(0.0);
        assert!(state.finished);
        assert_eq!(state.percent, 1.0);
        assert_eq!(state.value, 6.0);
        assert!(state.value.is_finite());

        let negative = Animation::new(0.0, -3.0, 0.0, 1.0, Curve::EaseInOut);
        assert!(negative.sample(0.0).finished);
        assert!(negative.sample(0.0).value.is_finite());
    }

    #[test]
    fn default_curve_shapes_the_value() {
        let animation = Animation::new(0.0, 4.0, 0.0, 1.0, Curve::default());
        let quarter = animation.sample(1.0);
        // ease-in-out at 0.25 is 4 * 0.25^3 = 0.0625.
        assert!((quarter.value - 0.0625).abs() < 1e-12);
    }
}
