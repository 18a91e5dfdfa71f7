/// Progress-shaping curves used by [`crate::Animation`].
///
/// Every variant maps a progress value in `[0, 1]` to an adjusted progress.
/// Callers clamp before applying; the curves themselves do not. Note that
/// [`Curve::ImpulsePulse`] is intentionally not endpoint-normalized: it peaks
/// at progress `1/8` and decays back toward zero, so `apply(1.0)` is a small
/// positive tail value rather than `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Curve {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    /// Spikes quickly, then tapers off. Reaches its maximum of exactly `1.0`
    /// at progress `1/8`.
    ImpulsePulse,
}

impl Curve {
    pub fn apply(self, progress: f64) -> f64 {
        match self {
            Curve::Linear => progress,
            Curve::EaseIn => progress * progress * progress,
            Curve::EaseOut => {
                let adjusted = progress - 1.0;
                adjusted * adjusted * adjusted + 1.0
            }
            Curve::EaseInOut => {
                if progress < 0.5 {
                    4.0 * progress * progress * progress
                } else {
                    let adjusted = 2.0 * progress - 2.0;
                    0.5 * adjusted * adjusted * adjusted + 1.0
                }
            }
            Curve::ImpulsePulse => {
                // Decay factor 8: maximum at 1/8, near zero again by 1.0.
                let h = progress * 8.0;
                h * (1.0 - h).exp()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_curves_hit_both_endpoints() {
        for curve in [Curve::Linear, Curve::EaseIn, Curve::EaseOut, Curve::EaseInOut] {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?} at 0");
            assert_eq!(curve.apply(1.0), 1.0, "{curve:?} at 1");
        }
    }

    #[test]
    fn impulse_pulse_endpoints_are_not_normalized() {
        assert_eq!(Curve::ImpulsePulse.apply(0.0), 0.0);
        let tail = Curve::ImpulsePulse.apply(1.0);
        assert_eq!(tail, 8.0 * (-7.0f64).exp());
        assert!(tail > 0.0 && tail < 0.01);
    }

    #[test]
    fn impulse_pulse_peaks_at_one_eighth() {
        assert_eq!(Curve::ImpulsePulse.apply(0.125), 1.0);
        // The analytic maximum: every other sample stays below it.
        for step in 0..=100 {
            assert!(Curve::ImpulsePulse.apply(step as f64 / 100.0) <= 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_continuous_at_the_midpoint() {
        let below = Curve::EaseInOut.apply(0.5 - 1e-9);
        let above = Curve::EaseInOut.apply(0.5 + 1e-9);
        assert!((below - 0.5).abs() < 1e-6);
        assert!((above - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_out_mirrors_ease_in() {
        for step in 0..=10 {
            let p = step as f64 / 10.0;
            let mirrored = 1.0 - Curve::EaseIn.apply(1.0 - p);
            assert!((Curve::EaseOut.apply(p) - mirrored).abs() < 1e-12);
        }
    }
}
