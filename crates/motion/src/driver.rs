use glitterconfig::ShimmerSettings;
use tracing::debug;

use crate::frame::FrameScheduler;
use crate::tilt::{GravitySample, OrientationOffset, TiltEstimator, TiltVector};

/// Per-tick verdict from the motion pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickDecision {
    /// Nothing meaningful changed; issue no render work for this tick.
    Skip,
    /// Redraw with this tilt direction.
    Redraw { tilt: TiltVector },
}

impl TickDecision {
    pub fn is_redraw(&self) -> bool {
        matches!(self, TickDecision::Redraw { .. })
    }
}

/// Glues the tilt estimator and frame scheduler together behind the three
/// callbacks a host surface forwards: orientation offsets, layout changes,
/// and display-refresh ticks.
pub struct MotionDriver {
    estimator: TiltEstimator,
    scheduler: FrameScheduler,
    shimmer: ShimmerSettings,
}

impl MotionDriver {
    pub fn new(now: f64, shimmer: ShimmerSettings) -> Self {
        Self {
            estimator: TiltEstimator::new(now),
            scheduler: FrameScheduler::new(),
            shimmer,
        }
    }

    /// Viewer-perspective callback from the host. A changed offset schedules
    /// a redraw on the next tick.
    pub fn observe_offset(&mut self, offset: OrientationOffset) {
        if self.estimator.observe_offset(offset) {
            self.scheduler.invalidate();
        }
    }

    /// Layout/surface-size change: the cached picture is stale regardless of
    /// motion state.
    pub fn invalidate(&mut self) {
        self.scheduler.invalidate();
    }

    /// Begins one shimmer episode with the configured duration, rotations,
    /// and strength.
    pub fn start_auto_shimmer(&mut self, now: f64) {
        debug!(
            duration_s = self.shimmer.duration.as_secs_f64(),
            rotations = self.shimmer.rotations,
            "starting shimmer episode"
        );
        self.estimator.start_shimmer(now, &self.shimmer);
    }

    pub fn shimmer_running(&self, now: f64) -> bool {
        self.estimator.shimmer_running(now)
    }

    /// One display-refresh tick: gate the gravity reading, consult the
    /// scheduler, and compute the tilt only when a redraw is due.
    pub fn tick(&mut self, now: f64, gravity: Option<GravitySample>) -> TickDecision {
        let motion_changed = gravity
            .map(|sample| self.estimator.observe_gravity(sample))
            .unwrap_or(false);
        let animation_running = self.estimator.shimmer_running(now);

        if self.scheduler.tick(motion_changed, animation_running) {
            TickDecision::Redraw {
                tilt: self.estimator.estimate(now),
            }
        } else {
            TickDecision::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> ShimmerSettings {
        ShimmerSettings {
            duration: Duration::from_secs(3),
            rotations: 2.0,
            strength: 0.3,
        }
    }

    /// Drives ticks at 60 Hz and counts redraws.
    fn run_ticks(
        driver: &mut MotionDriver,
        from: f64,
        count: usize,
        gravity: Option<GravitySample>,
    ) -> usize {
        (0..count)
            .filter(|step| {
                driver
                    .tick(from + *step as f64 / 60.0, gravity)
                    .is_redraw()
            })
            .count()
    }

    #[test]
    fn quiet_ticks_issue_zero_redraws() {
        let mut driver = MotionDriver::new(0.0, settings());
        // First tick paints, repeated identical gravity stays gated.
        assert!(driver.tick(0.0, Some(GravitySample::new(0.0, 0.0, -1.0))).is_redraw());
        let redraws = run_ticks(
            &mut driver,
            1.0 / 60.0,
            240,
            Some(GravitySample::new(0.0, 0.0, -1.0)),
        );
        assert_eq!(redraws, 0);
    }

    #[test]
    fn offset_change_and_layout_change_each_buy_one_redraw() {
        let mut driver = MotionDriver::new(0.0, settings());
        driver.tick(0.0, None);

        driver.observe_offset(OrientationOffset::new(0.4, 0.1));
        assert!(driver.tick(0.1, None).is_redraw());
        assert!(!driver.tick(0.2, None).is_redraw());

        driver.invalidate();
        assert!(driver.tick(0.3, None).is_redraw());
        assert!(!driver.tick(0.4, None).is_redraw());
    }

    #[test]
    fn shimmer_episode_drives_redraws_until_it_finishes() {
        let mut driver = MotionDriver::new(0.0, settings());
        driver.tick(0.0, None);
        assert_eq!(run_ticks(&mut driver, 1.0 / 60.0, 60, None), 0);

        driver.start_auto_shimmer(1.0);
        assert!(driver.shimmer_running(1.0));

        // Every tick inside the 3 s episode redraws.
        let during = run_ticks(&mut driver, 1.0, 180, None);
        assert_eq!(during, 180);

        // At the duration boundary the episode reports finished and
        // animation-driven redraws cease.
        assert!(!driver.shimmer_running(4.0));
        assert!(!driver.tick(4.0, None).is_redraw());
        let after = run_ticks(&mut driver, 4.1, 120, None);
        assert_eq!(after, 0);
    }

    #[test]
    fn redraw_decision_carries_a_unit_tilt() {
        let mut driver = MotionDriver::new(0.0, settings());
        driver.observe_offset(OrientationOffset::new(0.7, -0.2));
        match driver.tick(0.5, Some(GravitySample::new(0.05, -0.81, 0.44))) {
            TickDecision::Redraw { tilt } => {
                assert!((tilt.length() - 1.0).abs() < 1e-5);
            }
            TickDecision::Skip => panic!("primed scheduler must redraw"),
        }
    }
}
