use crate::sample::LatestSample;
use crate::tilt::GravitySample;

/// Abstraction over where gravity readings originate from.
///
/// The tick loop polls `gravity()` once per tick and treats the result as the
/// freshest available reading; sources that receive samples asynchronously
/// should hold them in a [`LatestSample`] slot rather than a queue.
pub trait MotionSource: Send {
    /// Called when the host starts motion updates.
    fn start(&mut self) {}

    /// Called when the host stops motion updates.
    fn stop(&mut self) {}

    /// Freshest gravity reading, if the sensor has produced one.
    fn gravity(&mut self) -> Option<GravitySample>;
}

/// Convenient alias for owning motion sources behind trait objects.
pub type BoxedMotionSource = Box<dyn MotionSource + Send>;

/// Source for hosts without a motion sensor; the tilt estimator falls back
/// to its ambient oscillation.
#[derive(Debug, Default)]
pub struct StillMotionSource;

impl MotionSource for StillMotionSource {
    fn gravity(&mut self) -> Option<GravitySample> {
        None
    }
}

/// Source fed from another thread through a [`MotionFeed`].
///
/// While stopped it reports no reading even if the feed keeps publishing,
/// matching a sensor whose updates have been unsubscribed.
#[derive(Debug, Default)]
pub struct SharedMotionSource {
    slot: LatestSample<GravitySample>,
    active: bool,
}

impl SharedMotionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher handle for the sensor side.
    pub fn feed(&self) -> MotionFeed {
        MotionFeed {
            slot: self.slot.clone(),
        }
    }
}

impl MotionSource for SharedMotionSource {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn gravity(&mut self) -> Option<GravitySample> {
        if self.active {
            self.slot.latest()
        } else {
            None
        }
    }
}

/// Cloneable publisher end of a [`SharedMotionSource`].
#[derive(Clone, Debug)]
pub struct MotionFeed {
    slot: LatestSample<GravitySample>,
}

impl MotionFeed {
    pub fn publish(&self, sample: GravitySample) {
        self.slot.publish(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_source_reports_only_while_active() {
        let mut source = SharedMotionSource::new();
        let feed = source.feed();
        feed.publish(GravitySample::new(0.0, 0.0, -1.0));

        assert_eq!(source.gravity(), None, "stopped source stays silent");
        source.start();
        assert_eq!(source.gravity(), Some(GravitySample::new(0.0, 0.0, -1.0)));

        feed.publish(GravitySample::new(0.1, 0.0, -1.0));
        assert_eq!(source.gravity(), Some(GravitySample::new(0.1, 0.0, -1.0)));

        source.stop();
        assert_eq!(source.gravity(), None);
    }
}
