/// Decides, per display-refresh tick, whether a redraw is warranted.
///
/// The flag is sticky: anything that invalidates the picture (an accepted
/// motion sample, a running animation, a layout change) sets it, and the next
/// tick consumes it. Ticks that find the flag clear cost nothing downstream;
/// no GPU work may be issued for them.
#[derive(Debug)]
pub struct FrameScheduler {
    needs_redraw: bool,
}

impl FrameScheduler {
    /// Starts primed so the very first tick paints the surface.
    pub fn new() -> Self {
        Self { needs_redraw: true }
    }

    /// Forces a redraw on the next tick (layout change, content swap).
    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Evaluates one tick. `motion_changed` reports whether this tick's
    /// sensor reading was accepted; `animation_running` whether an unfinished
    /// animation episode exists. Returns true when the caller should draw,
    /// consuming the flag.
    pub fn tick(&mut self, motion_changed: bool, animation_running: bool) -> bool {
        if motion_changed || animation_running {
            self.needs_redraw = true;
        }
        if self.needs_redraw {
            self.needs_redraw = false;
            true
        } else {
            false
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_draws_then_goes_quiet() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.tick(false, false));
        for _ in 0..100 {
            assert!(
                !scheduler.tick(false, false),
                "quiet ticks must not schedule work"
            );
        }
    }

    #[test]
    fn motion_change_triggers_exactly_one_redraw() {
        let mut scheduler = FrameScheduler::new();
        scheduler.tick(false, false);
        assert!(scheduler.tick(true, false));
        assert!(!scheduler.tick(false, false));
    }

    #[test]
    fn running_animation_keeps_redrawing_until_it_finishes() {
        let mut scheduler = FrameScheduler::new();
        scheduler.tick(false, false);
        for _ in 0..10 {
            assert!(scheduler.tick(false, true));
        }
        assert!(!scheduler.tick(false, false));
    }

    #[test]
    fn invalidation_is_sticky_until_consumed() {
        let mut scheduler = FrameScheduler::new();
        scheduler.tick(false, false);
        scheduler.invalidate();
        scheduler.invalidate();
        assert!(scheduler.tick(false, false));
        assert!(!scheduler.tick(false, false));
    }
}
