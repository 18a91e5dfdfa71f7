use std::time::Instant;

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};
use winit::dpi::PhysicalSize;

use motion::{BoxedMotionSource, MotionDriver, OrientationOffset, TickDecision};

use crate::gpu::RenderGraph;
use crate::types::EffectConfig;

/// What one display-refresh tick amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No meaningful change; no GPU work was submitted.
    Skipped,
    /// A frame was rendered and presented.
    Presented,
}

/// Monotonic session clock feeding the motion pipeline.
struct EffectClock {
    origin: Instant,
}

impl EffectClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    fn seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// The effect core a host embeds: wires the motion pipeline to the render
/// graph behind the callbacks the host forwards.
///
/// Construction acquires every GPU prerequisite and fails as a whole if any
/// is missing. After that the host drives three inputs: orientation-offset
/// callbacks, layout changes, and display-refresh ticks; [`EffectSurface::tick`]
/// decides per tick whether any rendering happens at all.
pub struct EffectSurface {
    graph: RenderGraph,
    driver: MotionDriver,
    motion: BoxedMotionSource,
    clock: EffectClock,
    motion_active: bool,
    display_scale: f32,
}

impl EffectSurface {
    pub fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        display_scale: f32,
        effect: &EffectConfig,
        motion: BoxedMotionSource,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let graph = RenderGraph::new(target, initial_size, effect)?;
        let clock = EffectClock::new();
        let driver = MotionDriver::new(clock.seconds(), effect.shimmer());
        Ok(Self {
            graph,
            driver,
            motion,
            clock,
            motion_active: false,
            display_scale,
        })
    }

    /// Subscribes to the motion sensor. The host should begin delivering
    /// refresh ticks once this returns.
    pub fn start_motion_updates(&mut self) {
        if !self.motion_active {
            self.motion.start();
            self.motion_active = true;
            info!("motion updates started");
        }
    }

    /// Unsubscribes from the motion sensor; the host stops delivering ticks.
    pub fn stop_motion_updates(&mut self) {
        if self.motion_active {
            self.motion.stop();
            self.motion_active = false;
            info!("motion updates stopped");
        }
    }

    /// Whether the tick loop should currently be running.
    pub fn motion_active(&self) -> bool {
        self.motion_active
    }

    /// Begins one shimmer episode with the configured duration, rotations,
    /// and strength.
    pub fn start_auto_shimmer(&mut self) {
        self.driver.start_auto_shimmer(self.clock.seconds());
    }

    /// Viewer-perspective callback from the host's parallax source.
    pub fn observe_orientation(&mut self, horizontal: f64, vertical: f64) {
        self.driver
            .observe_offset(OrientationOffset::new(horizontal, vertical));
    }

    /// Layout event: the drawable changed size, so cached render targets are
    /// stale and the next tick must repaint.
    pub fn handle_layout_change(&mut self, new_size: PhysicalSize<u32>) {
        debug!(width = new_size.width, height = new_size.height, "layout changed");
        self.graph.resize(new_size);
        self.driver.invalidate();
    }

    pub fn set_display_scale(&mut self, display_scale: f32) {
        if self.display_scale != display_scale {
            self.display_scale = display_scale;
            self.driver.invalidate();
        }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.graph.size()
    }

    /// Display-refresh entry point. Polls the freshest gravity reading, runs
    /// the scheduling decision, and renders only when warranted.
    pub fn tick(&mut self) -> Result<TickOutcome, wgpu::SurfaceError> {
        let now = self.clock.seconds();
        let gravity = if self.motion_active {
            self.motion.gravity()
        } else {
            None
        };
        match self.driver.tick(now, gravity) {
            TickDecision::Skip => Ok(TickOutcome::Skipped),
            TickDecision::Redraw { tilt } => {
                self.graph.render_frame(tilt.to_array(), self.display_scale)?;
                Ok(TickOutcome::Presented)
            }
        }
    }
}
