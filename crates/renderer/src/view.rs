use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use motion::{BoxedMotionSource, GravitySample, SharedMotionSource, StillMotionSource};

use crate::surface::EffectSurface;
use crate::types::ViewConfig;

/// Desktop preview shell: owns the winit window and forwards its callbacks
/// (pointer, resize, redraw) into the [`EffectSurface`].
///
/// The window's redraw callback is the display-refresh source; it is only
/// re-armed while motion updates run, mirroring a host that registers and
/// unregisters its refresh timer. Pointer position stands in for the device
/// orientation sensor: moving across the window sweeps the viewer offset
/// through roughly ±1 per axis.
pub struct GlitterView {
    config: ViewConfig,
}

impl GlitterView {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    /// Opens the preview window and drives the event loop until close.
    pub fn run(&mut self) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to initialize event loop")?;
        let window_size =
            PhysicalSize::new(self.config.surface_size.0, self.config.surface_size.1);
        let window = WindowBuilder::new()
            .with_title("Glitter Preview")
            .with_inner_size(window_size)
            .build(&event_loop)
            .context("failed to create preview window")?;
        let window = Arc::new(window);

        let motion = build_motion_source(self.config.synthetic_motion);
        let surface = EffectSurface::new(
            window.as_ref(),
            window.inner_size(),
            window.scale_factor() as f32,
            &self.config.effect,
            motion,
        )?;
        let mut state = ViewState {
            window: window.clone(),
            surface,
            parallax: PointerParallax::default(),
        };

        if self.config.autostart_motion {
            state.surface.start_motion_updates();
        }
        if self.config.start_shimmer {
            state.surface.start_auto_shimmer();
        }
        state.window.request_redraw();

        event_loop
            .run(move |event, elwt| {
                elwt.set_control_flow(ControlFlow::Wait);

                match event {
                    Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                        match event {
                            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                                elwt.exit();
                            }
                            WindowEvent::CursorMoved { position, .. } => {
                                state.handle_cursor_moved(position);
                            }
                            WindowEvent::Resized(new_size) => {
                                state.surface.handle_layout_change(new_size);
                            }
                            WindowEvent::ScaleFactorChanged { .. } => {
                                state
                                    .surface
                                    .set_display_scale(state.window.scale_factor() as f32);
                            }
                            WindowEvent::KeyboardInput { event, .. } => {
                                if event.state == ElementState::Pressed && !event.repeat {
                                    state.handle_key(&event.logical_key, elwt);
                                }
                            }
                            WindowEvent::RedrawRequested => {
                                state.handle_redraw(elwt);
                            }
                            _ => {}
                        }
                    }
                    Event::AboutToWait => {
                        // Re-arm the refresh callback only while motion
                        // updates are subscribed.
                        if state.surface.motion_active() {
                            state.window.request_redraw();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|err| anyhow!("event loop error: {err}"))
    }
}

struct ViewState {
    window: Arc<Window>,
    surface: EffectSurface,
    parallax: PointerParallax,
}

impl ViewState {
    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.parallax.handle_cursor_moved(position);
        if let Some((horizontal, vertical)) = self.parallax.as_offset(self.window.inner_size()) {
            self.surface.observe_orientation(horizontal, vertical);
        }
    }

    fn handle_key(&mut self, key: &Key, elwt: &winit::event_loop::EventLoopWindowTarget<()>) {
        match key.as_ref() {
            Key::Named(NamedKey::Space) => {
                info!("shimmer requested");
                self.surface.start_auto_shimmer();
            }
            Key::Named(NamedKey::Escape) => elwt.exit(),
            Key::Character("m") => {
                if self.surface.motion_active() {
                    self.surface.stop_motion_updates();
                } else {
                    self.surface.start_motion_updates();
                    self.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn handle_redraw(&mut self, elwt: &winit::event_loop::EventLoopWindowTarget<()>) {
        match self.surface.tick() {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.surface.size();
                self.surface.handle_layout_change(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory; exiting");
                elwt.exit();
            }
            Err(err) => {
                tracing::warn!("surface error: {err:?}; retrying next frame");
            }
        }
    }
}

/// Desktop machines have no gravity sensor, so the synthetic source feeds a
/// slow wobble from a background thread at the sensor's usual 60 Hz cadence;
/// it exercises the same last-writer-wins sample path a real sensor would.
fn build_motion_source(synthetic: bool) -> BoxedMotionSource {
    if !synthetic {
        return Box::new(StillMotionSource);
    }
    let source = SharedMotionSource::new();
    let feed = source.feed();
    std::thread::spawn(move || {
        let origin = std::time::Instant::now();
        loop {
            let t = origin.elapsed().as_secs_f64();
            feed.publish(GravitySample::new(
                (t * 0.31).sin() * 0.4,
                (t * 0.23).cos() * 0.4,
                -0.9,
            ));
            std::thread::sleep(std::time::Duration::from_millis(16));
        }
    });
    Box::new(source)
}

/// Tracks the pointer and maps it to a viewer-perspective offset.
#[derive(Default)]
struct PointerParallax {
    position: Option<PhysicalPosition<f64>>,
}

impl PointerParallax {
    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.position = Some(position);
    }

    /// Center-origin offset in roughly `[-1, 1]` per axis; `None` until the
    /// pointer has entered the window.
    fn as_offset(&self, size: PhysicalSize<u32>) -> Option<(f64, f64)> {
        let position = self.position?;
        let width = size.width.max(1) as f64;
        let height = size.height.max(1) as f64;
        let horizontal = (position.x / width) * 2.0 - 1.0;
        let vertical = (position.y / height) * 2.0 - 1.0;
        Some((horizontal.clamp(-1.0, 1.0), vertical.clamp(-1.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallax_maps_window_extents_to_unit_offsets() {
        let mut parallax = PointerParallax::default();
        let size = PhysicalSize::new(800, 600);
        assert_eq!(parallax.as_offset(size), None);

        parallax.handle_cursor_moved(PhysicalPosition::new(400.0, 300.0));
        let (h, v) = parallax.as_offset(size).unwrap();
        assert_eq!((h, v), (0.0, 0.0));

        parallax.handle_cursor_moved(PhysicalPosition::new(0.0, 0.0));
        assert_eq!(parallax.as_offset(size).unwrap(), (-1.0, -1.0));

        parallax.handle_cursor_moved(PhysicalPosition::new(800.0, 600.0));
        assert_eq!(parallax.as_offset(size).unwrap(), (1.0, 1.0));

        // Positions outside the window clamp instead of overdriving the tilt.
        parallax.handle_cursor_moved(PhysicalPosition::new(1600.0, -50.0));
        let (h, v) = parallax.as_offset(size).unwrap();
        assert_eq!((h, v), (1.0, -1.0));
    }
}
