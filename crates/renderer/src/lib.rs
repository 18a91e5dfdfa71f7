//! Renderer crate for the glitter effect.
//!
//! Wires the tilt/animation pipeline from the `motion` crate to a wgpu
//! multi-pass render graph and wraps both behind a desktop preview window.
//! The flow per display-refresh tick:
//!
//! ```text
//!   glitterdash CLI
//!          │ ViewConfig
//!          ▼
//!   GlitterView::run ──▶ winit event loop ──▶ EffectSurface::tick
//!                                                    │
//!                              MotionDriver (skip?) ─┤
//!                                                    ▼
//!                       RenderGraph: glitter ─▶ offscreen ─▶ blur ─▶ composite ─▶ present
//! ```
//!
//! [`EffectSurface`] is the embeddable core (construct, start/stop motion
//! updates, start auto shimmer, per-tick draw entry); [`GlitterView`] is the
//! thin window shell that feeds it pointer parallax and refresh ticks.

mod gpu;
mod surface;
mod types;
mod view;

pub use surface::{EffectSurface, TickOutcome};
pub use types::{EffectConfig, EffectKind, ViewConfig};
pub use view::GlitterView;
