//! GPU orchestration for the effect surface.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the drawable resizes.
//! - `pipeline` builds the immutable pipeline objects: the gradient-quad
//!   glitter and starfield pipelines, the separable blur, and the
//!   alpha-composite with "over" blending.
//! - `targets` caches the offscreen sparkle/scratch textures keyed by
//!   drawable size, rebuilt only on size mismatch.
//! - `uniforms` mirrors the WGSL uniform blocks and is rebuilt from config
//!   plus the current tilt on every accepted redraw.
//! - `graph` glues everything together and executes the pass sequence per
//!   frame.

mod context;
mod graph;
mod pipeline;
mod targets;
mod uniforms;

pub(crate) use graph::RenderGraph;
