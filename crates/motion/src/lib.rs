//! Motion and animation core for the glitter effect.
//!
//! Everything in this crate is GPU-free and clock-free: components take
//! explicit `f64` second timestamps, so the renderer drives them from its
//! monotonic clock and tests drive them from literals. The pipeline per
//! display-refresh tick is:
//!
//! ```text
//!   sensor feed ─▶ LatestSample ─┐
//!                                ▼
//!   host callbacks ─▶ MotionDriver::tick ─▶ TickDecision::{Skip, Redraw{tilt}}
//!                       │             ▲
//!                       ├─ TiltEstimator (offset + gravity + shimmer)
//!                       └─ FrameScheduler (sticky needs-redraw flag)
//! ```
//!
//! [`Animation`] and [`Curve`] are the time-interpolation engine underneath
//! shimmer episodes; [`MotionSource`] abstracts where gravity readings come
//! from.

mod animation;
mod curve;
mod driver;
mod frame;
mod sample;
mod source;
mod tilt;

pub use animation::{Animation, AnimationState};
pub use curve::Curve;
pub use driver::{MotionDriver, TickDecision};
pub use frame::FrameScheduler;
pub use sample::LatestSample;
pub use source::{BoxedMotionSource, MotionFeed, MotionSource, SharedMotionSource, StillMotionSource};
pub use tilt::{GravitySample, OrientationOffset, TiltEstimator, TiltVector};
