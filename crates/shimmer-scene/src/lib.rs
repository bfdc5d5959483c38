//! shimmer-scene: the animated gradient mask that sweeps across loading
//! placeholders.
//!
//! A [`ShimmerEffect`] owns an [`AnimationDriver`] and turns its progress
//! into a [`MaskRect`] plus a [`GradientSpec`] every frame. The host decides
//! when frames happen (by calling [`ShimmerEffect::frame`]) and provides a
//! [`Scheduler`] for the delay between sweeps.

pub mod animation;
pub mod compositor;
pub mod config;
pub mod direction;
pub mod effect;
pub mod error;
pub mod gradient;

pub use animation::{AnimationDriver, DriverEvent, DriverPhase, ManualScheduler, Scheduler, TaskHandle};
pub use compositor::{AngleRegime, ContentBounds, EDGE_PADDING, MaskRect, compute_mask_rect};
pub use config::{GradientSource, LoopCount, ShimmerConfig, ShimmerConfigBuilder};
pub use direction::{Alignment, Direction, GradientAnchors, degrees_to_radians, resolve_anchors, resolve_angle};
pub use effect::{FrameUpdate, MaskFrame, ShimmerEffect};
pub use error::{Result, ShimmerError};
pub use gradient::{GradientSpec, GradientStop, TWO_COLOR_STOPS};
