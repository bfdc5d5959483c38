//! Binds a driver, the direction math and the compositor into one effect the
//! host can tick and paint.

use std::rc::Rc;

use shimmer_paint::{BlendMode, Painter, Rect};

use crate::animation::{AnimationDriver, DriverEvent, Scheduler};
use crate::compositor::{ContentBounds, MaskRect, compute_mask_rect};
use crate::config::ShimmerConfig;
use crate::error::Result;
use crate::gradient::GradientSpec;

/// Everything the host needs to paint one frame of the mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskFrame {
    pub rect: MaskRect,
    pub gradient: GradientSpec,
    pub blend: BlendMode,
}

/// Result of [`ShimmerEffect::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub frame: MaskFrame,
    /// False when the frame is identical to the previous one.
    pub repaint: bool,
}

/// Whether `next` differs from what was painted last.
pub fn needs_repaint(previous: Option<&MaskFrame>, next: &MaskFrame) -> bool {
    previous != Some(next)
}

/// A configured shimmer: one driver plus its resolved angle and gradient.
pub struct ShimmerEffect {
    config: ShimmerConfig,
    radians: f64,
    gradient: GradientSpec,
    driver: AnimationDriver,
    scheduler: Rc<dyn Scheduler>,
    last_frame: Option<MaskFrame>,
}

impl ShimmerEffect {
    /// Build the effect and start it (it stays idle if the config is disabled).
    pub fn new(config: ShimmerConfig, scheduler: Rc<dyn Scheduler>) -> Result<Self> {
        let gradient = config.gradient_spec()?;
        let mut driver = AnimationDriver::new(&config, scheduler.clone());
        driver.start();
        Ok(Self {
            radians: config.angle(),
            config,
            gradient,
            driver,
            scheduler,
            last_frame: None,
        })
    }

    /// Swap in a new configuration.
    ///
    /// Timing changes restart the sweep from scratch; an `enabled` change
    /// pauses or resumes; direction/color changes apply on the next frame.
    pub fn set_config(&mut self, config: ShimmerConfig) -> Result<()> {
        let gradient = if config.gradient() == self.config.gradient() {
            self.gradient.with_rotation(config.angle())
        } else {
            config.gradient_spec()?
        };
        if self.config.timing_differs(&config) {
            log::debug!("shimmer timing changed; restarting driver");
            self.driver.dispose();
            self.driver = AnimationDriver::new(&config, self.scheduler.clone());
            self.driver.start();
        } else if self.config.enabled() != config.enabled() {
            self.driver.set_enabled(config.enabled());
        }
        self.radians = config.angle();
        self.gradient = gradient;
        self.config = config;
        Ok(())
    }

    /// Tick the driver at `now_ms` and compute this frame's mask.
    pub fn frame(&mut self, bounds: ContentBounds, now_ms: f64) -> FrameUpdate {
        let progress = self.driver.tick(now_ms);
        let frame = self.mask_frame(bounds, progress);
        let repaint = needs_repaint(self.last_frame.as_ref(), &frame);
        if repaint {
            log::trace!("shimmer repaint at progress {progress:.3}");
            self.last_frame = Some(frame.clone());
        }
        FrameUpdate { frame, repaint }
    }

    /// Mask for an explicit progress value. Pure.
    pub fn mask_frame(&self, bounds: ContentBounds, progress: f64) -> MaskFrame {
        MaskFrame {
            rect: compute_mask_rect(bounds, progress, self.radians),
            gradient: self.gradient.clone(),
            blend: BlendMode::SrcIn,
        }
    }

    /// Record the content followed by the gradient mask composited `SrcIn`,
    /// both clipped to the content box.
    ///
    /// `origin` is the content's top-left corner in paint space.
    pub fn paint<F>(
        &self,
        painter: &mut Painter,
        origin: [f32; 2],
        bounds: ContentBounds,
        content: F,
    ) -> shimmer_paint::Result<()>
    where
        F: FnOnce(&mut Painter),
    {
        let frame = self.mask_frame(bounds, self.driver.progress());
        let content_box = Rect::new(origin[0], origin[1], bounds.width as f32, bounds.height as f32);
        painter.push_clip_rect(content_box);
        painter.push_layer(BlendMode::SrcOver);
        content(painter);
        painter.push_layer(frame.blend);
        let rect = frame.rect.to_rect(origin);
        painter.rect(rect, frame.gradient.to_brush(rect), 0);
        painter.pop_layer()?;
        painter.pop_layer()?;
        painter.pop_clip()
    }

    pub fn config(&self) -> &ShimmerConfig {
        &self.config
    }

    /// Resolved sweep angle in radians.
    pub fn radians(&self) -> f64 {
        self.radians
    }

    pub fn gradient(&self) -> &GradientSpec {
        &self.gradient
    }

    pub fn progress(&self) -> f64 {
        self.driver.progress()
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// Whether the host should keep scheduling frame ticks.
    pub fn wants_frames(&self) -> bool {
        self.driver.is_ticking()
    }

    pub fn drain_events(&mut self) -> Vec<DriverEvent> {
        self.driver.drain_events()
    }

    /// Tear down the driver. Further frames reuse the frozen progress.
    pub fn dispose(&mut self) {
        self.driver.dispose();
    }
}
