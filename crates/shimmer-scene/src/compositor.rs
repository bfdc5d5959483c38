//! Geometry of the sweeping mask: where to place the gradient for a given progress.

use std::f64::consts::{FRAC_PI_2, PI};

use shimmer_paint::Rect;

use crate::direction::in_first_half;

/// Extra travel past the content edges so the band never visibly clips.
pub const EDGE_PADDING: f64 = 10.0;

/// Size of the content area the mask covers, from the host's layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentBounds {
    pub width: f64,
    pub height: f64,
}

impl ContentBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Translated rectangle the gradient shader is painted into.
///
/// `width`/`height` always equal the content bounds; only the offset moves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskRect {
    pub dx: f64,
    pub dy: f64,
    pub width: f64,
    pub height: f64,
}

impl MaskRect {
    /// Paint-space rect for content whose top-left corner sits at `origin`.
    pub fn to_rect(&self, origin: [f32; 2]) -> Rect {
        Rect::new(origin[0], origin[1], self.width as f32, self.height as f32)
            .translate(self.dx as f32, self.dy as f32)
    }
}

/// Which axis the sweep travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleRegime {
    /// 0 or π: travels along x.
    Horizontal,
    /// π/2 or 3π/2: travels along y.
    Vertical,
    /// Anything else, collapsed onto y.
    Diagonal,
}

impl AngleRegime {
    /// Exact comparison: only the quarter-turn constants themselves (as
    /// produced by `degrees_to_radians`) select an axis regime.
    pub fn classify(radians: f64) -> AngleRegime {
        if radians == 0.0 || radians == PI {
            AngleRegime::Horizontal
        } else if radians == FRAC_PI_2 || radians == 3.0 * FRAC_PI_2 {
            AngleRegime::Vertical
        } else {
            AngleRegime::Diagonal
        }
    }
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

/// `lerp(start, end, percent)`, negated outside the first half-turn so that
/// angles a half-turn apart sweep in mirrored directions.
pub fn signed_offset(start: f64, end: f64, percent: f64, radians: f64) -> f64 {
    let sign = if in_first_half(radians) { 1.0 } else { -1.0 };
    lerp(start, end, percent) * sign
}

/// `extent / tan`, with the reciprocal collapsing to zero rather than
/// faulting when `tan` is zero or non-finite.
fn over_tan(extent: f64, tan: f64) -> f64 {
    if tan == 0.0 || !tan.is_finite() {
        0.0
    } else {
        extent / tan
    }
}

/// Mask rectangle for `percent ∈ [0, 1]` of a sweep at `radians`.
pub fn compute_mask_rect(bounds: ContentBounds, percent: f64, radians: f64) -> MaskRect {
    let (w, h) = (bounds.width, bounds.height);
    let percent = percent.clamp(0.0, 1.0);
    let regime = AngleRegime::classify(radians);
    // At π/2 this is a huge finite number, so w/tan is a tiny finite term.
    let tan = radians.tan();

    let (dx, dy) = match regime {
        AngleRegime::Horizontal => {
            let dx = signed_offset(-w - w * tan, w + w * tan, percent, radians);
            let dy = signed_offset(
                (-h - h * tan) - EDGE_PADDING,
                (h + h * tan) + EDGE_PADDING,
                percent,
                radians,
            );
            (dx, dy)
        }
        AngleRegime::Vertical => {
            let dx = signed_offset(
                (-w - over_tan(w, tan)) - EDGE_PADDING,
                (w + over_tan(w, tan)) + EDGE_PADDING,
                percent,
                radians,
            );
            let dy = signed_offset(
                (-h - over_tan(h, tan)) - EDGE_PADDING,
                (h + over_tan(h, tan)) + EDGE_PADDING,
                percent,
                radians,
            );
            (dx, dy)
        }
        AngleRegime::Diagonal => {
            let dy = signed_offset(
                (-w - over_tan(w, tan)) - EDGE_PADDING,
                (w + over_tan(w, tan)) + EDGE_PADDING,
                percent,
                radians,
            );
            (0.0, dy)
        }
    };

    MaskRect {
        dx,
        dy,
        width: w,
        height: h,
    }
}
