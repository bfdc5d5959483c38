//! Gradient construction for the shimmer band.

use shimmer_paint::{Brush, Color, Rect, Transform2D};

use crate::direction::{Alignment, GradientAnchors, resolve_anchors};
use crate::error::{Result, ShimmerError};

/// Stop positions of the two-color shimmer band.
pub const TWO_COLOR_STOPS: [f64; 5] = [0.0, 0.15, 0.5, 0.85, 1.0];

/// One color stop; `position` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Color,
    pub position: f64,
}

impl GradientStop {
    pub fn new(color: Color, position: f64) -> Self {
        Self { color, position }
    }
}

/// `[base, base, highlight, base, base]` at [`TWO_COLOR_STOPS`].
pub fn two_color_stops(base: Color, highlight: Color) -> Vec<GradientStop> {
    [base, base, highlight, base, base]
        .into_iter()
        .zip(TWO_COLOR_STOPS)
        .map(|(color, position)| GradientStop { color, position })
        .collect()
}

/// Check that stops are non-empty, in range, non-decreasing and span `[0, 1]`.
pub fn validate_stops(stops: &[GradientStop]) -> Result<()> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Err(ShimmerError::EmptyGradient);
    };

    for (index, stop) in stops.iter().enumerate() {
        if !(0.0..=1.0).contains(&stop.position) {
            return Err(ShimmerError::StopOutOfRange {
                index,
                position: stop.position,
            });
        }
    }

    for (index, pair) in stops.windows(2).enumerate() {
        if pair[1].position < pair[0].position {
            return Err(ShimmerError::NonMonotonicStops {
                index: index + 1,
                previous: pair[0].position,
                current: pair[1].position,
            });
        }
    }

    if first.position != 0.0 || last.position != 1.0 {
        return Err(ShimmerError::GradientBounds {
            first: first.position,
            last: last.position,
        });
    }

    Ok(())
}

/// A validated linear gradient plus the orientation it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientSpec {
    stops: Vec<GradientStop>,
    anchors: GradientAnchors,
    rotation: f64,
    /// Two-color bands swap anchors past a half-turn; explicit lists do not.
    flip_anchors: bool,
}

impl GradientSpec {
    /// Five-stop band `[base, base, highlight, base, base]` oriented for `radians`.
    pub fn two_color(base: Color, highlight: Color, radians: f64) -> Self {
        Self {
            stops: two_color_stops(base, highlight),
            anchors: resolve_anchors(radians),
            rotation: radians,
            flip_anchors: true,
        }
    }

    /// Explicit stop list, drawn left to right before rotation.
    pub fn from_stops(stops: Vec<GradientStop>, radians: f64) -> Result<Self> {
        validate_stops(&stops)?;
        Ok(Self {
            stops,
            anchors: GradientAnchors {
                begin: Alignment::CENTER_LEFT,
                end: Alignment::CENTER_RIGHT,
            },
            rotation: radians,
            flip_anchors: false,
        })
    }

    /// Same stops, re-oriented for a new angle.
    pub fn with_rotation(&self, radians: f64) -> Self {
        let anchors = if self.flip_anchors {
            resolve_anchors(radians)
        } else {
            self.anchors
        };
        Self {
            stops: self.stops.clone(),
            anchors,
            rotation: radians,
            flip_anchors: self.flip_anchors,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn anchors(&self) -> GradientAnchors {
        self.anchors
    }

    /// Rotation applied about the painted rect's centre, in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Resolve anchors and rotation against `rect` into an absolute brush.
    pub fn to_brush(&self, rect: Rect) -> Brush {
        let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        let begin = self.anchors.begin.within(x, y, w, h);
        let end = self.anchors.end.within(x, y, w, h);
        let rotate = Transform2D::rotate_about(self.rotation as f32, rect.center());
        Brush::LinearGradient {
            start: rotate.apply([begin[0] as f32, begin[1] as f32]),
            end: rotate.apply([end[0] as f32, end[1] as f32]),
            stops: self
                .stops
                .iter()
                .map(|s| (s.position as f32, s.color))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn base() -> Color {
        Color::rgba(0xe0, 0xe0, 0xe0, 0xff)
    }

    fn highlight() -> Color {
        Color::rgba(0xf5, 0xf5, 0xf5, 0xff)
    }

    #[test]
    fn two_color_band_layout() {
        let g = GradientSpec::two_color(base(), highlight(), 0.0);
        let positions: Vec<f64> = g.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.15, 0.5, 0.85, 1.0]);
        let colors: Vec<Color> = g.stops().iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![base(), base(), highlight(), base(), base()]);
        assert!(validate_stops(g.stops()).is_ok());
    }

    #[test]
    fn two_color_anchors_follow_angle() {
        let first = GradientSpec::two_color(base(), highlight(), 0.5);
        assert_eq!(first.anchors().begin, Alignment::CENTER_RIGHT);
        let second = GradientSpec::two_color(base(), highlight(), PI + 0.5);
        assert_eq!(second.anchors().begin, Alignment::CENTER_LEFT);
        assert_eq!(second.rotation(), PI + 0.5);

        let turned = first.with_rotation(PI);
        assert_eq!(turned.anchors(), second.anchors());
    }

    #[test]
    fn rejects_malformed_stop_lists() {
        assert_eq!(validate_stops(&[]), Err(ShimmerError::EmptyGradient));

        let backwards = vec![
            GradientStop::new(base(), 0.0),
            GradientStop::new(base(), 0.6),
            GradientStop::new(base(), 0.4),
            GradientStop::new(base(), 1.0),
        ];
        assert_eq!(
            GradientSpec::from_stops(backwards, 0.0),
            Err(ShimmerError::NonMonotonicStops {
                index: 2,
                previous: 0.6,
                current: 0.4
            })
        );

        let short = vec![GradientStop::new(base(), 0.0), GradientStop::new(base(), 0.9)];
        assert_eq!(
            validate_stops(&short),
            Err(ShimmerError::GradientBounds { first: 0.0, last: 0.9 })
        );

        let nan = vec![GradientStop::new(base(), 0.0), GradientStop::new(base(), f64::NAN)];
        assert!(matches!(
            validate_stops(&nan),
            Err(ShimmerError::StopOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn single_stop_spanning_is_rejected_but_duplicates_are_fine() {
        // A lone stop cannot be both 0 and 1.
        assert!(validate_stops(&[GradientStop::new(base(), 0.0)]).is_err());

        let hard_edge = vec![
            GradientStop::new(base(), 0.0),
            GradientStop::new(highlight(), 0.5),
            GradientStop::new(base(), 0.5),
            GradientStop::new(base(), 1.0),
        ];
        assert!(GradientSpec::from_stops(hard_edge, 0.0).is_ok());
    }

    #[test]
    fn brush_endpoints_rotate_about_centre() {
        let g = GradientSpec::two_color(base(), highlight(), 0.0);
        let Brush::LinearGradient { start, end, stops } = g.to_brush(Rect::new(0.0, 0.0, 100.0, 20.0)) else {
            panic!("expected gradient brush");
        };
        assert_eq!(start, [100.0, 10.0]);
        assert_eq!(end, [0.0, 10.0]);
        assert_eq!(stops.len(), 5);

        let vertical = g.with_rotation(PI / 2.0);
        let Brush::LinearGradient { start, end, .. } = vertical.to_brush(Rect::new(0.0, 0.0, 100.0, 20.0)) else {
            panic!("expected gradient brush");
        };
        assert!((start[0] - 50.0).abs() < 1e-3 && (start[1] - 60.0).abs() < 1e-3, "{start:?}");
        assert!((end[0] - 50.0).abs() < 1e-3 && (end[1] + 40.0).abs() < 1e-3, "{end:?}");
    }
}
