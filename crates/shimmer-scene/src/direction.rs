//! Sweep directions and the angle/anchor math derived from them.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::error::ShimmerError;

/// Orientation of the shimmer sweep. Each variant carries a fixed base angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// 0°
    #[default]
    LeftToRight,
    /// 90°
    TopToBottom,
    /// 180°
    RightToLeft,
    /// 270°
    BottomToTop,
    /// 30°
    Slanted,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::LeftToRight,
        Direction::TopToBottom,
        Direction::RightToLeft,
        Direction::BottomToTop,
        Direction::Slanted,
    ];

    /// Base angle in degrees.
    pub fn base_angle(self) -> f64 {
        match self {
            Direction::LeftToRight => 0.0,
            Direction::TopToBottom => 90.0,
            Direction::RightToLeft => 180.0,
            Direction::BottomToTop => 270.0,
            Direction::Slanted => 30.0,
        }
    }

    /// snake_case name used in config files.
    pub fn name(self) -> &'static str {
        match self {
            Direction::LeftToRight => "left_to_right",
            Direction::TopToBottom => "top_to_bottom",
            Direction::RightToLeft => "right_to_left",
            Direction::BottomToTop => "bottom_to_top",
            Direction::Slanted => "slanted",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ShimmerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| ShimmerError::UnknownDirection(s.to_string()))
    }
}

/// Convert degrees into radians in `[0, 2π)`.
///
/// Quarter turns map onto the exact `std` constants so that downstream
/// regime checks can compare against `FRAC_PI_2`/`PI` without slop.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    let degrees = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    let radians = if degrees == 0.0 || degrees >= 360.0 {
        0.0
    } else if degrees == 90.0 {
        FRAC_PI_2
    } else if degrees == 180.0 {
        PI
    } else if degrees == 270.0 {
        3.0 * FRAC_PI_2
    } else {
        degrees.to_radians()
    };
    if radians >= TAU { 0.0 } else { radians }
}

/// Effective sweep angle in radians: base angle, plus 180° when reversed.
pub fn resolve_angle(direction: Direction, reversed: bool) -> f64 {
    let flip = if reversed { 180.0 } else { 0.0 };
    degrees_to_radians(direction.base_angle() + flip)
}

/// True when `radians` lies in the first half-turn `[0, π)`.
pub fn in_first_half(radians: f64) -> bool {
    (0.0..PI).contains(&radians)
}

/// A point relative to a box: `(-1, -1)` is top-left, `(1, 1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub x: f64,
    pub y: f64,
}

impl Alignment {
    pub const CENTER_LEFT: Alignment = Alignment { x: -1.0, y: 0.0 };
    pub const CENTER_RIGHT: Alignment = Alignment { x: 1.0, y: 0.0 };

    /// Absolute position inside a box at `(x, y, w, h)`.
    pub fn within(self, x: f64, y: f64, w: f64, h: f64) -> [f64; 2] {
        let half_w = w * 0.5;
        let half_h = h * 0.5;
        [x + half_w + self.x * half_w, y + half_h + self.y * half_h]
    }
}

/// Static begin/end anchors of the two-color gradient before rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientAnchors {
    pub begin: Alignment,
    pub end: Alignment,
}

/// Anchors for the two-color path.
///
/// Rotating a gradient defined by two horizontal anchors does not mirror it
/// past a half-turn, so the anchors swap outside `[0, π)`.
pub fn resolve_anchors(radians: f64) -> GradientAnchors {
    if in_first_half(radians) {
        GradientAnchors {
            begin: Alignment::CENTER_RIGHT,
            end: Alignment::CENTER_LEFT,
        }
    } else {
        GradientAnchors {
            begin: Alignment::CENTER_LEFT,
            end: Alignment::CENTER_RIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_angle_table() {
        let expected = [0.0, 90.0, 180.0, 270.0, 30.0];
        for (direction, degrees) in Direction::ALL.into_iter().zip(expected) {
            assert_eq!(direction.base_angle(), degrees, "{direction}");
        }
    }

    #[test]
    fn reversed_adds_half_turn() {
        for direction in Direction::ALL {
            let forward = resolve_angle(direction, false);
            let reversed = resolve_angle(direction, true);
            let expected = degrees_to_radians(direction.base_angle() + 180.0);
            assert_eq!(reversed, expected, "{direction}");
            let diff = (reversed - forward).rem_euclid(TAU);
            assert!((diff - PI).abs() < 1e-12, "{direction}: {diff}");
        }
    }

    #[test]
    fn resolved_angles_hit_exact_constants() {
        assert_eq!(resolve_angle(Direction::LeftToRight, false), 0.0);
        assert_eq!(resolve_angle(Direction::TopToBottom, false), FRAC_PI_2);
        assert_eq!(resolve_angle(Direction::RightToLeft, false), PI);
        assert_eq!(resolve_angle(Direction::BottomToTop, false), 3.0 * FRAC_PI_2);
        assert_eq!(resolve_angle(Direction::BottomToTop, true), FRAC_PI_2);
        assert_eq!(resolve_angle(Direction::Slanted, false), 30f64.to_radians());
        assert_eq!(resolve_angle(Direction::Slanted, true), 210f64.to_radians());
    }

    #[test]
    fn radians_stay_in_range() {
        for degrees in [-720.0, -90.0, -1e-18, 0.0, 359.999, 360.0, 1080.5] {
            let r = degrees_to_radians(degrees);
            assert!((0.0..TAU).contains(&r), "{degrees} -> {r}");
        }
        assert_eq!(degrees_to_radians(-90.0), 3.0 * FRAC_PI_2);
    }

    #[test]
    fn anchors_swap_past_half_turn() {
        let first = resolve_anchors(0.0);
        assert_eq!(first.begin, Alignment::CENTER_RIGHT);
        assert_eq!(first.end, Alignment::CENTER_LEFT);

        let slanted = resolve_anchors(resolve_angle(Direction::Slanted, false));
        assert_eq!(slanted, first);

        let second = resolve_anchors(PI);
        assert_eq!(second.begin, Alignment::CENTER_LEFT);
        assert_eq!(second.end, Alignment::CENTER_RIGHT);
    }

    #[test]
    fn direction_names_parse() {
        for direction in Direction::ALL {
            assert_eq!(direction.name().parse::<Direction>().unwrap(), direction);
        }
        assert_eq!("Right-To-Left".parse::<Direction>().unwrap(), Direction::RightToLeft);
        assert_eq!(
            "diagonal".parse::<Direction>(),
            Err(ShimmerError::UnknownDirection("diagonal".to_string()))
        );
    }

    #[test]
    fn alignment_resolves_inside_box() {
        assert_eq!(Alignment::CENTER_LEFT.within(10.0, 20.0, 100.0, 50.0), [10.0, 45.0]);
        assert_eq!(Alignment::CENTER_RIGHT.within(10.0, 20.0, 100.0, 50.0), [110.0, 45.0]);
    }
}
