//! Immutable shimmer configuration and its validating builder.

use shimmer_config::ShimmerFileConfig;
use shimmer_paint::Color;

use crate::direction::{Direction, resolve_angle};
use crate::error::{Result, ShimmerError};
use crate::gradient::{GradientSpec, GradientStop, two_color_stops, validate_stops};

pub const DEFAULT_PERIOD_MS: f64 = 1500.0;

/// How many sweeps to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopCount {
    #[default]
    Infinite,
    /// Exactly this many sweeps (always > 0).
    Finite(u32),
}

impl LoopCount {
    /// `0` and negative counts loop forever.
    pub fn from_raw(count: i64) -> Self {
        if count < 0 {
            log::warn!("negative loop count {count} treated as infinite");
        }
        if count <= 0 {
            return LoopCount::Infinite;
        }
        LoopCount::Finite(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Whether another sweep follows after `completed` sweeps.
    pub fn allows_another(self, completed: u32) -> bool {
        match self {
            LoopCount::Infinite => true,
            LoopCount::Finite(n) => completed < n,
        }
    }
}

/// Where the gradient stops came from.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientSource {
    TwoColor { base: Color, highlight: Color },
    Stops(Vec<GradientStop>),
}

impl GradientSource {
    /// Ordered `(color, position)` stops.
    pub fn stops(&self) -> Vec<GradientStop> {
        match self {
            GradientSource::TwoColor { base, highlight } => two_color_stops(*base, *highlight),
            GradientSource::Stops(stops) => stops.clone(),
        }
    }
}

/// Validated, immutable shimmer settings. Replace it wholesale to change anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ShimmerConfig {
    period_ms: f64,
    direction: Direction,
    gradient: GradientSource,
    loop_count: LoopCount,
    delay_ms: f64,
    reversed: bool,
    enabled: bool,
}

static_assertions::assert_impl_all!(ShimmerConfig: Send, Sync, Clone);

impl Default for ShimmerConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            direction: Direction::LeftToRight,
            gradient: GradientSource::TwoColor {
                base: Color::rgba(0xe0, 0xe0, 0xe0, 0xff),
                highlight: Color::rgba(0xf5, 0xf5, 0xf5, 0xff),
            },
            loop_count: LoopCount::Infinite,
            delay_ms: 0.0,
            reversed: false,
            enabled: true,
        }
    }
}

impl ShimmerConfig {
    pub fn builder() -> ShimmerConfigBuilder {
        ShimmerConfigBuilder::default()
    }

    /// Validate a file/env configuration.
    pub fn from_file_config(file: &ShimmerFileConfig) -> Result<Self> {
        let anim = &file.animation;
        let mut builder = Self::builder()
            .period_ms(anim.period_ms)
            .delay_ms(anim.delay_ms)
            .loop_count(anim.loop_count)
            .direction(anim.direction.parse()?)
            .reversed(anim.reversed)
            .enabled(anim.enabled);

        let colors = &file.colors;
        builder = if colors.stops.is_empty() {
            builder.two_color(parse_color(&colors.base)?, parse_color(&colors.highlight)?)
        } else {
            let stops = colors
                .stops
                .iter()
                .map(|entry| Ok(GradientStop::new(parse_color(&entry.color)?, entry.offset)))
                .collect::<Result<Vec<_>>>()?;
            builder.stops(stops)
        };
        builder.build()
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn gradient(&self) -> &GradientSource {
        &self.gradient
    }

    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Effective sweep angle in radians.
    pub fn angle(&self) -> f64 {
        resolve_angle(self.direction, self.reversed)
    }

    /// Gradient oriented for [`Self::angle`].
    pub fn gradient_spec(&self) -> Result<GradientSpec> {
        let radians = self.angle();
        match &self.gradient {
            GradientSource::TwoColor { base, highlight } => {
                Ok(GradientSpec::two_color(*base, *highlight, radians))
            }
            GradientSource::Stops(stops) => GradientSpec::from_stops(stops.clone(), radians),
        }
    }

    /// True when `other` changes timing (period, delay, loop count) relative to `self`.
    pub fn timing_differs(&self, other: &ShimmerConfig) -> bool {
        self.period_ms != other.period_ms
            || self.delay_ms != other.delay_ms
            || self.loop_count != other.loop_count
    }

    /// Copy of this config with `enabled` flipped to `enabled`.
    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }
}

fn parse_color(hex: &str) -> Result<Color> {
    Color::from_hex(hex).map_err(|_| ShimmerError::InvalidColor(hex.to_string()))
}

/// Builder for [`ShimmerConfig`]; `build` validates everything at once.
#[derive(Debug, Clone)]
pub struct ShimmerConfigBuilder {
    config: ShimmerConfig,
}

impl Default for ShimmerConfigBuilder {
    fn default() -> Self {
        Self {
            config: ShimmerConfig::default(),
        }
    }
}

impl ShimmerConfigBuilder {
    pub fn period_ms(mut self, period_ms: f64) -> Self {
        self.config.period_ms = period_ms;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    pub fn two_color(mut self, base: Color, highlight: Color) -> Self {
        self.config.gradient = GradientSource::TwoColor { base, highlight };
        self
    }

    pub fn stops(mut self, stops: Vec<GradientStop>) -> Self {
        self.config.gradient = GradientSource::Stops(stops);
        self
    }

    /// `0` or negative loops forever.
    pub fn loop_count(mut self, count: i64) -> Self {
        self.config.loop_count = LoopCount::from_raw(count);
        self
    }

    pub fn delay_ms(mut self, delay_ms: f64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.config.reversed = reversed;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn build(self) -> Result<ShimmerConfig> {
        let config = self.config;
        if !(config.period_ms.is_finite() && config.period_ms > 0.0) {
            return Err(ShimmerError::InvalidPeriod(config.period_ms));
        }
        if !(config.delay_ms.is_finite() && config.delay_ms >= 0.0) {
            return Err(ShimmerError::InvalidDelay(config.delay_ms));
        }
        if let GradientSource::Stops(stops) = &config.gradient {
            validate_stops(stops)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_option_surface() {
        let config = ShimmerConfig::builder().build().unwrap();
        assert_eq!(config.period_ms(), 1500.0);
        assert_eq!(config.direction(), Direction::LeftToRight);
        assert_eq!(config.loop_count(), LoopCount::Infinite);
        assert_eq!(config.delay_ms(), 0.0);
        assert!(!config.reversed());
        assert!(config.enabled());
        assert_eq!(config.gradient().stops().len(), 5);
    }

    #[test]
    fn loop_count_normalization() {
        assert_eq!(LoopCount::from_raw(0), LoopCount::Infinite);
        assert_eq!(LoopCount::from_raw(-3), LoopCount::Infinite);
        assert_eq!(LoopCount::from_raw(2), LoopCount::Finite(2));
        assert_eq!(LoopCount::from_raw(i64::MAX), LoopCount::Finite(u32::MAX));

        assert!(LoopCount::Finite(2).allows_another(1));
        assert!(!LoopCount::Finite(2).allows_another(2));
        assert!(LoopCount::Infinite.allows_another(u32::MAX));
    }

    #[test]
    fn build_rejects_bad_timing() {
        assert_eq!(
            ShimmerConfig::builder().period_ms(0.0).build(),
            Err(ShimmerError::InvalidPeriod(0.0))
        );
        assert!(ShimmerConfig::builder().period_ms(f64::INFINITY).build().is_err());
        assert_eq!(
            ShimmerConfig::builder().delay_ms(-1.0).build(),
            Err(ShimmerError::InvalidDelay(-1.0))
        );
    }

    #[test]
    fn build_rejects_bad_stops() {
        let c = Color::rgba(0, 0, 0, 255);
        let err = ShimmerConfig::builder()
            .stops(vec![GradientStop::new(c, 0.5), GradientStop::new(c, 1.0)])
            .build()
            .unwrap_err();
        assert_eq!(err, ShimmerError::GradientBounds { first: 0.5, last: 1.0 });
        assert_eq!(
            ShimmerConfig::builder().stops(vec![]).build(),
            Err(ShimmerError::EmptyGradient)
        );
    }

    #[test]
    fn from_file_config_validates() {
        let mut file = ShimmerFileConfig::default();
        file.animation.period_ms = 1000.0;
        file.animation.loop_count = 2;
        file.animation.direction = "top_to_bottom".to_string();
        let config = ShimmerConfig::from_file_config(&file).unwrap();
        assert_eq!(config.period_ms(), 1000.0);
        assert_eq!(config.loop_count(), LoopCount::Finite(2));
        assert_eq!(config.direction(), Direction::TopToBottom);
        assert_eq!(
            config.gradient(),
            &GradientSource::TwoColor {
                base: Color::from_hex("#E0E0E0").unwrap(),
                highlight: Color::from_hex("#F5F5F5").unwrap(),
            }
        );

        file.animation.direction = "sideways".to_string();
        assert_eq!(
            ShimmerConfig::from_file_config(&file),
            Err(ShimmerError::UnknownDirection("sideways".to_string()))
        );

        file.animation.direction = "slanted".to_string();
        file.colors.highlight = "#nothex".to_string();
        assert_eq!(
            ShimmerConfig::from_file_config(&file),
            Err(ShimmerError::InvalidColor("#nothex".to_string()))
        );
    }

    #[test]
    fn timing_change_detection() {
        let a = ShimmerConfig::default();
        let b = ShimmerConfig::builder().direction(Direction::Slanted).build().unwrap();
        assert!(!a.timing_differs(&b));
        let c = ShimmerConfig::builder().delay_ms(10.0).build().unwrap();
        assert!(a.timing_differs(&c));
        assert!(!a.with_enabled(false).enabled());
    }
}
