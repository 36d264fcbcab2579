use crate::foundation::core::ColorRgba;
use crate::foundation::error::{PropdriveError, PropdriveResult};

/// A color stop at a normalized gradient position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Normalized position in `[0, 1]`.
    pub t: f64,
    /// Color at this position.
    pub color: ColorRgba,
}

/// A piecewise-linear color gradient sampled by normalized position.
///
/// Used by bindings to route a scalar production into a color-shaped member.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gradient {
    /// Stops sorted by position.
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Gradient interpolating between two endpoint colors.
    pub fn between(a: ColorRgba, b: ColorRgba) -> Self {
        Self {
            stops: vec![
                GradientStop { t: 0.0, color: a },
                GradientStop { t: 1.0, color: b },
            ],
        }
    }

    /// Validate stop ordering.
    pub fn validate(&self) -> PropdriveResult<()> {
        if self.stops.is_empty() {
            return Err(PropdriveError::validation(
                "Gradient must have at least one stop",
            ));
        }
        if !self.stops.windows(2).all(|w| w[0].t <= w[1].t) {
            return Err(PropdriveError::validation(
                "Gradient stops must be sorted by position",
            ));
        }
        Ok(())
    }

    /// Sample the gradient at a normalized position, clamped to the stop range.
    pub fn sample(&self, t: f64) -> ColorRgba {
        let Some(first) = self.stops.first() else {
            return ColorRgba::WHITE;
        };
        if t <= first.t {
            return first.color;
        }
        let last = self.stops[self.stops.len() - 1];
        if t >= last.t {
            return last.color;
        }

        let idx = self.stops.partition_point(|s| s.t <= t);
        let a = &self.stops[idx - 1];
        let b = &self.stops[idx];
        let denom = b.t - a.t;
        if denom <= f64::EPSILON {
            return a.color;
        }
        ColorRgba::lerp(&a.color, &b.color, (t - a.t) / denom)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::between(ColorRgba::WHITE, ColorRgba::WHITE)
    }
}
