use kurbo::{CubicBez, ParamCurve, Point};

use crate::foundation::error::{PropdriveError, PropdriveResult};
use crate::mapping::ease::Ease;

/// One key of a piecewise-linear curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Input position.
    pub t: f64,
    /// Output value at this position.
    pub value: f64,
}

impl CurveKey {
    /// Create a new key.
    pub fn new(t: f64, value: f64) -> Self {
        Self { t, value }
    }
}

/// A 1D mapping curve from an input parameter to an output multiplier.
///
/// Inputs outside the curve's domain clamp to the boundary values; outputs
/// are unconstrained (oscillator shapes commonly span `[-1, 1]`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Curve1D {
    /// A named easing function over `[0, 1]`.
    Ease(Ease),
    /// Piecewise-linear interpolation through keys sorted by `t`.
    Points(Vec<CurveKey>),
    /// CSS-style cubic bezier through (0,0) and (1,1) with two control points.
    CubicBezier {
        /// First control point x, in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl Curve1D {
    /// The identity curve.
    pub fn linear() -> Self {
        Self::Ease(Ease::Linear)
    }

    /// Validate curve parameters.
    pub fn validate(&self) -> PropdriveResult<()> {
        match self {
            Self::Ease(_) => Ok(()),
            Self::Points(keys) => {
                if keys.is_empty() {
                    return Err(PropdriveError::validation(
                        "Points curve must have at least one key",
                    ));
                }
                if !keys.windows(2).all(|w| w[0].t <= w[1].t) {
                    return Err(PropdriveError::validation(
                        "Points curve keys must be sorted by t",
                    ));
                }
                Ok(())
            }
            Self::CubicBezier { x1, x2, .. } => {
                if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
                    return Err(PropdriveError::validation(
                        "CubicBezier control point x coordinates must be in [0, 1]",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Evaluate the curve at `t`.
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            Self::Ease(ease) => ease.apply(t),
            Self::Points(keys) => eval_points(keys, t),
            Self::CubicBezier { x1, y1, x2, y2 } => eval_cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }
}

impl Default for Curve1D {
    fn default() -> Self {
        Self::linear()
    }
}

fn eval_points(keys: &[CurveKey], t: f64) -> f64 {
    let Some(first) = keys.first() else {
        return t;
    };
    if t <= first.t {
        return first.value;
    }
    let last = &keys[keys.len() - 1];
    if t >= last.t {
        return last.value;
    }

    let idx = keys.partition_point(|k| k.t <= t);
    let a = &keys[idx - 1];
    let b = &keys[idx];
    let denom = b.t - a.t;
    if denom <= f64::EPSILON {
        return a.value;
    }
    a.value + (b.value - a.value) * ((t - a.t) / denom)
}

fn eval_cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let bez = CubicBez::new(
        Point::ZERO,
        Point::new(x1, y1),
        Point::new(x2, y2),
        Point::new(1.0, 1.0),
    );

    // With control x in [0,1] the x polynomial is monotone; bisect on x.
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    for _ in 0..48 {
        let mid = 0.5 * (lo + hi);
        if bez.eval(mid).x < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bez.eval(0.5 * (lo + hi)).y
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/curve.rs"]
mod tests;
