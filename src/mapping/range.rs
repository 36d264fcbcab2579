use crate::foundation::error::PropdriveResult;
use crate::mapping::curve::Curve1D;

/// Stateless range/curve mapper turning a normalized parameter into a ranged
/// output: `map(t) = min + (max - min) * curve(t)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeCurve {
    /// Output at curve value 0.
    #[serde(default)]
    pub min: f64,
    /// Output at curve value 1.
    #[serde(default = "default_range_max")]
    pub max: f64,
    /// Mapping curve applied to the input parameter.
    #[serde(default)]
    pub curve: Curve1D,
}

fn default_range_max() -> f64 {
    1.0
}

impl RangeCurve {
    /// Create a range with the given bounds and a linear curve.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            curve: Curve1D::linear(),
        }
    }

    /// Validate the mapping curve.
    pub fn validate(&self) -> PropdriveResult<()> {
        self.curve.validate()
    }

    /// Map `t` through the curve into `[min, max]`.
    pub fn map(&self, t: f64) -> f64 {
        self.min + (self.max - self.min) * self.curve.eval(t)
    }

    /// Linear interpolation between `min` and `max`, bypassing the curve.
    ///
    /// Time-indexed event payloads use this path: their own payload curve has
    /// already shaped the parameter.
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + (self.max - self.min) * t
    }
}

impl Default for RangeCurve {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}
