use crate::foundation::error::PropdriveResult;
use crate::mapping::range::RangeCurve;
use crate::reflect::path::PropertyPath;
use crate::signal::source::SourceConfig;
use crate::value::gradient::Gradient;

/// Complete authoring-time configuration of one binding.
///
/// A pure data model: serializable with Serde (the host persists it as part
/// of its scene serialization) and reapplied in place via
/// [`Binding::reconfigure`](crate::Binding::reconfigure).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BindingConfig {
    /// Target property path.
    pub path: PropertyPath,
    /// Range/curve mapping shared by the drive modes.
    #[serde(default)]
    pub range: RangeCurve,
    /// Signal source selection and per-variant parameters.
    #[serde(default)]
    pub source: SourceConfig,
    /// Gradient routing scalar productions into color-shaped members.
    /// Without one, a scalar write to a whole color member is a shape
    /// mismatch and is skipped.
    #[serde(default)]
    pub gradient: Option<Gradient>,
}

impl BindingConfig {
    /// Configuration with defaults for everything but the path.
    pub fn new(path: PropertyPath) -> Self {
        Self {
            path,
            range: RangeCurve::default(),
            source: SourceConfig::default(),
            gradient: None,
        }
    }

    /// Validate ranges, curves and gradient stops.
    pub fn validate(&self) -> PropdriveResult<()> {
        self.range.validate()?;
        self.source.validate()?;
        if let Some(gradient) = &self.gradient {
            gradient.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/config.rs"]
mod tests;
