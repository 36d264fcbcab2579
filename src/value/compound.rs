use crate::foundation::core::{ColorRgba, Vec2, Vec3, Vec4};
use crate::foundation::error::{PropdriveError, PropdriveResult};

/// Structural type of a property value, determining decomposition rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ShapeTag {
    /// Scalar floating-point value.
    Float,
    /// Scalar integer value.
    Int,
    /// 2-component vector (`x`, `y`).
    Vec2,
    /// 3-component vector (`x`, `y`, `z`).
    Vec3,
    /// 4-component vector (`x`, `y`, `z`, `w`).
    Vec4,
    /// RGBA color (`r`, `g`, `b`, `a`).
    Color,
}

impl ShapeTag {
    /// Stable display name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Color => "color",
        }
    }
}

/// A property value tagged with its structural shape.
///
/// The tag is determined by the live type of the resolved member at read
/// time; writes preserve the existing tag unless the incoming value is
/// itself compound (see [`CompoundValue::recompose`]).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CompoundValue {
    /// Scalar float.
    Float(f64),
    /// Scalar integer.
    Int(i64),
    /// 2-component vector.
    Vec2(Vec2),
    /// 3-component vector.
    Vec3(Vec3),
    /// 4-component vector.
    Vec4(Vec4),
    /// RGBA color.
    Color(ColorRgba),
}

impl CompoundValue {
    /// Shape tag of this value.
    pub fn tag(&self) -> ShapeTag {
        match self {
            Self::Float(_) => ShapeTag::Float,
            Self::Int(_) => ShapeTag::Int,
            Self::Vec2(_) => ShapeTag::Vec2,
            Self::Vec3(_) => ShapeTag::Vec3,
            Self::Vec4(_) => ShapeTag::Vec4,
            Self::Color(_) => ShapeTag::Color,
        }
    }

    /// Scalar view of this value, if it is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Decompose into ordered components (a scalar decomposes to itself).
    pub fn components(&self) -> Vec<f64> {
        match *self {
            Self::Float(v) => vec![v],
            Self::Int(v) => vec![v as f64],
            Self::Vec2(v) => vec![v.x, v.y],
            Self::Vec3(v) => vec![v.x, v.y, v.z],
            Self::Vec4(v) => vec![v.x, v.y, v.z, v.w],
            Self::Color(c) => vec![c.r, c.g, c.b, c.a],
        }
    }

    /// Read a single named component (`x|y|z|w` for vectors, `r|g|b|a` for
    /// colors). Returns `None` for names this shape does not decompose to.
    pub fn component(&self, name: &str) -> Option<f64> {
        match *self {
            Self::Float(_) | Self::Int(_) => None,
            Self::Vec2(v) => match name {
                "x" => Some(v.x),
                "y" => Some(v.y),
                _ => None,
            },
            Self::Vec3(v) => match name {
                "x" => Some(v.x),
                "y" => Some(v.y),
                "z" => Some(v.z),
                _ => None,
            },
            Self::Vec4(v) => match name {
                "x" => Some(v.x),
                "y" => Some(v.y),
                "z" => Some(v.z),
                "w" => Some(v.w),
                _ => None,
            },
            Self::Color(c) => match name {
                "r" => Some(c.r),
                "g" => Some(c.g),
                "b" => Some(c.b),
                "a" => Some(c.a),
                _ => None,
            },
        }
    }

    /// Merge `incoming` into `existing`, preserving the existing shape tag.
    ///
    /// With no sub-member, scalars broadcast into vectors, same-tag compound
    /// values replace wholesale, and a bare scalar into a color is rejected
    /// (gradient routing happens one level up, in the binding). With a
    /// sub-member, exactly that component is replaced; unknown sub-member
    /// names are a silent no-op to stay lenient toward hand-authored
    /// configurations.
    pub fn recompose(
        existing: &CompoundValue,
        sub_member: Option<&str>,
        incoming: &CompoundValue,
    ) -> PropdriveResult<CompoundValue> {
        match sub_member {
            None => Self::recompose_full(existing, incoming),
            Some(name) => Self::recompose_component(existing, name, incoming),
        }
    }

    fn recompose_full(
        existing: &CompoundValue,
        incoming: &CompoundValue,
    ) -> PropdriveResult<CompoundValue> {
        if let Some(s) = incoming.as_scalar() {
            return match *existing {
                Self::Float(_) => Ok(Self::Float(s)),
                Self::Int(_) => Ok(Self::Int(round_to_int(s))),
                Self::Vec2(_) => Ok(Self::Vec2(Vec2::new(s, s))),
                Self::Vec3(_) => Ok(Self::Vec3(Vec3::splat(s))),
                Self::Vec4(_) => Ok(Self::Vec4(Vec4::splat(s))),
                Self::Color(_) => Err(PropdriveError::shape_mismatch(
                    "cannot write a bare scalar into a color member",
                )),
            };
        }

        if existing.tag() == incoming.tag() {
            return Ok(*incoming);
        }

        Err(PropdriveError::shape_mismatch(format!(
            "cannot write {} into {} member",
            incoming.tag().name(),
            existing.tag().name()
        )))
    }

    fn recompose_component(
        existing: &CompoundValue,
        name: &str,
        incoming: &CompoundValue,
    ) -> PropdriveResult<CompoundValue> {
        let Some(s) = incoming.as_scalar() else {
            return Err(PropdriveError::shape_mismatch(format!(
                "component write '{name}' requires a scalar, got {}",
                incoming.tag().name()
            )));
        };

        let next = match *existing {
            // A sub-member on a scalar member degenerates to a plain write.
            Self::Float(_) => Self::Float(s),
            Self::Int(_) => Self::Int(round_to_int(s)),
            Self::Vec2(mut v) => {
                match name {
                    "x" => v.x = s,
                    "y" => v.y = s,
                    _ => {}
                }
                Self::Vec2(v)
            }
            Self::Vec3(mut v) => {
                match name {
                    "x" => v.x = s,
                    "y" => v.y = s,
                    "z" => v.z = s,
                    _ => {}
                }
                Self::Vec3(v)
            }
            Self::Vec4(mut v) => {
                match name {
                    "x" => v.x = s,
                    "y" => v.y = s,
                    "z" => v.z = s,
                    "w" => v.w = s,
                    _ => {}
                }
                Self::Vec4(v)
            }
            Self::Color(mut c) => {
                match name {
                    "r" => c.r = s,
                    "g" => c.g = s,
                    "b" => c.b = s,
                    "a" => c.a = s,
                    _ => {}
                }
                Self::Color(c)
            }
        };
        Ok(next)
    }
}

fn round_to_int(v: f64) -> i64 {
    v.round() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/value/compound.rs"]
mod tests;
