use crate::foundation::error::{PropdriveError, PropdriveResult};
use crate::reflect::store::PropertyStore;
use crate::value::compound::{CompoundValue, ShapeTag};

/// A member path within a target object: a member name plus an optional
/// sub-member naming one component of a compound value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PropertyPath {
    member: String,
    #[serde(default)]
    sub_member: Option<String>,
}

impl PropertyPath {
    /// Path to a whole member.
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            sub_member: None,
        }
    }

    /// Path to one component of a compound member.
    pub fn with_sub(member: impl Into<String>, sub_member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            sub_member: Some(sub_member.into()),
        }
    }

    /// Parse a dotted path string.
    ///
    /// One segment names a member; two name member and sub-member. Longer
    /// paths keep only the last two segments, preserving compatibility with
    /// a deprecated multi-segment format where leading segments addressed
    /// the host object.
    pub fn parse(raw: &str) -> PropdriveResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PropdriveError::validation("property path must be non-empty"));
        }

        let segments: Vec<&str> = raw.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PropdriveError::validation(format!(
                "property path '{raw}' has empty segments"
            )));
        }

        match segments.as_slice() {
            [member] => Ok(Self::new(*member)),
            [.., member, sub] => Ok(Self::with_sub(*member, *sub)),
            [] => Err(PropdriveError::validation("property path must be non-empty")),
        }
    }

    /// Member name.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Sub-member name, if the path addresses a single component.
    pub fn sub_member(&self) -> Option<&str> {
        self.sub_member.as_deref()
    }

    /// Resolve this path against a store, validating that the member exists
    /// and capturing its current shape.
    pub fn resolve(&self, store: &dyn PropertyStore) -> PropdriveResult<ResolvedTarget> {
        let value = store.get(&self.member)?;
        Ok(ResolvedTarget {
            path: self.clone(),
            tag: value.tag(),
        })
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub_member {
            Some(sub) => write!(f, "{}.{sub}", self.member),
            None => write!(f, "{}", self.member),
        }
    }
}

/// A path resolved against a store at activation time.
///
/// The captured tag reflects the member's shape at resolution; reads and
/// writes re-consult the store, so a member whose live shape changes is
/// still handled by its current tag.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTarget {
    path: PropertyPath,
    tag: ShapeTag,
}

impl ResolvedTarget {
    /// The resolved path.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Shape tag captured at resolution time.
    pub fn tag(&self) -> ShapeTag {
        self.tag
    }

    /// Read the value this path addresses.
    ///
    /// With a sub-member, decomposes the member and returns that component;
    /// if the member does not decompose to that name, falls back to the full
    /// value and surfaces a recoverable warning.
    pub fn read(&self, store: &dyn PropertyStore) -> PropdriveResult<CompoundValue> {
        let full = store.get(self.path.member())?;
        let Some(sub) = self.path.sub_member() else {
            return Ok(full);
        };
        match full.component(sub) {
            Some(component) => Ok(CompoundValue::Float(component)),
            None => {
                tracing::warn!(
                    path = %self.path,
                    shape = full.tag().name(),
                    "sub-member does not decompose; returning full value"
                );
                Ok(full)
            }
        }
    }

    /// Write a value through this path, merging partial writes into the
    /// member's current value and coercing to its live shape.
    pub fn write(&self, store: &mut dyn PropertyStore, value: &CompoundValue) -> PropdriveResult<()> {
        let existing = store.get(self.path.member())?;
        let next = CompoundValue::recompose(&existing, self.path.sub_member(), value)?;
        store.set(self.path.member(), next)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reflect/path.rs"]
mod tests;
