use crate::{Result, TaskError, TaskSpec};
use std::collections::HashMap;

/// One reconstructable, executable work unit.
///
/// Implementations are plain data plus a blocking `execute`; they must not
/// fail for expected inputs. Reconstruction from a `TaskSpec` goes through
/// the constructor registered in a [`KindRegistry`] under the same kind tag.
pub trait WorkUnit: Send {
    /// Constant tag unique per variant.
    fn kind(&self) -> &'static str;

    /// Serialize back into the spec this unit was built from.
    fn spec(&self) -> TaskSpec;

    /// Run the unit to completion and return a human-readable summary.
    fn execute(&self) -> String;
}

/// Associated constructor for one work-unit kind.
pub type BuildFn = fn(&TaskSpec) -> Result<Box<dyn WorkUnit>>;

/// Registry mapping kind tags to constructors. Built once at startup and
/// shared read-only by every role.
#[derive(Default)]
pub struct KindRegistry {
    builders: HashMap<&'static str, BuildFn>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: &'static str, build: BuildFn) {
        self.builders.insert(kind, build);
    }

    /// Reconstruct a work unit from its spec. An unregistered kind tag is
    /// an invariant violation, not a skippable event.
    pub fn build(&self, spec: &TaskSpec) -> Result<Box<dyn WorkUnit>> {
        let build = self
            .builders
            .get(spec.kind.as_str())
            .ok_or_else(|| TaskError::UnknownKind(spec.kind.clone()))?;
        build(spec)
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.builders.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.builders.keys().copied().collect()
    }
}
