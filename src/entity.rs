use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    data_structures::object::NodeHandle,
    descriptor::EntityDescriptor,
    timer::{IntervalHandle, Timer},
};

/// A loaded entity: its scene group plus the handles needed to animate it.
///
/// The group is what a renderer attaches to its scene. Models are looked up by
/// their descriptor key; keys whose construction failed are absent.
pub struct Entity {
    pub(crate) name: String,
    pub(crate) descriptor: EntityDescriptor,
    pub(crate) group: NodeHandle,
    pub(crate) models: IndexMap<String, NodeHandle>,
    /// Intervals registered while constructing and decorating models.
    pub(crate) construction_intervals: Vec<IntervalHandle>,
    /// Caller name to the intervals of its current state.
    pub(crate) active: HashMap<String, Vec<IntervalHandle>>,
}

impl Entity {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    pub fn group(&self) -> &NodeHandle {
        &self.group
    }

    pub fn model(&self, key: &str) -> Option<&NodeHandle> {
        self.models.get(key)
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &NodeHandle)> {
        self.models.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn construction_intervals(&self) -> &[IntervalHandle] {
        &self.construction_intervals
    }

    /// Intervals currently running for `caller`.
    pub fn active_intervals(&self, caller: &str) -> &[IntervalHandle] {
        self.active.get(caller).map(Vec::as_slice).unwrap_or_default()
    }

    /// Cancels every interval this entity registered.
    pub fn stop_all(&mut self, timer: &mut dyn Timer) {
        let construction = self.construction_intervals.drain(..);
        let callers = self.active.drain().flat_map(|(_, handles)| handles);
        let cancelled = construction.chain(callers).filter(|h| timer.cancel(*h)).count();
        log::debug!("`{}` stopped {cancelled} intervals", self.name);
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .field("construction_intervals", &self.construction_intervals.len())
            .field("active", &self.active)
            .finish()
    }
}
