use kinema_stage::Primitive;
use std::collections::HashMap;

/// The object registry: an owned mapping from declared id to its
/// constructed primitive. Built once by the builder, then passed
/// explicitly to the sequencer — there is no ambient state and no
/// cross-pass sharing.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<String, Primitive>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a primitive under an id. A duplicate id overwrites the
    /// earlier entry; the displaced primitive is returned.
    pub fn register(&mut self, id: impl Into<String>, primitive: Primitive) -> Option<Primitive> {
        self.entries.insert(id.into(), primitive)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Primitive> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Primitive> {
        self.entries.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
