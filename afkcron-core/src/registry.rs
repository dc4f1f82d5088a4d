use crate::{Entry, EntryId, EntrySpec};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new(specs: impl IntoIterator<Item = EntrySpec>) -> Self {
        let entries = specs
            .into_iter()
            .enumerate()
            .map(|(idx, spec)| Entry::new(EntryId::new(idx), spec))
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComebackAction, RunState};

    fn spec(path: &str) -> EntrySpec {
        EntrySpec {
            path: path.to_string(),
            arguments: String::new(),
            comeback: ComebackAction::STAY,
            idle_threshold_secs: 10,
            single_shot: false,
        }
    }

    #[test]
    fn test_preserves_insertion_order() {
        let registry = Registry::new(vec![spec("/a"), spec("/b"), spec("/c")]);
        let paths: Vec<_> = registry.iter().map(|e| e.spec.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
        assert_eq!(registry.get(EntryId::new(1)).unwrap().spec.path, "/b");
        assert!(registry.get(EntryId::new(3)).is_none());
    }

    #[test]
    fn test_ids_address_their_own_entry() {
        let mut registry = Registry::new(vec![spec("/a"), spec("/b")]);
        registry.get_mut(EntryId::new(1)).unwrap().mark_started(77);
        assert_eq!(registry.ids(), vec![EntryId::new(0), EntryId::new(1)]);
        assert_eq!(
            registry.get(EntryId::new(0)).unwrap().run_state(),
            RunState::NotStarted
        );
        assert_eq!(
            registry.get(EntryId::new(1)).unwrap().run_state(),
            RunState::Running(77)
        );
    }
}
