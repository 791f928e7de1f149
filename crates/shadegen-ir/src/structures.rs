//! The shared, append-only structure set of a compilation unit.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::error::IrError;
use crate::types::StructureDefinition;

/// Structures keyed by canonical name, in insertion order.
///
/// This is the only part of a [`CompilationUnit`](crate::CompilationUnit)
/// that grows during code generation. All insertions go through the write
/// lock, so at most one insertion (including the lookup that produces the
/// inserted value) runs at a time. Readers get `Arc` snapshots and never hold
/// the lock while emitting.
#[derive(Debug, Default)]
pub struct StructureSet {
    inner: RwLock<IndexMap<String, Arc<StructureDefinition>>>,
}

impl StructureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Looks up a registered structure.
    pub fn get(&self, name: &str) -> Option<Arc<StructureDefinition>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Registers a structure under its own name.
    pub fn insert(&self, structure: StructureDefinition) -> Result<Arc<StructureDefinition>, IrError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&structure.name) {
            return Err(IrError::DuplicateName(structure.name));
        }
        let structure = Arc::new(structure);
        map.insert(structure.name.clone(), Arc::clone(&structure));
        Ok(structure)
    }

    /// Returns the structure registered as `name`, producing and registering
    /// it with `produce` if it is absent.
    ///
    /// `produce` runs under the write lock: concurrent callers asking for the
    /// same missing name wait and then observe the first caller's result. A
    /// failing `produce` inserts nothing.
    pub fn get_or_try_insert_with<E>(
        &self,
        name: &str,
        produce: impl FnOnce() -> Result<StructureDefinition, E>,
    ) -> Result<Arc<StructureDefinition>, E> {
        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }

        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = map.get(name) {
            return Ok(Arc::clone(existing));
        }
        let structure = Arc::new(produce()?);
        map.insert(name.to_owned(), Arc::clone(&structure));
        Ok(structure)
    }

    /// Returns every registered structure in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<StructureDefinition>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known;
    use crate::types::FieldDefinition;

    fn structure(name: &str) -> StructureDefinition {
        StructureDefinition::new(name, vec![FieldDefinition::new("Value", known::FLOAT)])
    }

    #[test]
    fn insert_and_get() {
        let set = StructureSet::new();
        set.insert(structure("A")).unwrap();
        assert!(set.contains("A"));
        assert_eq!(set.get("A").unwrap().fields.len(), 1);
        assert!(set.get("B").is_none());
    }

    #[test]
    fn duplicate_insert_rejected() {
        let set = StructureSet::new();
        set.insert(structure("A")).unwrap();
        assert!(matches!(set.insert(structure("A")), Err(IrError::DuplicateName(_))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn get_or_insert_is_idempotent() {
        let set = StructureSet::new();
        let first = set
            .get_or_try_insert_with("A", || Ok::<_, ()>(structure("A")))
            .unwrap();
        let second = set
            .get_or_try_insert_with("A", || -> Result<StructureDefinition, ()> {
                panic!("producer must not run for a registered name")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn failed_producer_inserts_nothing() {
        let set = StructureSet::new();
        let result = set.get_or_try_insert_with("A", || Err("not found"));
        assert_eq!(result.unwrap_err(), "not found");
        assert!(set.is_empty());
    }

    #[test]
    fn concurrent_discovery_produces_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let set = StructureSet::new();
        let calls = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    set.get_or_try_insert_with("Shared", || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ()>(structure("Shared"))
                    })
                    .unwrap();
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn snapshot_preserves_order() {
        let set = StructureSet::new();
        set.insert(structure("Z")).unwrap();
        set.insert(structure("A")).unwrap();
        let names: Vec<_> = set.snapshot().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, ["Z", "A"]);
    }
}
