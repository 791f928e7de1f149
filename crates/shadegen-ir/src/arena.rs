//! Append-only, name-keyed storage with typed handles.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;

use indexmap::IndexMap;

use crate::error::IrError;

/// A value that is uniquely identified by its name within a compilation unit.
pub trait Named {
    /// The unique (case-sensitive) name of this value.
    fn name(&self) -> &str;
}

/// A typed handle into a [`NamedArena`].
///
/// Handles are lightweight identifiers (u32 index) that stay valid for the
/// lifetime of the arena, since nothing is ever removed.
pub struct Handle<T> {
    index: u32,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

impl<T> Handle<T> {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            index,
            _phantom: PhantomData,
        }
    }

    /// Returns the zero-based insertion index of this handle.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// An append-only arena keyed by name.
///
/// Insertion order is preserved and is the iteration order. Inserting a
/// value whose name is already present fails with [`IrError::DuplicateName`]
/// and leaves the arena untouched.
#[derive(Clone, Debug)]
pub struct NamedArena<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for NamedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NamedArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Returns the number of elements in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena contains no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if a value with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Looks up a value by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    /// Returns the handle of the value with this name, if any.
    pub fn handle(&self, name: &str) -> Option<Handle<T>> {
        self.items
            .get_index_of(name)
            .map(|i| Handle::new(i as u32))
    }

    /// Returns a reference to the value if the handle is valid.
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get_index(handle.index()).map(|(_, v)| v)
    }

    /// Iterates over `(handle, &value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        // Safety: arena size bounded by u32::MAX (enforced in insert)
        self.items
            .values()
            .enumerate()
            .map(|(i, v)| (Handle::new(i as u32), v))
    }
}

impl<T: Named> NamedArena<T> {
    /// Appends a value under its own name and returns its handle.
    pub fn insert(&mut self, value: T) -> Result<Handle<T>, IrError> {
        if self.items.contains_key(value.name()) {
            return Err(IrError::DuplicateName(value.name().to_owned()));
        }
        let index = u32::try_from(self.items.len()).map_err(|_| IrError::ArenaOverflow)?;
        self.items.insert(value.name().to_owned(), value);
        Ok(Handle::new(index))
    }
}

impl<T> Index<Handle<T>> for NamedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index()]
    }
}
