//! Arena-indexed ordered key list.
//!
//! Nodes live in a `generational_arena::Arena` and link to each other by arena
//! index, with a `HashMap` from key to index for O(1) lookup. The head is the
//! oldest entry (next victim), the tail the newest. Removing a node frees its
//! arena slot; stale indices are rejected by the arena's generation check.
//!
//! # Performance
//!
//! - `contains()`, `push_back()`, `move_to_back()`, `pop_front()`, `remove()`: O(1) expected
//! - **Space Complexity:** O(N) for N resident keys

use std::collections::HashMap;
use std::hash::Hash;

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<Index>,
    next: Option<Index>,
}

/// Doubly linked list of unique keys, oldest at the head.
#[derive(Debug)]
pub struct KeyList<K> {
    nodes: Arena<Node<K>>,
    lookup: HashMap<K, Index>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl<K: Eq + Hash + Clone> Default for KeyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> KeyList<K> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            lookup: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Number of keys in the list.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns true when the list holds no keys.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Returns true if `key` is in the list.
    pub fn contains(&self, key: &K) -> bool {
        self.lookup.contains_key(key)
    }

    /// Oldest key, the one `pop_front` would return.
    pub fn front(&self) -> Option<&K> {
        self.head.and_then(|idx| self.nodes.get(idx)).map(|n| &n.key)
    }

    // Detaches a node from its neighbours. Arena and map are left untouched.
    fn unlink(&mut self, index: Index) {
        let Some(node) = self.nodes.get(index) else {
            return;
        };
        let (prev, next) = (node.prev, node.next);

        match prev {
            Some(p) => {
                if let Some(n) = self.nodes.get_mut(p) {
                    n.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes.get_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    // Attaches an already-allocated node at the tail.
    fn link_back(&mut self, index: Index) {
        let old_tail = self.tail;
        if let Some(node) = self.nodes.get_mut(index) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => {
                if let Some(node) = self.nodes.get_mut(t) {
                    node.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    /// Appends `key` at the tail. Returns false (and changes nothing) if the
    /// key is already present.
    pub fn push_back(&mut self, key: K) -> bool {
        if self.lookup.contains_key(&key) {
            return false;
        }
        let index = self.nodes.insert(Node {
            key: key.clone(),
            prev: None,
            next: None,
        });
        let _ = self.lookup.insert(key, index);
        self.link_back(index);
        true
    }

    /// Moves `key` to the tail. Returns false if the key is absent.
    pub fn move_to_back(&mut self, key: &K) -> bool {
        let Some(&index) = self.lookup.get(key) else {
            return false;
        };
        if self.tail != Some(index) {
            self.unlink(index);
            self.link_back(index);
        }
        true
    }

    /// Removes and returns the oldest key.
    pub fn pop_front(&mut self) -> Option<K> {
        let index = self.head?;
        let key = self.nodes.get(index)?.key.clone();
        let _ = self.remove(&key);
        Some(key)
    }

    /// Removes `key`. Returns false if it was absent.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(index) = self.lookup.remove(key) else {
            return false;
        };
        self.unlink(index);
        let _ = self.nodes.remove(index);
        true
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.lookup.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

impl<'a, K: Eq + Hash + Clone> IntoIterator for &'a KeyList<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`KeyList`] from head to tail.
#[derive(Debug)]
pub struct Iter<'a, K> {
    list: &'a KeyList<K>,
    cursor: Option<Index>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.key)
    }
}
