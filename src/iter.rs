//! Iterator types for persistent maps.
//!
//! Traversal is lazy and depth-first: each node's inline entries are yielded
//! before descending into its children. Every call to
//! [`PersistentMap::iter`](crate::PersistentMap::iter) starts a fresh walk
//! over the snapshot it was called on.

use std::iter::FusedIterator;
use std::slice;
use std::sync::Arc;

use crate::node::{Entry, Node};

/// Position within one node of the walk.
struct Frame<'a, K, V> {
    entries: slice::Iter<'a, Entry<K, V>>,
    children: slice::Iter<'a, Arc<Node<K, V>>>,
}

impl<'a, K, V> Frame<'a, K, V> {
    fn new(node: &'a Node<K, V>) -> Self {
        Self {
            entries: node.entries().iter(),
            children: node.children().iter(),
        }
    }
}

/// Iterator over references to key-value pairs in a
/// [`PersistentMap`](crate::PersistentMap).
pub struct Iter<'a, K, V> {
    stack: Vec<Frame<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        Self {
            stack: root.map(Frame::new).into_iter().collect(),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(entry) = frame.entries.next() {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            if let Some(child) = frame.children.next() {
                self.stack.push(Frame::new(&**child));
            } else {
                self.stack.pop();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self
                .stack
                .iter()
                .map(|frame| Frame {
                    entries: frame.entries.clone(),
                    children: frame.children.clone(),
                })
                .collect(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of a [`PersistentMap`](crate::PersistentMap).
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`PersistentMap`](crate::PersistentMap).
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
