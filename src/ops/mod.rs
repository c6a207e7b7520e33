//! Trie operations: lookup, path-copy insert, path-copy remove.
//!
//! None of these functions mutate an existing node. Every change is built
//! into fresh vectors and new `Arc`-wrapped nodes; untouched subtrees are
//! linked by reference count.

pub mod get;
pub mod insert;
pub mod remove;

/// Copies `items` with `item` inserted at position `at`.
fn inserting<T: Clone>(items: &[T], at: usize, item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(&items[..at]);
    out.push(item);
    out.extend_from_slice(&items[at..]);
    out
}

/// Copies `items` with the element at position `at` replaced by `item`.
fn replacing<T: Clone>(items: &[T], at: usize, item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    out.extend_from_slice(&items[..at]);
    out.push(item);
    out.extend_from_slice(&items[at + 1..]);
    out
}

/// Copies `items` without the element at position `at`.
fn removing<T: Clone>(items: &[T], at: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len().saturating_sub(1));
    out.extend_from_slice(&items[..at]);
    out.extend_from_slice(&items[at + 1..]);
    out
}
