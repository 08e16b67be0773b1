use std::fmt;

use super::{Extent, LazySequence, Pull, SortedSequence, Source, lazy::LazyVec};
use crate::error::Result;

/// A [`LazyVec`] over a non-decreasing source. The cache is sorted at every
/// observation point, which turns membership into a binary search plus, at
/// worst, advancing the source until it passes the probe.
pub struct SortedLazyVec<S: Source> {
    inner: LazyVec<S>,
}

impl<S> Clone for SortedLazyVec<S>
where
    S: Source + Clone,
    S::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> fmt::Debug for SortedLazyVec<S>
where
    S: Source + fmt::Debug,
    S::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedLazyVec")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<I> SortedLazyVec<Pull<I>>
where
    I: Iterator,
    I::Item: Ord,
{
    pub fn new(src: I) -> Self {
        Self {
            inner: LazyVec::new(src),
        }
    }
}

impl<S> SortedLazyVec<S>
where
    S: Source,
    S::Item: Ord,
{
    pub fn with_source(src: S) -> Self {
        Self {
            inner: LazyVec::with_source(src),
        }
    }

    /// `seed` must already be sorted and lie below everything `src` yields.
    pub fn with_seed(seed: Vec<S::Item>, src: S) -> Self {
        debug_assert!(seed.is_sorted());
        Self {
            inner: LazyVec::with_seed(seed, src),
        }
    }

    pub fn produce_next(&mut self) -> Result<&S::Item> {
        self.inner.produce_next()
    }

    pub fn cached(&self) -> &[S::Item] {
        self.inner.cached()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn last(&self) -> Option<&S::Item> {
        self.inner.last()
    }

    pub fn source(&self) -> &S {
        self.inner.source()
    }

    /// Invariant probe; not checked on every call.
    pub fn is_sorted(&self) -> bool {
        self.inner.cached().is_sorted()
    }

    /// Lower bound of `x`. Answered from the cache when `x` is at or below the
    /// frontier, otherwise the source is advanced just far enough to place it.
    pub fn insert_position(&mut self, x: &S::Item) -> Result<usize> {
        if self.inner.last().is_some_and(|last| x <= last) {
            return Ok(self.inner.cached().partition_point(|y| y < x));
        }
        loop {
            if self.inner.produce_next()? >= x {
                return Ok(self.inner.len() - 1);
            }
        }
    }
}

impl<S> LazySequence for SortedLazyVec<S>
where
    S: Source,
    S::Item: Clone + Ord,
{
    type Item = S::Item;

    fn get_index(&mut self, i: usize) -> Result<S::Item> {
        self.inner.get_index(i)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn extent(&self) -> Extent {
        self.inner.extent()
    }
}

impl<S> SortedSequence for SortedLazyVec<S>
where
    S: Source,
    S::Item: Clone + Ord,
{
    fn insert_position(&mut self, x: &S::Item) -> Result<usize> {
        SortedLazyVec::insert_position(self, x)
    }
}
