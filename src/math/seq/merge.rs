//! Merging sorted streams.
//!
//! [`Merge2`] is the plain pairwise merge. [`KMerge`] merges an unbounded
//! family of sorted streams `k = 0, 1, 2, ...` whose first elements are
//! non-decreasing in `k`. A new stream is only opened once its head could be
//! the next global minimum, so every call to `next` emits exactly one value
//! after touching a finite number of streams. This is the iterative form of
//! "emit the head of the first stream, then merge it with the merge of the
//! rest", without the nested generators.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    iter::Peekable,
};

use tracing::debug;

/// Pairwise merge of two sorted iterators. Ties go to the left side. When one
/// side ends the other drains.
pub struct Merge2<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    a: Peekable<A>,
    b: Peekable<B>,
}

impl<A, B> Merge2<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    pub fn new(a: A, b: B) -> Self {
        Self {
            a: a.peekable(),
            b: b.peekable(),
        }
    }
}

impl<A, B> Iterator for Merge2<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    A::Item: Ord,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        let left = match (self.a.peek(), self.b.peek()) {
            (Some(x), Some(y)) => x <= y,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if left { self.a.next() } else { self.b.next() }
    }
}

pub trait MergeSorted: Iterator + Sized {
    fn merge_sorted<J>(self, other: J) -> Merge2<Self, J::IntoIter>
    where
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Ord,
    {
        Merge2::new(self, other.into_iter())
    }
}

impl<T: Iterator> MergeSorted for T {}

/// An indexed family of sorted streams. The family owns whatever state the
/// streams share; a cursor is the per-stream position and captures its own
/// index at [`open`](StreamFamily::open) time.
///
/// Contract: the first element of stream `k` is never smaller than the first
/// element of stream `k - 1`, and a stream that is empty when opened means
/// every later stream is empty too.
pub trait StreamFamily {
    type Item: Ord + std::fmt::Debug;
    type Cursor;

    fn open(&mut self, k: usize) -> Self::Cursor;

    fn advance(&mut self, cursor: &mut Self::Cursor) -> Option<Self::Item>;
}

/// Turns `k -> iterator` into a family. Each call builds an independent
/// iterator, so nothing is shared between streams.
pub struct FnFamily<G>(pub G);

impl<G, I> StreamFamily for FnFamily<G>
where
    G: FnMut(usize) -> I,
    I: Iterator,
    I::Item: Ord + std::fmt::Debug,
{
    type Item = I::Item;
    type Cursor = I;

    fn open(&mut self, k: usize) -> I {
        (self.0)(k)
    }

    fn advance(&mut self, cursor: &mut I) -> Option<I::Item> {
        cursor.next()
    }
}

struct Head<T, C> {
    value: T,
    k: usize,
    cursor: C,
}

impl<T: Ord, C> PartialEq for Head<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ord, C> Eq for Head<T, C> {}

impl<T: Ord, C> PartialOrd for Head<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord, C> Ord for Head<T, C> {
    // equal values come out in stream order
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.k.cmp(&other.k))
    }
}

enum Frontier<T, C> {
    Unopened(usize),
    Pending(Head<T, C>),
    Closed,
}

/// Sorted merge of an unbounded [`StreamFamily`].
pub struct KMerge<F: StreamFamily> {
    family: F,
    heap: BinaryHeap<Reverse<Head<F::Item, F::Cursor>>>,
    // first stream not yet in the heap
    frontier: Frontier<F::Item, F::Cursor>,
    admitted: usize,
}

impl<F: StreamFamily> KMerge<F> {
    pub fn new(family: F) -> Self {
        Self {
            family,
            heap: BinaryHeap::new(),
            frontier: Frontier::Unopened(0),
            admitted: 0,
        }
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    /// Number of streams that have been admitted into the merge.
    pub fn open_streams(&self) -> usize {
        self.admitted
    }

    fn open(&mut self, k: usize) -> Frontier<F::Item, F::Cursor> {
        let mut cursor = self.family.open(k);
        match self.family.advance(&mut cursor) {
            Some(value) => Frontier::Pending(Head { value, k, cursor }),
            None => {
                debug!(k, "stream family closed");
                Frontier::Closed
            }
        }
    }

    /// Moves pending streams into the heap while their head is not above the
    /// current minimum.
    fn admit(&mut self) {
        loop {
            if let Frontier::Unopened(k) = self.frontier {
                self.frontier = self.open(k);
            }
            let wanted = match (&self.frontier, self.heap.peek()) {
                (Frontier::Pending(head), Some(Reverse(top))) => head.value <= top.value,
                (Frontier::Pending(_), None) => true,
                _ => false,
            };
            if !wanted {
                return;
            }
            if let Frontier::Pending(head) = std::mem::replace(&mut self.frontier, Frontier::Closed)
            {
                debug!(k = head.k, head = ?head.value, "opening merge stream");
                self.admitted += 1;
                self.frontier = Frontier::Unopened(head.k + 1);
                self.heap.push(Reverse(head));
            }
        }
    }
}

impl<F: StreamFamily> Iterator for KMerge<F> {
    type Item = F::Item;

    fn next(&mut self) -> Option<F::Item> {
        self.admit();
        let Reverse(mut head) = self.heap.pop()?;
        match self.family.advance(&mut head.cursor) {
            Some(value) => {
                let out = std::mem::replace(&mut head.value, value);
                self.heap.push(Reverse(head));
                Some(out)
            }
            None => Some(head.value),
        }
    }
}
