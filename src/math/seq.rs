use std::fmt;

use crate::error::{Result, SeqError};

pub mod lazy;
pub mod merge;
pub mod sorted;

/// A forward-only producer of values. Each call to `pull` hands over the
/// prefix produced so far, in order, so a generator may consult its own
/// earlier output (the prime sieve reads its trial divisors this way).
///
/// Returning `None` means the source is finished; callers never pull again.
pub trait Source {
    type Item;

    fn pull(&mut self, cached: &[Self::Item]) -> Option<Self::Item>;

    /// Bounds on the number of values still to come, as in
    /// [`Iterator::size_hint`].
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Adapts any iterator into a [`Source`] that ignores the cached prefix.
#[derive(Clone, Debug)]
pub struct Pull<I>(pub I);

impl<I> Pull<I> {
    pub fn get_ref(&self) -> &I {
        &self.0
    }
}

impl<I: Iterator> Source for Pull<I> {
    type Item = I::Item;

    #[inline(always)]
    fn pull(&mut self, _cached: &[I::Item]) -> Option<I::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// Known length of a lazy sequence, or the lack of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Exact(usize),
    AtMost(usize),
    Unbounded,
}

/// Index set of a slice over an unbounded sequence, with `start:stop:step` slice
/// semantics. `stop == None` means there is no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Option<usize>,
    pub stop: Option<usize>,
    pub step: isize,
}

impl Span {
    pub fn new(start: usize, stop: Option<usize>) -> Self {
        Span {
            start: Some(start),
            stop,
            step: 1,
        }
    }

    pub fn full() -> Self {
        Span {
            start: None,
            stop: None,
            step: 1,
        }
    }

    pub fn step(self, step: isize) -> Self {
        Span { step, ..self }
    }

    pub fn is_bounded(&self) -> bool {
        if self.step > 0 {
            self.stop.is_some()
        } else {
            // walking down always terminates at 0
            true
        }
    }

    /// Realizes the index set. A descending span needs an explicit start,
    /// since an unbounded range has no last index to walk down from.
    pub fn indices(&self) -> Result<SpanIndices> {
        if self.step == 0 {
            return Err(SeqError::invalid_index("slice step cannot be zero"));
        }
        let next = match (self.start, self.step > 0) {
            (Some(start), _) => Some(start),
            (None, true) => Some(0),
            (None, false) => {
                return Err(SeqError::invalid_index(
                    "a descending slice over an unbounded sequence needs a start",
                ));
            }
        };
        Ok(SpanIndices {
            next,
            stop: self.stop,
            step: self.step,
        })
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Span::new(r.start, Some(r.end))
    }
}

impl From<std::ops::RangeFrom<usize>> for Span {
    fn from(r: std::ops::RangeFrom<usize>) -> Self {
        Span::new(r.start, None)
    }
}

impl From<std::ops::RangeTo<usize>> for Span {
    fn from(r: std::ops::RangeTo<usize>) -> Self {
        Span::new(0, Some(r.end))
    }
}

impl From<std::ops::RangeFull> for Span {
    fn from(_: std::ops::RangeFull) -> Self {
        Span::full()
    }
}

#[derive(Debug, Clone)]
pub struct SpanIndices {
    next: Option<usize>,
    stop: Option<usize>,
    step: isize,
}

impl Iterator for SpanIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let cur = self.next?;
        let in_bounds = match (self.stop, self.step > 0) {
            (None, _) => true,
            (Some(stop), true) => cur < stop,
            (Some(stop), false) => cur > stop,
        };
        if !in_bounds {
            self.next = None;
            return None;
        }
        self.next = if self.step > 0 {
            cur.checked_add(self.step.unsigned_abs())
        } else {
            cur.checked_sub(self.step.unsigned_abs())
        };
        Some(cur)
    }
}

/// Randomly indexable view over a lazily produced stream. Every value is
/// produced once and memoized; reading at or below the frontier is free.
pub trait LazySequence {
    type Item: Clone;

    /// Value at `i`, advancing the source as far as needed.
    fn get_index(&mut self, i: usize) -> Result<Self::Item>;

    /// Number of values produced so far.
    fn len(&self) -> usize;

    fn extent(&self) -> Extent;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Like [`get_index`](Self::get_index) but accepts any integer; negative
    /// or unrepresentable indices fail without touching the source.
    fn get<N>(&mut self, i: N) -> Result<Self::Item>
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        let ix = i
            .try_into()
            .map_err(|_| SeqError::invalid_index(format!("{i} is not a valid position")))?;
        self.get_index(ix)
    }

    /// Lazily realized slice. Over an unbounded span the iterator ends when a
    /// finite source runs dry; over a bounded one that is an error.
    fn range(&mut self, span: impl Into<Span>) -> Result<Range<'_, Self>> {
        let span = span.into();
        Ok(Range {
            indices: span.indices()?,
            bounded: span.is_bounded(),
            seq: self,
            done: false,
        })
    }

    /// Collected slice. Collecting an unbounded span of an infinite source
    /// never returns.
    fn get_range(&mut self, span: impl Into<Span>) -> Result<Vec<Self::Item>> {
        self.range(span)?.collect()
    }

    /// Iterator-style slice: `islice(start, stop, step)`.
    fn islice(&mut self, start: usize, stop: Option<usize>, step: isize) -> Result<Range<'_, Self>> {
        self.range(Span::new(start, stop).step(step))
    }

    /// Replays the cache, then keeps pulling. Every call starts over at 0.
    fn iter(&mut self) -> Iter<'_, Self> {
        Iter { seq: self, pos: 0 }
    }
}

/// Membership queries over a non-decreasing lazy sequence.
pub trait SortedSequence: LazySequence<Item: Ord> {
    /// Leftmost position at which `x` keeps the sequence sorted. May advance
    /// the source until a value `>= x` shows up.
    fn insert_position(&mut self, x: &Self::Item) -> Result<usize>;

    fn contains(&mut self, x: &Self::Item) -> bool {
        match self.insert_position(x) {
            Ok(ix) => self.get_index(ix).is_ok_and(|y| y == *x),
            Err(_) => false,
        }
    }

    fn index_of(&mut self, x: &Self::Item) -> Result<usize>
    where
        Self::Item: fmt::Debug,
    {
        let ix = match self.insert_position(x) {
            Ok(ix) => ix,
            Err(SeqError::ExhaustedSource { .. }) => return Err(SeqError::not_found(x)),
            Err(e) => return Err(e),
        };
        if self.get_index(ix)? == *x {
            Ok(ix)
        } else {
            Err(SeqError::not_found(x))
        }
    }
}

pub struct Iter<'a, Q: ?Sized> {
    seq: &'a mut Q,
    pos: usize,
}

impl<Q: LazySequence + ?Sized> Iterator for Iter<'_, Q> {
    type Item = Q::Item;

    fn next(&mut self) -> Option<Q::Item> {
        let out = self.seq.get_index(self.pos).ok()?;
        self.pos += 1;
        Some(out)
    }
}

pub struct Range<'a, Q: ?Sized> {
    seq: &'a mut Q,
    indices: SpanIndices,
    bounded: bool,
    done: bool,
}

impl<Q: LazySequence + ?Sized> Iterator for Range<'_, Q> {
    type Item = Result<Q::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let ix = self.indices.next()?;
        match self.seq.get_index(ix) {
            Ok(x) => Some(Ok(x)),
            Err(SeqError::ExhaustedSource { .. }) if !self.bounded => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// An independent read position over a shared sequence. Two cursors over the
/// same sequence each see whatever the other has already produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next<Q: LazySequence + ?Sized>(&mut self, seq: &mut Q) -> Option<Q::Item> {
        let out = seq.get_index(self.pos).ok()?;
        self.pos += 1;
        Some(out)
    }
}
