use tracing::trace;

use super::{Extent, LazySequence, Pull, Source};
use crate::error::{Result, SeqError};

/// Append-only memo over a [`Source`]. `buf[i]` is the i-th value the source
/// ever produced; asking past the end pulls exactly the missing values.
#[derive(Clone, Debug)]
pub struct LazyVec<S: Source> {
    src: S,
    buf: Vec<S::Item>,
    exhausted: bool,
}

impl<I> LazyVec<Pull<I>>
where
    I: Iterator,
{
    pub fn new(src: I) -> Self {
        Self::with_source(Pull(src))
    }
}

impl<S: Source> LazyVec<S> {
    pub fn with_source(src: S) -> Self {
        Self::with_seed(Vec::new(), src)
    }

    /// Starts from an already known prefix; the source continues after it.
    pub fn with_seed(seed: Vec<S::Item>, src: S) -> Self {
        Self {
            src,
            buf: seed,
            exhausted: false,
        }
    }

    /// Pulls exactly one more value and appends it.
    pub fn produce_next(&mut self) -> Result<&S::Item> {
        if !self.exhausted {
            if let Some(x) = self.src.pull(&self.buf) {
                self.buf.push(x);
                return Ok(&self.buf[self.buf.len() - 1]);
            }
            trace!(produced = self.buf.len(), "lazy source exhausted");
            self.exhausted = true;
        }
        Err(SeqError::ExhaustedSource {
            produced: self.buf.len(),
        })
    }

    /// Ensure at least `n` elements are cached. Returns false if source ends.
    pub fn ensure_len(&mut self, n: usize) -> bool {
        while self.buf.len() < n {
            if self.produce_next().is_err() {
                return false;
            }
        }
        true
    }

    /// Random access that grows on demand.
    #[inline(always)]
    pub fn at(&mut self, i: usize) -> Result<&S::Item> {
        // usize::MAX is a position no source can reach
        if i.checked_add(1).is_some_and(|n| self.ensure_len(n)) {
            Ok(&self.buf[i])
        } else {
            Err(SeqError::ExhaustedSource {
                produced: self.buf.len(),
            })
        }
    }

    /// Current cached prefix as a slice (no growth).
    pub fn cached(&self) -> &[S::Item] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn last(&self) -> Option<&S::Item> {
        self.buf.last()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn source(&self) -> &S {
        &self.src
    }
}

impl<S> LazySequence for LazyVec<S>
where
    S: Source,
    S::Item: Clone,
{
    type Item = S::Item;

    fn get_index(&mut self, i: usize) -> Result<S::Item> {
        self.at(i).cloned()
    }

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn extent(&self) -> Extent {
        if self.exhausted {
            return Extent::Exact(self.buf.len());
        }
        match self.src.size_hint() {
            (lo, Some(hi)) if lo == hi => Extent::Exact(self.buf.len() + hi),
            (_, Some(hi)) => Extent::AtMost(self.buf.len() + hi),
            (_, None) => Extent::Unbounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::math::seq::{Cursor, Span};

    #[test]
    fn test_get_grows_on_demand() {
        let mut squares = LazyVec::new((0u64..).map(|i| i * i));
        assert_eq!(squares.len(), 0);
        assert_eq!(squares.get(5), Ok(25));
        assert_eq!(squares.len(), 6);
        assert_eq!(squares.get(2), Ok(4));
        assert_eq!(squares.len(), 6);
        assert_eq!(squares.cached(), &[0, 1, 4, 9, 16, 25]);
    }

    #[test]
    fn test_each_value_produced_once() {
        let calls = Cell::new(0usize);
        let mut seq = LazyVec::new((0u32..).inspect(|_| calls.set(calls.get() + 1)));
        for i in [3usize, 1, 7, 7, 0, 4] {
            assert_eq!(seq.get(i), Ok(i as u32));
        }
        assert_eq!(calls.get(), 8);
        let _ = seq.get_range(0..8).unwrap();
        assert_eq!(calls.get(), 8);
    }

    #[test]
    fn test_negative_index_touches_nothing() {
        let mut seq = LazyVec::new(0u32..);
        assert!(matches!(seq.get(-1), Err(SeqError::InvalidIndex(_))));
        assert!(matches!(seq.get(-3i64), Err(SeqError::InvalidIndex(_))));
        assert_eq!(seq.len(), 0);
    }

    #[test]
    fn test_finite_source_exhausts() {
        let mut seq = LazyVec::new([10, 20, 30].into_iter());
        assert_eq!(
            seq.get(5),
            Err(SeqError::ExhaustedSource { produced: 3 })
        );
        // everything produced before exhaustion is kept
        assert_eq!(seq.cached(), &[10, 20, 30]);
        assert!(seq.is_exhausted());
        assert_eq!(seq.get(2), Ok(30));
        assert_eq!(
            seq.produce_next().unwrap_err(),
            SeqError::ExhaustedSource { produced: 3 }
        );
    }

    #[test]
    fn test_produce_next() {
        let mut seq = LazyVec::new("abc".chars());
        assert_eq!(seq.produce_next(), Ok(&'a'));
        assert_eq!(seq.produce_next(), Ok(&'b'));
        assert_eq!(seq.get(0), Ok('a'));
        assert_eq!(seq.last(), Some(&'b'));
    }

    #[test]
    fn test_seeded() {
        let mut seq = LazyVec::with_seed(vec![1, 1], Pull((2..).map(|i| i * 10)));
        assert_eq!(seq.get_range(..4), Ok(vec![1, 1, 20, 30]));
    }

    #[test]
    fn test_slices() {
        let mut seq = LazyVec::new((0u64..).map(|i| i * i));
        assert_eq!(seq.get_range(..5), Ok(vec![0, 1, 4, 9, 16]));
        assert_eq!(seq.get_range(Span::new(2, Some(9)).step(3)), Ok(vec![4, 25, 64]));
        assert_eq!(
            seq.get_range(Span::new(4, None).step(-1)),
            Ok(vec![16, 9, 4, 1, 0])
        );
        assert_eq!(seq.get_range(Span::new(6, Some(2)).step(-2)), Ok(vec![36, 16]));
        assert!(seq.get_range(Span::full().step(-1)).is_err());
        let firsts: Vec<u64> = seq
            .islice(10, None, 10)
            .unwrap()
            .take(3)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(firsts, vec![100, 400, 900]);
    }

    #[test]
    fn test_slices_over_finite_source() {
        let mut seq = LazyVec::new(1..=4);
        assert_eq!(seq.get_range(1..), Ok(vec![2, 3, 4]));
        assert_eq!(
            seq.get_range(2..9),
            Err(SeqError::ExhaustedSource { produced: 4 })
        );
    }

    #[test]
    fn test_iteration_replays_then_extends() {
        let mut seq = LazyVec::new(0u32..);
        seq.get(3).unwrap();
        let first: Vec<u32> = seq.iter().take(6).collect();
        assert_eq!(first, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(seq.len(), 6);
        let again: Vec<u32> = seq.iter().take(2).collect();
        assert_eq!(again, vec![0, 1]);

        let mut finite = LazyVec::new(0..3);
        assert_eq!(finite.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cursors_share_growth() {
        let calls = Cell::new(0usize);
        let mut seq = LazyVec::new((0u32..).inspect(|_| calls.set(calls.get() + 1)));
        let (mut a, mut b) = (Cursor::new(), Cursor::new());
        assert_eq!(a.next(&mut seq), Some(0));
        assert_eq!(a.next(&mut seq), Some(1));
        assert_eq!(b.next(&mut seq), Some(0));
        assert_eq!(b.next(&mut seq), Some(1));
        assert_eq!(b.next(&mut seq), Some(2));
        assert_eq!(a.next(&mut seq), Some(2));
        assert_eq!(calls.get(), 3);
        assert_eq!((a.position(), b.position()), (3, 3));
    }

    #[test]
    fn test_extent() {
        let mut seq = LazyVec::new([1, 2, 3].into_iter());
        assert_eq!(seq.extent(), Extent::Exact(3));
        seq.get(1).unwrap();
        assert_eq!(seq.extent(), Extent::Exact(3));
        let filtered = LazyVec::new((0..10).filter(|x| x % 2 == 0));
        assert_eq!(filtered.extent(), Extent::AtMost(10));
        let bytes = LazyVec::new(0u8..=255u8);
        assert_eq!(bytes.extent(), Extent::Exact(256));
        let unbounded = LazyVec::new((0u64..).map(|x| x + 1));
        assert_eq!(unbounded.extent(), Extent::Unbounded);
    }

    #[test]
    fn test_last_position_is_exhausted_not_a_panic() {
        let mut seq = LazyVec::new([1u8, 2, 3].into_iter());
        assert_eq!(
            seq.get(usize::MAX),
            Err(SeqError::ExhaustedSource { produced: 3 })
        );
        assert_eq!(seq.cached(), &[1, 2, 3]);
        assert!(seq.is_exhausted());

        // nothing is pulled for a position no source can reach
        let mut endless = LazyVec::new(0u32..);
        assert_eq!(
            endless.get(usize::MAX),
            Err(SeqError::ExhaustedSource { produced: 0 })
        );
        assert_eq!(endless.len(), 0);
    }
}
