// The oracle is its own divisor list: the sieve reads the primes it has
// already produced through the cached prefix handed to `Source::pull`.

use std::fmt::Debug;

use num_traits::{PrimInt, Unsigned};
use tracing::debug;

use crate::{
    error::Result,
    math::{
        algo::isqrt,
        seq::{Extent, LazySequence, SortedSequence, Source, sorted::SortedLazyVec},
    },
};

const SEED_PRIMES: &[u32] = &[2, 3];

/// Unsigned integer types the oracle can run on.
pub trait PG: PrimInt + Unsigned + From<u32> + Debug {}
impl<T: PrimInt + Unsigned + From<u32> + Debug> PG for T {}

// `T::from` alone is ambiguous against `NumCast::from`
#[inline]
pub(crate) fn c<T: From<u32>>(u: u32) -> T {
    T::from(u)
}

/// Odd candidates tested by trial division, in segments. Segment `top` covers
/// `[start, primes[top]^2)` and only needs the odd primes below `primes[top]`:
/// an odd composite under `primes[top]^2` has a prime factor at most
/// `primes[top - 1]`.
#[derive(Clone, Debug)]
pub struct TrialDivision<T> {
    start: T,
    top: usize,
    stop: Option<T>,
    // the last segment was clipped to T::max_value()
    capped: bool,
    finished: bool,
}

impl<T: PG> TrialDivision<T> {
    /// Expects to run behind the seed `[2, 3]`.
    pub fn new() -> Self {
        TrialDivision {
            start: c(5),
            top: 1,
            stop: None,
            capped: false,
            finished: false,
        }
    }

    fn open_segment(&mut self, primes: &[T]) -> T {
        let p = primes[self.top];
        let stop = match p.checked_mul(&p) {
            Some(sq) => sq,
            None => {
                self.capped = true;
                T::max_value()
            }
        };
        debug!(top = self.top, divisor = ?p, start = ?self.start, stop = ?stop, "sieve segment");
        self.stop = Some(stop);
        stop
    }

    fn close_segment(&mut self) {
        self.stop = None;
        self.top += 1;
        if self.capped {
            self.finished = true;
        }
    }
}

impl<T: PG> Default for TrialDivision<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PG> Source for TrialDivision<T> {
    type Item = T;

    fn pull(&mut self, primes: &[T]) -> Option<T> {
        let two: T = c(2);
        loop {
            if self.finished {
                return None;
            }
            let stop = match self.stop {
                Some(stop) => stop,
                None => self.open_segment(primes),
            };
            if self.start >= stop {
                self.close_segment();
                continue;
            }
            let n = self.start;
            match n.checked_add(&two) {
                Some(next) => self.start = next,
                None => self.finished = true,
            }
            // evens never show up, so 2 is skipped
            if primes[1..self.top].iter().all(|&p| n % p != T::zero()) {
                return Some(n);
            }
        }
    }
}

/// All primes, produced on demand and cached.
#[derive(Clone, Debug)]
pub struct PrimeOracle<T: PG> {
    seq: SortedLazyVec<TrialDivision<T>>,
}

impl<T: PG> PrimeOracle<T> {
    pub fn new() -> Self {
        let seed = SEED_PRIMES.iter().map(|&p| c(p)).collect();
        PrimeOracle {
            seq: SortedLazyVec::with_seed(seed, TrialDivision::new()),
        }
    }

    /// The `i`-th prime, counting from `primes[0] == 2`.
    pub fn nth(&mut self, i: usize) -> Result<T> {
        self.seq.get_index(i)
    }

    pub fn cached(&self) -> &[T] {
        self.seq.cached()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn last(&self) -> Option<T> {
        self.seq.last().copied()
    }

    /// Primality without growing the cache. Numbers past the largest known
    /// prime are trial divided by the cached primes up to their root, then by
    /// odd numbers beyond the cache.
    pub fn is_prime(&self, n: T) -> bool {
        let two: T = c(2);
        if n < two {
            return false;
        }
        if n % two == T::zero() {
            return n == two;
        }
        let primes = self.seq.cached();
        let last = match primes.last() {
            Some(&last) => last,
            None => two,
        };
        if n <= last {
            return primes.binary_search(&n).is_ok();
        }
        let root = isqrt(n);
        let cut = primes.partition_point(|&p| p <= root);
        if primes[..cut].iter().skip(1).any(|&p| n % p == T::zero()) {
            return false;
        }
        // one-shot: primes between the cache and the root are never cached
        let mut d = last + two;
        while d <= root {
            if n % d == T::zero() {
                return false;
            }
            d = d + two;
        }
        true
    }
}

impl<T: PG> Default for PrimeOracle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PG> LazySequence for PrimeOracle<T> {
    type Item = T;

    fn get_index(&mut self, i: usize) -> Result<T> {
        self.seq.get_index(i)
    }

    fn len(&self) -> usize {
        self.seq.len()
    }

    fn extent(&self) -> Extent {
        self.seq.extent()
    }
}

impl<T: PG> SortedSequence for PrimeOracle<T> {
    fn insert_position(&mut self, x: &T) -> Result<usize> {
        self.seq.insert_position(x)
    }

    fn contains(&mut self, x: &T) -> bool {
        self.is_prime(*x)
    }
}

#[cfg(test)]
mod tests {
    use fixedbitset::FixedBitSet;
    use proptest::prelude::*;

    use super::*;
    use crate::error::SeqError;

    fn naive_is_prime(n: u64) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    fn eratosthenes(n: usize) -> FixedBitSet {
        let mut composite = FixedBitSet::with_capacity(n + 1);
        composite.insert_range(..2.min(n + 1));
        for p in 2..=n {
            if p * p > n {
                break;
            }
            if !composite[p] {
                for m in (p * p..=n).step_by(p) {
                    composite.insert(m);
                }
            }
        }
        composite
    }

    #[test]
    fn test_first_primes() {
        let mut primes = PrimeOracle::<u64>::new();
        assert_eq!(
            primes.get_range(..10),
            Ok(vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29])
        );
    }

    #[test]
    fn test_first_hundred_primes() {
        let mut primes = PrimeOracle::<u32>::new();
        let got = primes.get_range(..100).unwrap();
        let cmp: Vec<u32> = vec![
            2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
            89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
            181, 191, 193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271,
            277, 281, 283, 293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379,
            383, 389, 397, 401, 409, 419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479,
            487, 491, 499, 503, 509, 521, 523, 541,
        ];
        assert_eq!(got, cmp);
    }

    #[test]
    fn test_sieve_matches_eratosthenes() {
        const N: usize = 200_000;
        let composite = eratosthenes(N);
        let want: Vec<u64> = (0..=N)
            .filter(|&i| !composite[i])
            .map(|i| i as u64)
            .collect();
        let mut primes = PrimeOracle::<u64>::new();
        let got: Vec<u64> = primes.iter().take_while(|&p| p <= N as u64).collect();
        assert_eq!(got, want);
        assert!(primes.seq.is_sorted());
    }

    #[test]
    fn test_contains_agrees_with_trial_division() {
        let mut fresh = PrimeOracle::<u64>::new();
        for n in 0..=10_000u64 {
            assert_eq!(fresh.contains(&n), naive_is_prime(n), "n = {n}");
        }
        // membership never grows the cache
        assert_eq!(fresh.len(), 2);

        let mut warm = PrimeOracle::<u64>::new();
        warm.nth(40).unwrap();
        for n in 0..=10_000u64 {
            assert_eq!(warm.contains(&n), naive_is_prime(n), "n = {n}");
        }
        assert_eq!(warm.len(), 41);
    }

    #[test]
    fn test_contains_squares_of_cached_primes() {
        let mut primes = PrimeOracle::<u64>::new();
        primes.nth(9).unwrap(); // ..= 29
        assert!(!primes.contains(&49));
        assert!(!primes.contains(&(29 * 29)));
        assert!(!primes.contains(&1024));
        assert!(primes.contains(&31));
    }

    #[test]
    fn test_mersenne() {
        let mut primes = PrimeOracle::<u64>::new();
        assert!(primes.contains(&(2u64.pow(31) - 1)));
        assert!(!primes.contains(&(2u64.pow(29) - 1)));
        assert!(PrimeOracle::<u32>::new().is_prime(2_147_483_647));
    }

    #[test]
    fn test_nth_and_index_of() {
        let mut primes = PrimeOracle::<u64>::new();
        assert_eq!(primes.nth(90_000), Ok(1_159_531));
        assert_eq!(primes.index_of(&1_159_531), Ok(90_000));
        assert_eq!(primes.len(), 90_001);
        assert_eq!(primes.last(), Some(1_159_531));
        assert_eq!(primes.index_of(&1_159_532), Err(SeqError::not_found(1_159_532u64)));
    }

    #[test]
    fn test_insert_position() {
        let mut primes = PrimeOracle::<u64>::new();
        primes.nth(3).unwrap();
        assert_eq!(primes.cached(), &[2, 3, 5, 7]);
        assert_eq!(primes.insert_position(&6), Ok(3));
        assert_eq!(primes.len(), 4);
        assert_eq!(primes.insert_position(&8), Ok(4));
        assert_eq!(primes.len(), 5);

        let mut copy = primes.clone();
        assert_eq!(copy.nth(5), Ok(13));
        assert_eq!((copy.len(), primes.len()), (6, 5));
    }

    #[test]
    fn test_u32_oracle_crosses_2_16() {
        let mut primes = PrimeOracle::<u32>::new();
        assert_eq!(primes.nth(6541), Ok(65521));
        assert_eq!(primes.nth(6542), Ok(65537));
        assert_eq!(primes.extent(), Extent::Unbounded);
    }

    proptest! {
        #[test]
        fn prop_is_prime_matches_naive(n in 0u64..5_000_000) {
            let primes = PrimeOracle::<u64>::new();
            prop_assert_eq!(primes.is_prime(n), naive_is_prime(n));
        }

        #[test]
        fn prop_cache_is_sorted_and_grows(ixs in prop::collection::vec(0usize..3_000, 1..20)) {
            let mut primes = PrimeOracle::<u64>::new();
            let mut len = primes.len();
            for i in ixs {
                let p = primes.nth(i).unwrap();
                prop_assert!(primes.len() >= len);
                prop_assert!(primes.len() > i);
                prop_assert_eq!(primes.cached()[i], p);
                len = primes.len();
            }
            prop_assert!(primes.seq.is_sorted());
        }
    }
}
