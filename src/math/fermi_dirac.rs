//! Fermi-Dirac powers: numbers `p^(2^k)` with `p` prime and `k >= 0`, in
//! ascending order.
//!
//! Stream `k` runs over `p^(2^k)` for every prime, so it starts at `2^(2^k)`
//! and the family satisfies the [`StreamFamily`] contract. All streams share
//! one [`PrimeOracle`], owned by the family.

use crate::math::{
    algo::checked_square_n,
    primes::{PG, PrimeOracle},
    seq::{
        Pull,
        merge::{KMerge, StreamFamily},
        sorted::SortedLazyVec,
    },
};

/// Position within stream `k`: the next prime index to raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerCursor {
    k: u32,
    pos: usize,
}

pub struct PowerFamily<T: PG> {
    primes: PrimeOracle<T>,
}

impl<T: PG> PowerFamily<T> {
    pub fn new(primes: PrimeOracle<T>) -> Self {
        Self { primes }
    }

    pub fn primes(&self) -> &PrimeOracle<T> {
        &self.primes
    }
}

impl<T: PG> StreamFamily for PowerFamily<T> {
    type Item = T;
    type Cursor = PowerCursor;

    fn open(&mut self, k: usize) -> PowerCursor {
        PowerCursor {
            k: u32::try_from(k).unwrap_or(u32::MAX),
            pos: 0,
        }
    }

    // a stream ends at its first power that does not fit in T
    fn advance(&mut self, cursor: &mut PowerCursor) -> Option<T> {
        let p = self.primes.nth(cursor.pos).ok()?;
        cursor.pos += 1;
        checked_square_n(p, cursor.k)
    }
}

pub type FermiDirac<T> = SortedLazyVec<Pull<KMerge<PowerFamily<T>>>>;

/// The Fermi-Dirac powers representable in `T`, as a sorted lazy sequence
/// with its own prime oracle.
pub fn fermi_dirac<T: PG>() -> FermiDirac<T> {
    SortedLazyVec::new(KMerge::new(PowerFamily::new(PrimeOracle::new())))
}

impl<T: PG> SortedLazyVec<Pull<KMerge<PowerFamily<T>>>> {
    /// The oracle behind every stream.
    pub fn primes(&self) -> &PrimeOracle<T> {
        self.source().get_ref().family().primes()
    }

    /// How many primes the streams have pulled so far.
    pub fn primes_consumed(&self) -> usize {
        self.primes().len()
    }

    pub fn open_streams(&self) -> usize {
        self.source().get_ref().open_streams()
    }
}
