pub use crate::error::{Result, SeqError};
pub use crate::math::fermi_dirac::{FermiDirac, fermi_dirac};
pub use crate::math::primes::PrimeOracle;
pub use crate::math::seq::{
    Cursor, Extent, LazySequence, Pull, SortedSequence, Source, Span,
    lazy::LazyVec,
    merge::{FnFamily, KMerge, Merge2, MergeSorted, StreamFamily},
    sorted::SortedLazyVec,
};
