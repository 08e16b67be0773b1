//! Lazy memoized sequences over forward-only generators, with two
//! generators built on them: an incremental prime oracle and the
//! Fermi-Dirac powers `p^(2^k)`.

pub mod cmd;
pub mod error;
pub mod infra;
pub mod math;
pub mod prelude;
