pub mod algo;
pub mod fermi_dirac;
pub mod primes;
pub mod seq;
