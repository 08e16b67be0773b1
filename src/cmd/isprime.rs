use anyhow::ensure;
use itertools::Itertools;

use crate::math::primes::PrimeOracle;

crate::command!((n: Vec<u64>) {
    ensure!(!n.is_empty(), "expected at least one `--n`");
    let primes = PrimeOracle::<u64>::new();
    n.iter()
        .map(|&x| format!("{x}: {}", if primes.is_prime(x) { "prime" } else { "composite" }))
        .join(", ")
});
