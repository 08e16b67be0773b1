use crate::math::primes::PrimeOracle;

crate::command!((count: Option<usize>, index: Option<usize>) {
    let mut primes = PrimeOracle::<u64>::new();
    super::listing(&mut primes, "p", count, index)?
});
