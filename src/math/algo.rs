use num_traits::PrimInt;

/// Floor of the square root, by Newton iteration from a power of two above
/// the root. Never overflows: the first guess is at most 2^ceil(bits / 2).
pub fn isqrt<T: PrimInt>(n: T) -> T {
    let two = T::one() + T::one();
    if n < two {
        return n;
    }
    let bits = (T::zero().count_zeros() - n.leading_zeros()) as usize;
    let mut x = T::one() << bits.div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// `x^(2^k)` by squaring `k` times, or `None` once it no longer fits.
pub fn checked_square_n<T: PrimInt>(x: T, k: u32) -> Option<T> {
    let mut acc = x;
    for _ in 0..k {
        acc = acc.checked_mul(&acc)?;
    }
    Some(acc)
}
