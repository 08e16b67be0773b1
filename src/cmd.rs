//! Commands reachable from the binary. Each module declares one command with
//! [`command!`](crate::command) and is listed in the registry in `infra`.

use std::fmt::Display;

use itertools::Itertools;

use crate::{error::Result, math::seq::LazySequence};

pub mod fd_index;
pub mod fermi_dirac;
pub mod isprime;
pub mod primes;

const DEFAULT_COUNT: usize = 20;

/// `[a, b, ...]` for the first `count` terms, then `name[index] = x` when an
/// index is asked for. With neither, lists the first `DEFAULT_COUNT` terms.
pub(crate) fn listing<Q>(
    seq: &mut Q,
    name: &str,
    count: Option<usize>,
    index: Option<usize>,
) -> Result<String>
where
    Q: LazySequence + ?Sized,
    Q::Item: Display,
{
    let mut parts = vec![];
    if count.is_some() || index.is_none() {
        let head = seq.get_range(..count.unwrap_or(DEFAULT_COUNT))?;
        parts.push(format!("[{}]", head.iter().join(", ")));
    }
    if let Some(i) = index {
        parts.push(format!("{name}[{i}] = {}", seq.get(i)?));
    }
    Ok(parts.join("; "))
}
