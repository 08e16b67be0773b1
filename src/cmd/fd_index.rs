use anyhow::Context;

use crate::math::{fermi_dirac::fermi_dirac, seq::SortedSequence};

crate::command!((value: u64) {
    let mut fd = fermi_dirac::<u64>();
    fd.index_of(&value)
        .with_context(|| format!("looking up {value} among the Fermi-Dirac powers"))?
        .to_string()
});
