use crate::math::fermi_dirac::fermi_dirac;

crate::command!((count: Option<usize>, index: Option<usize>) {
    let mut fd = fermi_dirac::<u64>();
    let out = super::listing(&mut fd, "fd", count, index)?;
    tracing::debug!(cached = fd.len(), streams = fd.open_streams(), "done");
    out
});
