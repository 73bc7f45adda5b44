use tracing::{debug, trace};

use crate::error::Result;
use crate::schema::{FdSet, FieldSet};

/// Computes the attribute closure of `set` under `fds`.
///
/// Dependencies are scanned in canonical order and the scan restarts after
/// every application, so traces are reproducible. Dependencies with an empty
/// determinant never fire.
pub fn closure(set: &FieldSet, fds: &FdSet) -> FieldSet {
    let mut result = set.clone();

    while let Some(fd) = fds.iter().find(|fd| {
        !fd.lhs.is_empty() && fd.lhs.is_subset(&result) && !fd.rhs.is_subset(&result)
    }) {
        trace!(%fd, "closure grows");
        result.extend(&fd.rhs);
    }

    result
}

/// Finds one candidate key of `universe` by dropping attributes left to right
/// while the closure still covers the whole universe.
///
/// The key is irreducible but not necessarily the smallest one.
pub fn candidate_key(universe: &FieldSet, fds: &FdSet) -> Result<FieldSet> {
    fds.ensure_within(universe)?;

    let mut key = universe.clone();
    for attribute in universe {
        key.remove(attribute);
        if closure(&key, fds) != *universe {
            key.insert(attribute.clone());
        }
    }

    debug!(%universe, %key, "derived candidate key");
    Ok(key)
}
