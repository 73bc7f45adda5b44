//! Equivalence tests between dependency sets and minimal cover construction.

use tracing::{debug, trace};

use crate::closure::closure;
use crate::schema::{Fd, FdSet, FieldSet};

/// Whether `fds` logically implies `fd`.
pub fn implies(fds: &FdSet, fd: &Fd) -> bool {
    fd.rhs.is_subset(&closure(&fd.lhs, fds))
}

/// Whether two dependency sets have the same closure for every schema.
pub fn equivalent(left: &FdSet, right: &FdSet) -> bool {
    right.iter().all(|fd| implies(left, fd)) && left.iter().all(|fd| implies(right, fd))
}

/// Whether `fd` can be dropped from `fds` without losing anything.
pub fn equivalent_after_removing(fds: &FdSet, fd: &Fd) -> bool {
    implies(&fds.without(fd), fd)
}

/// Whether swapping `old` for `new` leaves `fds` equivalent. `new` has to
/// follow from the original set and `old` from the substituted one.
pub fn equivalent_after_replacing(fds: &FdSet, old: &Fd, new: &Fd) -> bool {
    let replaced = fds.replacing(old, new.clone());
    implies(fds, new) && implies(&replaced, old)
}

/// Greedily drops every dependency that is redundant with respect to what is
/// left so far. The result depends on the canonical iteration order.
pub fn non_redundant(fds: &FdSet) -> FdSet {
    let mut result = fds.clone();
    for fd in fds {
        if equivalent_after_removing(&result, fd) {
            trace!(%fd, "dropping redundant dependency");
            result.remove(fd);
        }
    }
    result
}

/// Computes a minimal cover: singleton right-hand sides, first-fit left
/// reduction, then redundancy elimination.
pub fn minimal_cover(fds: &FdSet) -> FdSet {
    let mut result: FdSet = fds
        .iter()
        .flat_map(|fd| {
            fd.rhs
                .iter()
                .map(move |attribute| Fd::new(fd.lhs.clone(), FieldSet::from(attribute.clone())))
        })
        .collect();

    let singletons = result.clone();
    for fd in &singletons {
        if fd.lhs.len() < 2 {
            continue;
        }

        // First attribute whose removal keeps the set equivalent wins.
        let reduced = fd.lhs.iter().find_map(|attribute| {
            let candidate = Fd::new(fd.lhs.without(attribute), fd.rhs.clone());
            equivalent_after_replacing(&result, fd, &candidate).then(|| candidate)
        });

        if let Some(reduced) = reduced {
            trace!(from = %fd, to = %reduced, "reduced determinant");
            result = result.replacing(fd, reduced);
        }
    }

    let result = non_redundant(&result);
    debug!(input = fds.len(), output = result.len(), "computed minimal cover");
    result
}
