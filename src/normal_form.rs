use itertools::Itertools;
use tracing::debug;

use crate::chase::chase_lossless;
use crate::closure::candidate_key;
use crate::cover::minimal_cover;
use crate::error::Result;
use crate::schema::{FdSet, FieldSet};

/// Synthesizes a dependency-preserving, lossless-join 3NF decomposition.
///
/// One relation is produced per distinct determinant of the minimal cover.
/// Attributes no dependency mentions are gathered into a remainder relation,
/// which also receives a candidate key when the grouped relations alone are
/// lossy.
pub fn synthesize_3nf(universe: &FieldSet, fds: &FdSet) -> Result<Vec<FieldSet>> {
    fds.ensure_within(universe)?;

    let cover = minimal_cover(fds);
    let remainder = universe.difference(&cover.attributes());

    let groups = cover.iter().group_by(|fd| fd.lhs.clone());
    let mut relations: Vec<FieldSet> = groups
        .into_iter()
        .map(|(lhs, group)| {
            let mut relation = lhs;
            for fd in group {
                relation.extend(&fd.rhs);
            }
            relation
        })
        .collect();

    let lossless = chase_lossless(universe, fds, &relations);
    if !lossless {
        let key = candidate_key(universe, fds)?;
        relations.push(remainder.union(&key));
    } else if !remainder.is_empty() {
        relations.push(remainder);
    }

    debug!(
        relations = relations.len(),
        grouped_lossless = lossless,
        "synthesized 3NF decomposition"
    );
    Ok(relations)
}
