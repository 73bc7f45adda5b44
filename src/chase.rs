//! The chase test for lossless-join decompositions.
//!
//! The tableau has one row per relation and one column per attribute of the
//! universe. Every column keeps its own disjoint-set forest over row indices:
//! rows in the same class hold the same symbol, and a class flagged universal
//! holds the distinguished symbol.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{FdError, Result};
use crate::schema::{Attribute, Fd, FdSet, FieldSet};
use crate::unionfind::DisjointSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Universal,
    Tag(usize),
}

#[derive(Clone, Debug)]
struct Column {
    classes: DisjointSet,
    /// Indexed by class root.
    universal: Vec<bool>,
}

impl Column {
    fn new(universal: Vec<bool>) -> Self {
        Self {
            classes: DisjointSet::new(universal.len()),
            universal,
        }
    }

    fn cell(&mut self, row: usize) -> Cell {
        let root = self.classes.find(row);
        if self.universal[root] {
            Cell::Universal
        } else {
            Cell::Tag(root)
        }
    }

    /// Makes the cells of rows `a` and `b` equal, returning whether anything
    /// changed.
    fn homogenize(&mut self, a: usize, b: usize) -> bool {
        match (self.cell(a), self.cell(b)) {
            (Cell::Universal, Cell::Universal) => false,
            (Cell::Tag(x), Cell::Tag(y)) if x == y => false,
            (Cell::Universal, Cell::Tag(tag)) | (Cell::Tag(tag), Cell::Universal) => {
                self.universal[tag] = true;
                true
            }
            (Cell::Tag(x), Cell::Tag(y)) => self.classes.union(x, y).is_some(),
        }
    }
}

#[derive(Clone, Debug)]
struct Tableau {
    rows: usize,
    offsets: HashMap<Attribute, usize>,
    columns: Vec<Column>,
}

impl Tableau {
    fn new(universe: &FieldSet, relations: &[FieldSet]) -> Self {
        let offsets = universe
            .iter()
            .enumerate()
            .map(|(offset, attribute)| (attribute.clone(), offset))
            .collect();
        let columns = universe
            .iter()
            .map(|attribute| {
                Column::new(
                    relations
                        .iter()
                        .map(|relation| relation.contains(attribute))
                        .collect(),
                )
            })
            .collect();

        Self {
            rows: relations.len(),
            offsets,
            columns,
        }
    }

    fn column(&mut self, attribute: &Attribute) -> &mut Column {
        let offset = self.offsets[attribute];
        &mut self.columns[offset]
    }

    #[cfg(test)]
    fn cell(&mut self, row: usize, attribute: &Attribute) -> Cell {
        self.column(attribute).cell(row)
    }

    fn rows_agree(&mut self, a: usize, b: usize, attributes: &FieldSet) -> bool {
        attributes.iter().all(|attribute| {
            let column = self.column(attribute);
            column.cell(a) == column.cell(b)
        })
    }

    fn homogenize(&mut self, a: usize, b: usize, attributes: &FieldSet) -> bool {
        let mut changed = false;
        for attribute in attributes {
            changed |= self.column(attribute).homogenize(a, b);
        }
        changed
    }

    /// Applies one dependency to every pair of rows.
    fn apply(&mut self, fd: &Fd) -> bool {
        let mut changed = false;
        for a in 0..self.rows {
            for b in a + 1..self.rows {
                if self.rows_agree(a, b, &fd.lhs) && self.homogenize(a, b, &fd.rhs) {
                    trace!(%fd, a, b, "homogenized rows");
                    changed = true;
                }
            }
        }
        changed
    }

    /// Runs to a fixed point, restarting from the first dependency after every
    /// change.
    fn chase(&mut self, fds: &FdSet) {
        let mut passes = 0;
        while fds.iter().any(|fd| self.apply(fd)) {
            passes += 1;
        }
        trace!(passes, "chase reached fixed point");
    }

    fn has_universal_row(&mut self) -> bool {
        let rows = self.rows;
        let columns = &mut self.columns;
        (0..rows).any(|row| {
            columns
                .iter_mut()
                .all(|column| column.cell(row) == Cell::Universal)
        })
    }
}

/// Decides whether the natural join of `relations` always reconstructs the
/// universal relation under `fds`.
pub fn is_lossless(universe: &FieldSet, fds: &FdSet, relations: &[FieldSet]) -> Result<bool> {
    fds.ensure_within(universe)?;
    if relations.is_empty() {
        return Err(FdError::InvalidInput(
            "decomposition has no relations".to_owned(),
        ));
    }
    if let Some(relation) = relations.iter().find(|r| !r.is_subset(universe)) {
        return Err(FdError::InvalidInput(format!(
            "relation {} is not part of the universe {}",
            relation, universe
        )));
    }

    Ok(chase_lossless(universe, fds, relations))
}

/// Unvalidated chase; an empty decomposition is never lossless.
pub(crate) fn chase_lossless(universe: &FieldSet, fds: &FdSet, relations: &[FieldSet]) -> bool {
    let mut tableau = Tableau::new(universe, relations);
    tableau.chase(fds);
    let lossless = tableau.has_universal_row();
    debug!(
        attributes = universe.len(),
        relations = relations.len(),
        lossless,
        "chase finished"
    );
    lossless
}
