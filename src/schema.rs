use std::collections::{btree_set, BTreeSet};
use std::fmt;

use itertools::Itertools;

use crate::error::{FdError, Result};

/// A named column of a relation schema.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribute(String);

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn is_letter(&self) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered, deduplicated set of attributes.
///
/// Iteration follows the attributes' natural order, which is what every
/// greedy algorithm in this crate traverses.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldSet(BTreeSet<Attribute>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.0.contains(attribute)
    }

    pub fn insert(&mut self, attribute: Attribute) -> bool {
        self.0.insert(attribute)
    }

    pub fn remove(&mut self, attribute: &Attribute) -> bool {
        self.0.remove(attribute)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn is_subset(&self, other: &FieldSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn union(&self, other: &FieldSet) -> FieldSet {
        self.0.union(&other.0).cloned().collect()
    }

    pub fn intersection(&self, other: &FieldSet) -> FieldSet {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn difference(&self, other: &FieldSet) -> FieldSet {
        self.0.difference(&other.0).cloned().collect()
    }

    /// A copy of this set with one attribute taken out.
    pub fn without(&self, attribute: &Attribute) -> FieldSet {
        let mut set = self.clone();
        set.remove(attribute);
        set
    }
}

impl FromIterator<Attribute> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Attribute> for FieldSet {
    fn extend<I: IntoIterator<Item = Attribute>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<'a> Extend<&'a Attribute> for FieldSet {
    fn extend<I: IntoIterator<Item = &'a Attribute>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().cloned())
    }
}

impl IntoIterator for FieldSet {
    type Item = Attribute;
    type IntoIter = btree_set::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Attribute;
    type IntoIter = btree_set::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<const N: usize> From<[&str; N]> for FieldSet {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().map(Attribute::from).collect()
    }
}

impl From<Attribute> for FieldSet {
    fn from(attribute: Attribute) -> Self {
        std::iter::once(attribute).collect()
    }
}

impl fmt::Display for FieldSet {
    /// Single-letter schemas print compactly (`ABC`), anything else braced
    /// (`{emp_id,name}`), so the output always parses back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_empty() && self.iter().all(Attribute::is_letter) {
            write!(f, "{}", self.iter().join(""))
        } else {
            write!(f, "{{{}}}", self.iter().join(","))
        }
    }
}

/// A functional dependency `lhs -> rhs`.
///
/// No normalization happens here: `A -> BC` and the pair `A -> B`, `A -> C`
/// are different values.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fd {
    pub lhs: FieldSet,
    pub rhs: FieldSet,
}

impl Fd {
    pub fn new(lhs: impl Into<FieldSet>, rhs: impl Into<FieldSet>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn attributes(&self) -> FieldSet {
        self.lhs.union(&self.rhs)
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lhs, self.rhs)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FdSet(BTreeSet<Fd>);

impl FdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, fd: &Fd) -> bool {
        self.0.contains(fd)
    }

    pub fn insert(&mut self, fd: Fd) -> bool {
        self.0.insert(fd)
    }

    pub fn remove(&mut self, fd: &Fd) -> bool {
        self.0.remove(fd)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Fd> {
        self.0.iter()
    }

    pub fn without(&self, fd: &Fd) -> FdSet {
        let mut set = self.clone();
        set.remove(fd);
        set
    }

    /// A copy of this set with `old` swapped out for `new`.
    pub fn replacing(&self, old: &Fd, new: Fd) -> FdSet {
        let mut set = self.without(old);
        set.insert(new);
        set
    }

    /// Every attribute mentioned on either side of any dependency.
    pub fn attributes(&self) -> FieldSet {
        let mut attributes = FieldSet::new();
        for fd in self {
            attributes.extend(&fd.lhs);
            attributes.extend(&fd.rhs);
        }
        attributes
    }

    /// Checks that every dependency has a determinant and stays inside
    /// `universe`.
    pub fn ensure_within(&self, universe: &FieldSet) -> Result<()> {
        for fd in self {
            if fd.lhs.is_empty() {
                return Err(FdError::InvalidInput(format!(
                    "dependency `{}` has an empty determinant",
                    fd
                )));
            }
            let outside = fd.attributes().difference(universe);
            if !outside.is_empty() {
                return Err(FdError::InvalidInput(format!(
                    "dependency `{}` mentions {} outside of the universe {}",
                    fd, outside, universe
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<Fd> for FdSet {
    fn from_iter<I: IntoIterator<Item = Fd>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Fd> for FdSet {
    fn extend<I: IntoIterator<Item = Fd>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for FdSet {
    type Item = Fd;
    type IntoIter = btree_set::IntoIter<Fd>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FdSet {
    type Item = &'a Fd;
    type IntoIter = btree_set::Iter<'a, Fd>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fd in self {
            writeln!(f, "{}", fd)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_set_algebra() {
        let abc = FieldSet::from(["A", "B", "C"]);
        let bd = FieldSet::from(["B", "D"]);

        assert_eq!(abc.union(&bd), FieldSet::from(["A", "B", "C", "D"]));
        assert_eq!(abc.intersection(&bd), FieldSet::from(["B"]));
        assert_eq!(abc.difference(&bd), FieldSet::from(["A", "C"]));
        assert!(FieldSet::from(["A", "C"]).is_subset(&abc));
        assert!(!bd.is_subset(&abc));
        assert!(FieldSet::new().is_subset(&bd));
    }

    #[test]
    fn field_set_deduplicates_and_orders() {
        let set: FieldSet = ["C", "A", "C", "B"].iter().map(|&s| Attribute::from(s)).collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().map(Attribute::name).join(""), "ABC");
    }

    #[test]
    fn display_compact_and_braced() {
        assert_eq!(FieldSet::from(["B", "A"]).to_string(), "AB");
        assert_eq!(FieldSet::from(["name", "emp_id"]).to_string(), "{emp_id,name}");
        assert_eq!(FieldSet::from(["A", "b2"]).to_string(), "{A,b2}");
        assert_eq!(FieldSet::new().to_string(), "{}");
    }

    #[test]
    fn fd_set_attributes_cover_both_sides() {
        let fds: FdSet = vec![
            Fd::new(FieldSet::from(["A", "B"]), FieldSet::from(["C"])),
            Fd::new(FieldSet::from(["D"]), FieldSet::from(["E"])),
        ]
        .into_iter()
        .collect();

        assert_eq!(fds.attributes(), FieldSet::from(["A", "B", "C", "D", "E"]));
    }

    #[test]
    fn fd_set_deduplicates_structurally() {
        let mut fds = FdSet::new();
        assert!(fds.insert(Fd::new(FieldSet::from(["A"]), FieldSet::from(["B", "C"]))));
        assert!(!fds.insert(Fd::new(FieldSet::from(["A"]), FieldSet::from(["C", "B"]))));
        assert!(fds.insert(Fd::new(FieldSet::from(["A"]), FieldSet::from(["B"]))));
        assert_eq!(fds.len(), 2);
    }

    #[test]
    fn ensure_within_rejects_foreign_attributes() {
        let fds: FdSet = std::iter::once(Fd::new(FieldSet::from(["A"]), FieldSet::from(["Z"])))
            .collect();
        let err = fds.ensure_within(&FieldSet::from(["A", "B"])).unwrap_err();
        assert!(matches!(err, FdError::InvalidInput(msg) if msg.contains('Z')));

        assert!(fds.ensure_within(&FieldSet::from(["A", "Z"])).is_ok());
    }

    #[test]
    fn ensure_within_rejects_empty_determinant() {
        let fds: FdSet =
            std::iter::once(Fd::new(FieldSet::new(), FieldSet::from(["A"]))).collect();
        assert!(fds.ensure_within(&FieldSet::from(["A"])).is_err());
    }
}
