use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::schema::{FdSet, FieldSet};
use crate::{chase, closure, cover, normal_form};

/// A universal schema together with the dependencies that hold on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Problem {
    pub universe: FieldSet,
    pub fds: FdSet,
}

impl From<FdSet> for Problem {
    fn from(fds: FdSet) -> Self {
        Self {
            universe: fds.attributes(),
            fds,
        }
    }
}

impl Problem {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let fds = crate::parse_fd_set(&code)?;
        info!(path = %path.display(), dependencies = fds.len(), "loaded dependencies");
        Ok(Self::from(fds))
    }

    /// Adds attributes that no dependency mentions.
    pub fn with_extra(mut self, extra: &FieldSet) -> Self {
        self.universe.extend(extra);
        self
    }

    pub fn closure(&self, set: &FieldSet) -> FieldSet {
        closure::closure(set, &self.fds)
    }

    pub fn candidate_key(&self) -> Result<FieldSet> {
        Ok(closure::candidate_key(&self.universe, &self.fds)?)
    }

    pub fn minimal_cover(&self) -> FdSet {
        cover::minimal_cover(&self.fds)
    }

    pub fn non_redundant(&self) -> FdSet {
        cover::non_redundant(&self.fds)
    }

    pub fn is_lossless(&self, relations: &[FieldSet]) -> Result<bool> {
        Ok(chase::is_lossless(&self.universe, &self.fds, relations)?)
    }

    pub fn synthesize_3nf(&self) -> Result<Vec<FieldSet>> {
        Ok(normal_form::synthesize_3nf(&self.universe, &self.fds)?)
    }
}
