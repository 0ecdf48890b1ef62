//! Registry: the merged, dispatchable union of rule sets.

use super::key::EmissionTier;
use super::rules::{RuleSet, RuleTables};
use super::Descriptor;
use crate::inflect::{DefaultInflector, Inflector};
use parking_lot::Mutex;
use std::any::TypeId;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Composed rule tables plus the string transforms rules may use.
///
/// `clone()` gives independent top-level tables that share the stored rule
/// lists with the source. Merging into the clone replaces lists rather than
/// mutating them, so one-off rules registered for a single descriptor never
/// leak into the registry the clone was taken from.
#[derive(Clone)]
pub struct Registry {
    pub(crate) tables: RuleTables,
    inflector: Arc<dyn Inflector>,
    write_log: Option<WriteLog>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            tables: RuleTables::default(),
            inflector: Arc::new(DefaultInflector),
            write_log: None,
        }
    }
}

/// Paths written by [`Registry::emit_file_at`], in write order.
///
/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct WriteLog {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl WriteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, path: &Path) {
        self.paths.lock().push(path.to_path_buf());
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().clone()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the inflector rule bodies see through [`Registry::inflector`]
    pub fn with_inflector(mut self, inflector: impl Inflector + 'static) -> Self {
        self.inflector = Arc::new(inflector);
        self
    }

    pub fn inflector(&self) -> &dyn Inflector {
        self.inflector.as_ref()
    }

    /// A clone that records every file it writes, including files written by
    /// rule bodies it dispatches to, into `log`
    pub fn recording(&self, log: &WriteLog) -> Registry {
        Registry {
            write_log: Some(log.clone()),
            ..self.clone()
        }
    }

    pub(crate) fn write_log(&self) -> Option<&WriteLog> {
        self.write_log.as_ref()
    }

    /// Merge rule sets in order. Registrations for a type already present are
    /// appended after the existing ones, never replacing them.
    pub fn merge<'a, I>(&mut self, sets: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a RuleSet>,
    {
        for set in sets {
            let snapshot = set.snapshot();
            debug!(
                directory = snapshot.len(EmissionTier::Directory),
                file = snapshot.len(EmissionTier::File),
                fragment = snapshot.len(EmissionTier::Fragment),
                "Merging rule set into registry"
            );
            self.tables.append(&snapshot);
        }
        self
    }

    /// Consuming form of [`Registry::merge`] for a single set
    pub fn with_rules(mut self, set: &RuleSet) -> Self {
        self.merge([set]);
        self
    }

    /// Number of rules registered for descriptor type `D` in `tier`
    pub fn rule_count<D: Descriptor>(&self, tier: EmissionTier) -> usize {
        self.tables.count_for(TypeId::of::<D>(), tier)
    }

    /// Total registrations in `tier`, across all descriptor types
    pub fn len(&self, tier: EmissionTier) -> usize {
        self.tables.len(tier)
    }

    /// Whether the fragment rule list for `D` is the same allocation in both
    /// registries
    pub fn shares_fragment_rules<D: Descriptor>(&self, other: &Registry) -> bool {
        self.tables
            .fragment
            .shares_list_with(&other.tables.fragment, TypeId::of::<D>())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("directory", &self.tables.len(EmissionTier::Directory))
            .field("file", &self.tables.len(EmissionTier::File))
            .field("fragment", &self.tables.len(EmissionTier::Fragment))
            .field("recording", &self.write_log.is_some())
            .finish()
    }
}
